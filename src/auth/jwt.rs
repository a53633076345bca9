use crate::error::AuthError;
use crate::settings::AuthConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Claims {
    /// User id.
    pub sub: String,
    // issued at
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, AuthError> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }
}

/// Sign an access token for `user_id`. Returns the token and its lifetime in seconds.
pub fn issue_token(config: &AuthConfig, user_id: i64) -> Result<(String, i64), AuthError> {
    let now = Utc::now();
    let lifetime = Duration::minutes(config.access_token_expire_minutes);
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + lifetime).timestamp(),
    };
    let token = jsonwebtoken::encode(
        &Header::new(config.algorithm),
        &claims,
        &EncodingKey::from_secret(config.secret_key.as_bytes()),
    )?;
    Ok((token, lifetime.num_seconds()))
}

pub fn decode_token(config: &AuthConfig, token: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(config.algorithm);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);
    match jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret_key.as_bytes()),
        &validation,
    ) {
        Ok(data) => Ok(data.claims),
        Err(error) => match error.kind() {
            ErrorKind::ExpiredSignature => Err(AuthError::Expired),
            _ => {
                tracing::debug!(%error, "rejected token");
                Err(AuthError::InvalidToken)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::Algorithm;
    use pretty_assertions::assert_eq;

    fn config(minutes: i64) -> AuthConfig {
        AuthConfig {
            secret_key: "test-secret".into(),
            algorithm: Algorithm::HS256,
            access_token_expire_minutes: minutes,
        }
    }

    #[test]
    fn issued_token_decodes_to_the_same_user() {
        let (token, expires_in) = issue_token(&config(30), 42).unwrap();
        assert_eq!(expires_in, 1800);
        let claims = decode_token(&config(30), &token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.exp - claims.iat, 1800);
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let (token, _) = issue_token(&config(-5), 1).unwrap();
        assert!(matches!(decode_token(&config(30), &token), Err(AuthError::Expired)));
    }

    #[test]
    fn token_signed_with_other_key_is_invalid() {
        let (token, _) = issue_token(&config(30), 1).unwrap();
        let other = AuthConfig {
            secret_key: "another-secret".into(),
            ..config(30)
        };
        assert!(matches!(decode_token(&other, &token), Err(AuthError::InvalidToken)));
        assert!(matches!(decode_token(&other, "not.a.jwt"), Err(AuthError::InvalidToken)));
    }
}
