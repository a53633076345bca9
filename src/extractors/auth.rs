//! Resolve the calling user from an `Authorization: Bearer <jwt>` header.

use crate::auth::decode_token;
use crate::error::{AppError, AuthError};
use crate::models::User;
use crate::service::UserService;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

/// The authenticated, active user behind the request.
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::MissingToken)?;
        let claims = decode_token(&state.config.auth, token)?;
        let user = UserService::find_by_id(&state.pool, claims.user_id()?)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        if !user.is_active {
            return Err(AuthError::Inactive.into());
        }
        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/profile");
        if let Some(v) = value {
            builder = builder.header(header::AUTHORIZATION, v);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn reads_bearer_scheme_case_insensitively() {
        assert_eq!(bearer_token(&parts_with(Some("Bearer abc.def"))), Some("abc.def"));
        assert_eq!(bearer_token(&parts_with(Some("bearer  abc"))), Some("abc"));
    }

    #[test]
    fn ignores_other_schemes_and_missing_header() {
        assert_eq!(bearer_token(&parts_with(Some("Basic dXNlcjpwYXNz"))), None);
        assert_eq!(bearer_token(&parts_with(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts_with(None)), None);
    }
}
