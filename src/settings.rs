//! Runtime settings from environment variables (`.env` is loaded by the binary via dotenvy).

use crate::error::ConfigError;
use jsonwebtoken::Algorithm;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://learning_path.db?mode=rwc";
const DEV_SECRET_KEY: &str = "dev-secret-key-change-me";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub auth: AuthConfig,
    pub llm: LlmConfig,
    pub host: String,
    pub port: u16,
    pub seed_catalog: bool,
    pub max_body_bytes: usize,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub access_token_expire_minutes: i64,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    /// `None` disables outbound LLM calls; chat then uses the local fallback.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let secret_key = match get("SECRET_KEY") {
            Some(key) => key,
            None => {
                tracing::warn!("SECRET_KEY not set; using an insecure development key");
                DEV_SECRET_KEY.to_string()
            }
        };
        let algorithm = match get("ALGORITHM") {
            Some(alg) => parse_algorithm(&alg)?,
            None => Algorithm::HS256,
        };

        Ok(AppConfig {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), 5)?,
            auth: AuthConfig {
                secret_key,
                algorithm,
                access_token_expire_minutes: parse_or(
                    "ACCESS_TOKEN_EXPIRE_MINUTES",
                    get("ACCESS_TOKEN_EXPIRE_MINUTES"),
                    30,
                )?,
            },
            llm: LlmConfig {
                api_key: get("OPENAI_API_KEY"),
                model: get("OPENAI_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".into()),
                base_url: get("OPENAI_BASE_URL")
                    .unwrap_or_else(|| "https://api.openai.com/v1".into())
                    .trim_end_matches('/')
                    .to_string(),
                timeout: Duration::from_secs(parse_or("LLM_TIMEOUT_SECS", get("LLM_TIMEOUT_SECS"), 30)?),
            },
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or("PORT", get("PORT"), 8000)?,
            seed_catalog: parse_bool("SEED_CATALOG", get("SEED_CATALOG"), true)?,
            max_body_bytes: parse_or("MAX_BODY_BYTES", get("MAX_BODY_BYTES"), 1024 * 1024)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}

fn parse_bool(key: &'static str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match value.as_deref().map(str::to_lowercase).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(ConfigError::Invalid {
            key,
            value: other.to_string(),
        }),
    }
}

/// Only HMAC algorithms are accepted: the key is a shared secret.
fn parse_algorithm(value: &str) -> Result<Algorithm, ConfigError> {
    match value.to_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        _ => Err(ConfigError::Invalid {
            key: "ALGORITHM",
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.port, 8000);
        assert_eq!(config.auth.algorithm, Algorithm::HS256);
        assert_eq!(config.auth.access_token_expire_minutes, 30);
        assert_eq!(config.llm.api_key, None);
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert!(config.seed_catalog);
    }

    #[test]
    fn reads_overrides_and_trims_base_url() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/paths"),
            ("ALGORITHM", "hs512"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:9000/v1/"),
            ("SEED_CATALOG", "off"),
            ("PORT", "9090"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "postgres://localhost/paths");
        assert_eq!(config.auth.algorithm, Algorithm::HS512);
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.llm.base_url, "http://localhost:9000/v1");
        assert!(!config.seed_catalog);
        assert_eq!(config.bind_addr(), "0.0.0.0:9090");
    }

    #[test]
    fn blank_api_key_counts_as_unset() {
        let config = config_from(&[("OPENAI_API_KEY", "  ")]).unwrap();
        assert_eq!(config.llm.api_key, None);
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(matches!(
            config_from(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid { key: "PORT", .. })
        ));
        assert!(matches!(
            config_from(&[("ALGORITHM", "RS256")]),
            Err(ConfigError::Invalid { key: "ALGORITHM", .. })
        ));
    }
}
