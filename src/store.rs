//! Database connection setup and shared row helpers.
//! One schema serves SQLite (default) and PostgreSQL through the sqlx `Any` driver.

use crate::error::{AppError, ConfigError};
use chrono::{DateTime, Utc};
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::migrate::MigrateDatabase;
use sqlx::{Any, AnyPool};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Postgres,
}

impl Backend {
    pub fn from_url(database_url: &str) -> Result<Self, ConfigError> {
        if database_url.starts_with("sqlite:") {
            Ok(Backend::Sqlite)
        } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
            Ok(Backend::Postgres)
        } else {
            Err(ConfigError::UnsupportedDatabase(redact(database_url)))
        }
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Strip credentials before a URL ends up in logs or error bodies.
fn redact(database_url: &str) -> String {
    match (database_url.find("://"), database_url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &database_url[..scheme_end], &database_url[at..])
        }
        _ => database_url.to_string(),
    }
}

/// Create the SQLite file or PostgreSQL database if it does not exist yet.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    install_default_drivers();
    Backend::from_url(database_url)?;
    if is_in_memory(database_url) {
        return Ok(());
    }
    if !Any::database_exists(database_url).await? {
        tracing::info!(url = %redact(database_url), "creating database");
        Any::create_database(database_url).await?;
    }
    Ok(())
}

/// Connect a pool. In-memory SQLite is pinned to one connection so every query sees the same database.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<(AnyPool, Backend), AppError> {
    install_default_drivers();
    let backend = Backend::from_url(database_url)?;
    let in_memory = backend == Backend::Sqlite && is_in_memory(database_url);
    let mut options = AnyPoolOptions::new();
    let max_connections = if in_memory {
        // Dropping the only connection would drop the database with it.
        options = options.min_connections(1).idle_timeout(None).max_lifetime(None);
        1
    } else {
        max_connections.max(1)
    };
    let pool = options.max_connections(max_connections).connect(database_url).await?;
    tracing::info!(?backend, max_connections, "database pool ready");
    Ok((pool, backend))
}

pub fn now_text() -> String {
    format_timestamp(Utc::now())
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

pub fn parse_timestamp(column: &str, value: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| AppError::Internal(format!("bad timestamp in {}: {}", column, e)))
}

pub fn parse_optional_timestamp(column: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>, AppError> {
    value.map(|v| parse_timestamp(column, v)).transpose()
}

/// Comma-separated catalog fields: trimmed, empties dropped.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
