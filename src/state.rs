//! Shared application state for all routes.

use crate::assistant::{LanguageModel, OpenAiClient};
use crate::error::AppError;
use crate::migration::apply_migrations;
use crate::seed::seed_catalog;
use crate::settings::AppConfig;
use crate::store::{connect, ensure_database_exists};
use sqlx::AnyPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: AnyPool,
    pub config: Arc<AppConfig>,
    /// `None` when no API key is configured; callers fall back to local answers.
    pub llm: Option<Arc<dyn LanguageModel>>,
}

impl AppState {
    pub fn new(pool: AnyPool, config: AppConfig, llm: Option<Arc<dyn LanguageModel>>) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            llm,
        }
    }

    /// Create and migrate the database, seed the catalog if enabled, and build the LLM client
    /// from config unless `llm` overrides it.
    pub async fn init(config: AppConfig, llm: Option<Arc<dyn LanguageModel>>) -> Result<Self, AppError> {
        ensure_database_exists(&config.database_url).await?;
        let (pool, backend) = connect(&config.database_url, config.db_max_connections).await?;
        apply_migrations(&pool, backend).await?;
        if config.seed_catalog {
            seed_catalog(&pool).await?;
        }
        let llm = match llm {
            Some(llm) => Some(llm),
            None => OpenAiClient::from_config(&config.llm)?.map(|client| {
                tracing::info!(model = %client.model(), "language model enabled");
                Arc::new(client) as Arc<dyn LanguageModel>
            }),
        };
        if llm.is_none() {
            tracing::info!("OPENAI_API_KEY not set; chat uses local replies");
        }
        Ok(Self::new(pool, config, llm))
    }

    pub fn llm(&self) -> Option<&dyn LanguageModel> {
        self.llm.as_deref()
    }
}
