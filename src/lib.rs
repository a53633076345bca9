//! Learning path API: learner profiles, NSQF catalog, job-role recommendations and a chat assistant.

pub mod assistant;
pub mod auth;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod models;
pub mod recommender;
pub mod response;
pub mod routes;
pub mod seed;
pub mod service;
pub mod settings;
pub mod state;
pub mod store;

pub use assistant::{LanguageModel, OpenAiClient};
pub use error::{AppError, AuthError, ConfigError, LlmError};
pub use migration::apply_migrations;
pub use response::{success_many, success_one, success_one_ok};
pub use routes::{app, ApiDoc};
pub use seed::seed_catalog;
pub use settings::AppConfig;
pub use state::AppState;
pub use store::{connect, ensure_database_exists, Backend};
