//! Common routes: welcome, health, readiness, version.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    database: &'static str,
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Welcome to the Personalized Learning Path API" }))
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthBody)),
    tag = "util"
)]
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyBody>) {
    match sqlx::query("SELECT 1").fetch_optional(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ReadyBody {
                status: "ok",
                database: "ok",
            }),
        ),
        Err(error) => {
            tracing::warn!(%error, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyBody {
                    status: "degraded",
                    database: "unavailable",
                }),
            )
        }
    }
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /, /health, /ready (DB ping), /version.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
