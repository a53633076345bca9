//! Router assembly.

mod api;
pub mod common;
mod docs;

pub use api::api_routes;
pub use common::common_routes;
pub use docs::{docs_routes, ApiDoc};

use crate::state::AppState;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// The full application: common routes, docs, and `/api`, with body limit, CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(docs_routes())
        .nest("/api", api_routes(state))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
