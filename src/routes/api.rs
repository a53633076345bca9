//! Routes under `/api`.

use crate::handlers::{auth, chat, courses, learning_paths, profile, recommend};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/token", post(auth::token))
        .route("/auth/me", get(auth::me))
        .route("/profile", get(profile::list).post(profile::create))
        .route("/profile/:id", get(profile::read).put(profile::update))
        .route("/profile/:id/recommendations", get(profile::recommendations))
        .route("/recommend", post(recommend::recommend))
        .route("/recommendations/:id", get(recommend::read))
        .route("/courses", get(courses::list))
        .route("/courses/:id", get(courses::read))
        .route("/job-roles", get(courses::job_roles))
        .route("/chat", post(chat::chat))
        .route("/chat/history", get(chat::history))
        .route("/learning-paths", get(learning_paths::list).post(learning_paths::create))
        .route("/learning-paths/generate", post(learning_paths::generate))
        .route(
            "/learning-paths/:id",
            get(learning_paths::read)
                .put(learning_paths::update)
                .delete(learning_paths::delete),
        )
        .route("/learning-paths/:id/items", post(learning_paths::add_item))
        .with_state(state)
}
