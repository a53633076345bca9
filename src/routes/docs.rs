//! OpenAPI document, Swagger UI and ReDoc.

use crate::handlers::{auth, chat, courses, learning_paths, profile, recommend};
use crate::models::{ItemType, LearningPace, LearningPathStatus, StepKind};
use crate::response::MetaCount;
use crate::routes::common;
use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

struct SecurityAddon;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Personalized Learning Path API",
        description = "Learner profiles, NSQF course catalog, job-role recommendations and a learning assistant"
    ),
    paths(
        common::health,
        auth::register,
        auth::token,
        auth::me,
        profile::create,
        profile::list,
        profile::read,
        profile::update,
        profile::recommendations,
        recommend::recommend,
        recommend::read,
        courses::list,
        courses::read,
        courses::job_roles,
        chat::chat,
        chat::history,
        learning_paths::list,
        learning_paths::create,
        learning_paths::read,
        learning_paths::update,
        learning_paths::delete,
        learning_paths::add_item,
        learning_paths::generate,
    ),
    components(schemas(MetaCount, LearningPace, StepKind, ItemType, LearningPathStatus)),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Accounts and bearer tokens"),
        (name = "profiles", description = "Learner profiles"),
        (name = "recommendations", description = "Job-role recommendations with NSQF pathways"),
        (name = "courses", description = "NSQF catalog"),
        (name = "chat", description = "Learning assistant"),
        (name = "learning-paths", description = "User-owned learning paths"),
        (name = "util", description = "Service status"),
    )
)]
pub struct ApiDoc;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token from /api/auth/token"))
                    .build(),
            ),
        );
    }
}

/// /openapi.json, /docs (Swagger UI), /redoc.
pub fn docs_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .merge(Redoc::with_url("/redoc", ApiDoc::openapi()))
}
