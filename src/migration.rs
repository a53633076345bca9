//! Schema DDL. Idempotent: every statement is `IF NOT EXISTS`, so it runs on each startup.
//! Timestamps and JSON are TEXT and integers are 64-bit so both backends decode identically.

use crate::error::AppError;
use crate::store::Backend;
use sqlx::AnyPool;

const TABLES: &[(&str, &str)] = &[
    (
        "users",
        "CREATE TABLE IF NOT EXISTS users (
            id {pk},
            email TEXT NOT NULL UNIQUE,
            hashed_password TEXT NOT NULL,
            full_name TEXT,
            is_active {int} NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        )",
    ),
    (
        "profiles",
        "CREATE TABLE IF NOT EXISTS profiles (
            id {pk},
            user_id {int} REFERENCES users(id) ON DELETE CASCADE,
            education_level {int} NOT NULL,
            prior_skills TEXT NOT NULL,
            aspirations TEXT NOT NULL,
            learning_pace TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT
        )",
    ),
    (
        "nsqf_courses",
        "CREATE TABLE IF NOT EXISTS nsqf_courses (
            id {pk},
            level {int} NOT NULL,
            qualification TEXT NOT NULL,
            example_courses TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL
        )",
    ),
    (
        "job_roles",
        "CREATE TABLE IF NOT EXISTS job_roles (
            id {pk},
            job_title TEXT NOT NULL,
            skills TEXT NOT NULL,
            demand_score {int} NOT NULL,
            suggested_microcredentials TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
    ),
    (
        "recommendations",
        "CREATE TABLE IF NOT EXISTS recommendations (
            id {pk},
            profile_id {int} NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
            recommendations TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
    ),
    (
        "chat_messages",
        "CREATE TABLE IF NOT EXISTS chat_messages (
            id {pk},
            user_id {int} REFERENCES users(id) ON DELETE CASCADE,
            profile_id {int} REFERENCES profiles(id) ON DELETE SET NULL,
            message TEXT NOT NULL,
            response TEXT NOT NULL,
            context_used {int} NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )",
    ),
    (
        "learning_paths",
        "CREATE TABLE IF NOT EXISTS learning_paths (
            id {pk},
            user_id {int} NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            description TEXT,
            status TEXT NOT NULL DEFAULT 'draft',
            created_at TEXT NOT NULL,
            updated_at TEXT
        )",
    ),
    (
        "learning_path_items",
        "CREATE TABLE IF NOT EXISTS learning_path_items (
            id {pk},
            learning_path_id {int} NOT NULL REFERENCES learning_paths(id) ON DELETE CASCADE,
            item_type TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            resource_url TEXT,
            estimated_duration {int},
            item_order {int} NOT NULL DEFAULT 0,
            is_completed {int} NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )",
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_profiles_user ON profiles (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_courses_level ON nsqf_courses (level)",
    "CREATE INDEX IF NOT EXISTS idx_recommendations_profile ON recommendations (profile_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_chat_user ON chat_messages (user_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_paths_user ON learning_paths (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_items_path ON learning_path_items (learning_path_id, item_order)",
];

fn render(template: &str, backend: Backend) -> String {
    let (pk, int) = match backend {
        Backend::Sqlite => ("INTEGER PRIMARY KEY AUTOINCREMENT", "INTEGER"),
        Backend::Postgres => ("BIGSERIAL PRIMARY KEY", "BIGINT"),
    };
    template.replace("{pk}", pk).replace("{int}", int)
}

/// Create all tables and indexes for the given backend.
pub async fn apply_migrations(pool: &AnyPool, backend: Backend) -> Result<(), AppError> {
    for (name, template) in TABLES {
        let ddl = render(template, backend);
        tracing::debug!(table = %name, "ensure table");
        sqlx::query(&ddl).execute(pool).await?;
    }
    for ddl in INDEXES {
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!(tables = TABLES.len(), "schema up to date");
    Ok(())
}
