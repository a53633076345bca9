use super::validation::NewUser;
use crate::auth::{hash_password, verify_password};
use crate::error::{AppError, AuthError};
use crate::models::{User, UserRow};
use crate::store::now_text;
use sqlx::AnyPool;

const USER_COLUMNS: &str = "id, email, hashed_password, full_name, is_active, created_at";

pub struct UserService;

impl UserService {
    /// Insert a user with a freshly hashed password. Duplicate email is a conflict.
    pub async fn create(pool: &AnyPool, new_user: NewUser) -> Result<User, AppError> {
        let NewUser {
            email,
            password,
            full_name,
        } = new_user;
        let hashed = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("hash task: {}", e)))??;
        let sql = format!(
            "INSERT INTO users (email, hashed_password, full_name, is_active, created_at) \
             VALUES ($1, $2, $3, 1, $4) RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&email)
            .bind(hashed)
            .bind(full_name)
            .bind(now_text())
            .fetch_one(pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    AppError::Conflict(format!("email '{}' is already registered", email))
                }
                other => AppError::Db(other),
            })?;
        tracing::info!(user_id = row.id, "user registered");
        row.try_into()
    }

    pub async fn find_by_id(pool: &AnyPool, id: i64) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    /// Check email and password. Unknown email and wrong password are indistinguishable to the caller.
    pub async fn authenticate(pool: &AnyPool, email: &str, password: &str) -> Result<User, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.trim().to_lowercase())
            .fetch_optional(pool)
            .await?
            .ok_or(AuthError::BadCredentials)?;
        let hashed = row.hashed_password.clone();
        let password = password.to_string();
        let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hashed))
            .await
            .map_err(|e| AppError::Internal(format!("verify task: {}", e)))?;
        if !valid {
            return Err(AuthError::BadCredentials.into());
        }
        if row.is_active == 0 {
            return Err(AuthError::Inactive.into());
        }
        row.try_into()
    }
}
