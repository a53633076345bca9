//! Typed errors and HTTP mapping.

use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("unsupported database url: {0}")]
    UnsupportedDatabase(String),
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    Expired,
    #[error("incorrect email or password")]
    BadCredentials,
    #[error("inactive user")]
    Inactive,
    #[error("password hashing failed")]
    Hash,
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

#[derive(Error, Debug)]
pub enum LlmError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("llm api returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("llm returned no choices")]
    EmptyResponse,
    #[error("could not parse llm output: {0}")]
    Parse(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation: {message}")]
    Validation {
        message: String,
        field: Option<&'static str>,
    },
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            field: None,
        }
    }

    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            field: Some(field),
        }
    }

    /// Status code and stable error code for the response body.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::Auth(e) => match e {
                AuthError::Inactive => (StatusCode::FORBIDDEN, "forbidden"),
                AuthError::Hash => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
                _ => (StatusCode::UNAUTHORIZED, "unauthorized"),
            },
            AppError::Llm(_) => (StatusCode::INTERNAL_SERVER_ERROR, "llm_error"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Validation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            AppError::Db(e) => {
                if let sqlx::Error::RowNotFound = e {
                    (StatusCode::NOT_FOUND, "not_found")
                } else {
                    (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
                }
            }
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::UnsupportedMediaType(_) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, "unsupported_media_type"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => AppError::validation(e.body_text()),
            JsonRejection::JsonSyntaxError(e) => AppError::BadRequest(e.body_text()),
            JsonRejection::MissingJsonContentType(e) => AppError::UnsupportedMediaType(e.body_text()),
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        let details = match &self {
            AppError::Validation { field: Some(field), .. } => Some(serde_json::json!({ "field": field })),
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };
        if status == StatusCode::UNAUTHORIZED {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], Json(body)).into_response();
        }
        (status, Json(body)).into_response()
    }
}
