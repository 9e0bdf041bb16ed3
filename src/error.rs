use thiserror::Error;
use actix_web::{ResponseError, HttpResponse, http::StatusCode};
use serde_json::json;
use tracing::error;

use crate::messages;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: username or email already registered")]
    ConflictError,

    #[error("Authentication error: {0}")]
    AuthError(#[from] AuthError),

    #[error("Authorization error: admin privileges required")]
    AuthorizationError,

    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// The message shown to the client. System failures never expose their detail.
    pub fn client_message(&self) -> String {
        match self {
            AppError::ValidationError(msg) => msg.clone(),
            AppError::ConflictError => messages::ALREADY_REGISTERED.to_string(),
            AppError::AuthError(AuthError::InvalidCredentials) => {
                messages::INVALID_CREDENTIALS.to_string()
            }
            AppError::AuthError(AuthError::LoginRequired) => messages::LOGIN_REQUIRED.to_string(),
            AppError::AuthorizationError => messages::FORBIDDEN.to_string(),
            AppError::DatabaseError(DatabaseError::Duplicate) => {
                messages::ALREADY_REGISTERED.to_string()
            }
            AppError::DatabaseError(_) | AppError::ConfigError(_) | AppError::InternalError(_) => {
                messages::SYSTEM_ERROR.to_string()
            }
        }
    }

    fn is_system_error(&self) -> bool {
        match self {
            AppError::DatabaseError(DatabaseError::Duplicate) => false,
            AppError::DatabaseError(_) | AppError::ConfigError(_) | AppError::InternalError(_) => true,
            _ => false,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.into())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

// Business failures are reported as 200 with `success: false`; only missing
// sessions (401) and missing privileges (403) change the status line.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        if self.is_system_error() {
            error!("Request failed: {}", self);
        }

        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "message": self.client_message(),
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthError(AuthError::LoginRequired) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError => StatusCode::FORBIDDEN,
            _ => StatusCode::OK,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Login required")]
    LoginRequired,
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Schema bootstrap failed: {0}")]
    BootstrapError(String),

    #[error("Record not found")]
    NotFound,

    #[error("Duplicate record")]
    Duplicate,
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                DatabaseError::Duplicate
            }
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => DatabaseError::ConnectionError(err.to_string()),
            _ => DatabaseError::QueryError(err.to_string()),
        }
    }
}
