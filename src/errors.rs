use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: f64 },

    #[error("{message}")]
    Duplicate { message: String },

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("{resource} {id} does not belong to you")]
    Forbidden { resource: &'static str, id: i64 },

    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("Password hashing error: {message}")]
    PasswordHash { message: String },

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    /// Maps an insert failure, turning a storage-level unique violation into the
    /// same `Duplicate` outcome the application-level check produces.
    pub(crate) fn from_insert(err: DbErr, duplicate_message: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Duplicate {
                message: duplicate_message.to_string(),
            },
            _ => Self::Database(err),
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
