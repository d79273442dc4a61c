// src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

impl AppError {
    pub fn password_hash(msg: impl Into<String>) -> Self {
        AppError::PasswordHash(msg.into())
    }
}
