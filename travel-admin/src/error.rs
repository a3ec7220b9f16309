//! Error types for the admin console
//!
//! All errors use thiserror for structured error handling.
//! Only the display string crosses over to the presentation layer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Remote store error: {0}")]
    Remote(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("{entity}: field '{field}' must not be empty")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{0}: no record selected for update")]
    NoSelection(&'static str),

    #[error("{0} has no status flag")]
    NoStatusField(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Local precondition failures are logged only, never shown to the user.
    pub fn is_precondition(&self) -> bool {
        matches!(self, AppError::NoSelection(_) | AppError::NoStatusField(_))
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
