use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single rejected input field, reported back to the client as-is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub message: String,
    pub field: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: field.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Validation failed for {}", fields(.0))]
    Validation(Vec<FieldError>),

    #[error("Password hashing failed: {0}")]
    PasswordHashing(String),
}

impl DomainError {
    pub fn field(field: &str, message: &str) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }
}

fn fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// `field` is the client-facing name of the rejected column
    #[error("Unique constraint violated on {field}: {detail}")]
    UniqueViolation { field: &'static str, detail: String },

    #[error("Database error: {0}")]
    DatabaseError(String),
}
