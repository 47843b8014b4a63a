// --- File: crates/courtbook_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all Courtbook errors.
///
/// Each crate keeps its own error enum and implements
/// `From<SpecificError> for CourtbookError` so handlers can return this type.
#[derive(Error, Debug)]
pub enum CourtbookError {
    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during database operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred due to a conflict (e.g., resource already exists)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for CourtbookError {
    fn status_code(&self) -> u16 {
        match self {
            CourtbookError::ValidationError(_) => 400,
            CourtbookError::DatabaseError(_) => 500,
            CourtbookError::ConflictError(_) => 409,
            CourtbookError::NotFoundError(_) => 404,
        }
    }
}

// Utility functions for error handling
pub fn validation_error<T: fmt::Display>(message: T) -> CourtbookError {
    CourtbookError::ValidationError(message.to_string())
}
