//! Movie catalog domain errors

use thiserror::Error;

/// Movie-specific domain errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MovieError {
    #[error("Movie not found: {id}")]
    NotFound { id: i64 },

    #[error("Invalid movie data: {reason}")]
    Validation { reason: String },

    #[error("Database error: {message}")]
    Database { message: String },
}
