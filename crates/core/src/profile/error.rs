//! Profile domain errors.

use folio_shared::AppError;
use thiserror::Error;

/// Errors from profile operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The profile has not been created yet.
    #[error("profile has not been created yet")]
    NotFound,

    /// A required field is missing on first creation.
    #[error("missing required field: {field}")]
    Validation {
        /// Name of the missing field.
        field: &'static str,
    },

    /// The persistence layer failed.
    #[error("storage error: {0}")]
    Store(String),
}

impl From<ProfileError> for AppError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::NotFound => Self::NotFound("profile not found".to_string()),
            ProfileError::Validation { field } => {
                Self::Validation(format!("missing required field: {field}"))
            }
            ProfileError::Store(msg) => Self::Database(msg),
        }
    }
}
