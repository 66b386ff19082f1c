//! Media host error types.

use thiserror::Error;

/// Errors from the media host client.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Upload request failed.
    #[error("upload failed: {0}")]
    Upload(String),

    /// Delete request failed.
    #[error("delete failed: {0}")]
    Delete(String),

    /// The media host returned a response we could not interpret.
    #[error("invalid response from media host: {0}")]
    InvalidResponse(String),
}
