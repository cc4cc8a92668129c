//! Verification request errors

use thiserror::Error;

/// Why a verification request was rejected
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("No file or text provided")]
    MissingInput,

    #[error("No text provided")]
    EmptyText,

    #[error("File type not allowed: {0}")]
    UnsupportedExtension(String),

    #[error("File too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge { size: usize, limit: usize },

    #[error("Could not extract text from document")]
    NoExtractableText,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl VerifyError {
    /// Errors caused by the request rather than the service
    pub fn is_client_error(&self) -> bool {
        !matches!(self, VerifyError::Internal(_))
    }
}
