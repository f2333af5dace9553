/// Error types for twat-service
///
/// `ServiceError` is what procedures return. It keeps upload and persistence failures
/// apart so they can be logged with their cause; `rpc::RpcError` decides what the client
/// sees.
use crate::media::UploadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServiceError {
    /// Failures whose details must stay server-side.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ServiceError::Upload(_) | ServiceError::Database(_) | ServiceError::Serialization(_)
        )
    }
}

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;
