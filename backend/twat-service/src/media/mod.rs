//! Media upload seam used when a twat carries an image attachment.

mod imagekit;

pub use imagekit::ImageKitClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Upload transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upload rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid upload response: {0}")]
    InvalidResponse(String),
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedMedia {
    /// Canonical URL the media service serves the file from
    pub url: String,
    pub file_id: Option<String>,
    pub name: Option<String>,
}

#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Upload `file` (remote URL, data URI or base64 payload) under `file_name`.
    async fn upload(&self, file: &str, file_name: &str) -> Result<UploadedMedia, UploadError>;
}
