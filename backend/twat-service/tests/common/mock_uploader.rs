//! Recording MediaUploader for integration tests

use async_trait::async_trait;
use std::sync::Mutex;
use twat_service::media::{MediaUploader, UploadError, UploadedMedia};

pub const HOSTED_URL: &str = "https://ik.imagekit.io/twats/hosted.png";

pub struct MockUploader {
    /// (file, file_name) per upload call
    calls: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl MockUploader {
    /// Uploader that always answers with `HOSTED_URL`
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// Uploader whose every call is rejected by the media service
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaUploader for MockUploader {
    async fn upload(&self, file: &str, file_name: &str) -> Result<UploadedMedia, UploadError> {
        self.calls
            .lock()
            .unwrap()
            .push((file.to_string(), file_name.to_string()));

        if self.fail {
            return Err(UploadError::Rejected {
                status: 403,
                message: "Your account cannot be authenticated.".to_string(),
            });
        }

        Ok(UploadedMedia {
            url: HOSTED_URL.to_string(),
            file_id: Some("file_123".to_string()),
            name: Some(file_name.to_string()),
        })
    }
}
