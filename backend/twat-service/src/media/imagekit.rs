use super::{MediaUploader, UploadError, UploadedMedia};
use crate::config::ImageKitConfig;
use crate::metrics::MEDIA_UPLOADS_TOTAL;
use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// ImageKit upload API client
pub struct ImageKitClient {
    http_client: Client,
    upload_url: String,
    private_key: String,
    folder: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    url: Option<String>,
    file_id: Option<String>,
    name: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

impl ImageKitClient {
    pub fn new(cfg: &ImageKitConfig) -> Result<Self, UploadError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        info!(upload_url = %cfg.upload_url, "ImageKit client initialized");

        Ok(Self {
            http_client,
            upload_url: cfg.upload_url.clone(),
            private_key: cfg.private_key.clone(),
            folder: cfg.folder.clone(),
        })
    }

    async fn send(&self, file: &str, file_name: &str) -> Result<UploadedMedia, UploadError> {
        let mut form = Form::new()
            .text("file", file.to_string())
            .text("fileName", file_name.to_string())
            .text("useUniqueFileName", "true");
        if let Some(folder) = &self.folder {
            form = form.text("folder", folder.clone());
        }

        let response = self
            .http_client
            .post(&self.upload_url)
            .basic_auth(&self.private_key, Some(""))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or(body);
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| UploadError::InvalidResponse(e.to_string()))?;

        let url = body
            .url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| UploadError::InvalidResponse("response has no url".to_string()))?;

        Ok(UploadedMedia {
            url,
            file_id: body.file_id,
            name: body.name,
        })
    }
}

#[async_trait]
impl MediaUploader for ImageKitClient {
    async fn upload(&self, file: &str, file_name: &str) -> Result<UploadedMedia, UploadError> {
        match self.send(file, file_name).await {
            Ok(media) => {
                MEDIA_UPLOADS_TOTAL.with_label_values(&["success"]).inc();
                debug!(file_name, url = %media.url, "media uploaded");
                Ok(media)
            }
            Err(e) => {
                MEDIA_UPLOADS_TOTAL.with_label_values(&["error"]).inc();
                warn!(file_name, error = %e, "media upload failed");
                Err(e)
            }
        }
    }
}
