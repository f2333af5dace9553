use serde::{Deserialize, Serialize};

/// File name suffixes that are re-hosted through the media service.
pub const UPLOADABLE_SUFFIXES: [&str; 2] = [".png", ".jpg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Gif,
}

/// Attachment descriptor sent with a new twat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
}

impl Attachment {
    /// Source to upload, when this attachment must be re-hosted before persisting.
    ///
    /// Only images with a raster suffix and a source URL qualify; GIFs keep their URL.
    pub fn upload_source(&self) -> Option<&str> {
        if self.kind != AttachmentKind::Image {
            return None;
        }
        if !UPLOADABLE_SUFFIXES
            .iter()
            .any(|suffix| self.name.ends_with(suffix))
        {
            return None;
        }
        self.url.as_deref()
    }
}
