// Image upload client
//
// Images are uploaded to a separate file endpoint before the product is
// saved; the returned `url`/`fileKey` pair is then embedded in the product
// request. Files are checked locally so obviously bad uploads never leave
// the machine.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use tracing::debug;
use url::Url;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::UploadedImage;

/// MIME types the upload endpoint accepts.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
];

/// Largest accepted upload, 1 MiB.
pub const MAX_IMAGE_BYTES: usize = 1024 * 1024;

/// An image ready for upload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, deriving the content type from its extension.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidUpload {
                reason: format!("{} has no usable file name", path.display()),
            })?
            .to_owned();
        let content_type = content_type_for(path).ok_or_else(|| Error::InvalidUpload {
            reason: format!("{file_name}: unsupported file extension"),
        })?;
        let bytes = std::fs::read(path).map_err(|e| Error::InvalidUpload {
            reason: format!("failed to read {}: {e}", path.display()),
        })?;
        Ok(Self::new(file_name, content_type, bytes))
    }

    /// Check type and size against the endpoint's limits.
    pub fn validate(&self) -> Result<(), Error> {
        if self.bytes.is_empty() {
            return Err(Error::InvalidUpload {
                reason: "No file provided".into(),
            });
        }
        if !ALLOWED_IMAGE_TYPES.contains(&self.content_type.as_str()) {
            return Err(Error::InvalidUpload {
                reason: format!(
                    "Invalid file type {}. Only JPEG, PNG, WebP and GIF are allowed",
                    self.content_type
                ),
            });
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(Error::InvalidUpload {
                reason: format!(
                    "File too large ({} bytes). Maximum size is 1MB",
                    self.bytes.len()
                ),
            });
        }
        Ok(())
    }
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

impl ApiClient {
    /// Upload an image to `upload_url` as multipart field `file`.
    ///
    /// Validation failures are reported as [`Error::InvalidUpload`] without
    /// any request being made.
    pub async fn upload_image(
        &self,
        upload_url: &Url,
        file: ImageFile,
    ) -> Result<UploadedImage, Error> {
        file.validate()?;
        debug!(
            file = %file.file_name,
            size = file.bytes.len(),
            "POST {upload_url}"
        );

        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)?;
        let form = Form::new().part("file", part);

        let resp = self
            .http()
            .post(upload_url.clone())
            .multipart(form)
            .send()
            .await?;
        Self::into_raw(resp).await?.json()
    }
}
