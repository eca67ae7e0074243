use crate::api::ApiClient;
use crate::error::ApiError;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// MIME type for the supported image extensions
pub fn image_mime(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

impl ApiClient {
    /// Upload an image to the CDN with the unsigned preset and return its public URL.
    /// No bearer token is sent to the CDN.
    pub async fn upload_image(&self, bytes: Vec<u8>, file_name: &str) -> Result<String, ApiError> {
        if bytes.is_empty() {
            return Err(ApiError::Upload(format!("{file_name} is empty")));
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::Upload(format!(
                "{file_name} is larger than {} MB",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }
        let mime = image_mime(file_name)
            .ok_or_else(|| ApiError::Upload(format!("Unsupported image type: {file_name}")))?;

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|e| ApiError::Upload(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let response = self
            .http()
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| match ApiError::from_reqwest(e, self.timeout_secs()) {
                ApiError::Timeout(secs) => ApiError::Timeout(secs),
                other => ApiError::Upload(other.to_string()),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Upload(e.to_string()))?;
        if !status.is_success() {
            warn!("Image upload of {} rejected with {}", file_name, status);
            return Err(ApiError::Upload(format!("CDN returned {status}")));
        }

        let uploaded: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::Upload(format!("Unexpected CDN response: {e}")))?;
        info!("Uploaded {} -> {}", file_name, uploaded.secure_url);
        Ok(uploaded.secure_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_mime() {
        assert_eq!(image_mime("phong.JPG"), Some("image/jpeg"));
        assert_eq!(image_mime("a.webp"), Some("image/webp"));
        assert_eq!(image_mime("hop-dong.pdf"), None);
        assert_eq!(image_mime("noext"), None);
    }
}
