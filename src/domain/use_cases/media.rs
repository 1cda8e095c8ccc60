use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::{
    entities::media::{DestroyOutcome, MediaFile, UploadedMedia},
    errors::MediaError,
    repositories::media::MediaHost,
};

const FALLBACK_MIME: &str = "application/octet-stream";

pub struct MediaHandler<H>
where
    H: MediaHost,
{
    pub media_host: H,
}

impl<H> MediaHandler<H>
where
    H: MediaHost,
{
    pub fn new(media_host: H) -> Self {
        MediaHandler { media_host }
    }

    /// Forwards an uploaded file to the media host as a base64 `data:` URI.
    pub async fn upload(&self, file: MediaFile) -> Result<UploadedMedia, MediaError> {
        if file.data.is_empty() {
            return Err(MediaError::InvalidInput("Uploaded file is empty".into()));
        }

        let mime = resolve_mime(&file);
        tracing::debug!(
            file_name = file.file_name.as_deref().unwrap_or("-"),
            %mime,
            size = file.data.len(),
            "Forwarding upload to media host"
        );

        self.media_host.upload(to_data_uri(&mime, &file.data)).await
    }

    pub async fn delete(&self, public_id: &str) -> Result<DestroyOutcome, MediaError> {
        let public_id = public_id.trim();
        if public_id.is_empty() {
            return Err(MediaError::InvalidInput("publicId is required".into()));
        }

        let outcome = self.media_host.destroy(public_id).await?;
        if let DestroyOutcome::NotDeleted(result) = &outcome {
            tracing::warn!(public_id, result = %result, "Media host did not delete asset");
        }
        Ok(outcome)
    }
}

/// Declared part type first, then magic-byte sniffing, then octet-stream.
pub fn resolve_mime(file: &MediaFile) -> String {
    file.content_type
        .as_deref()
        .map(str::trim)
        .filter(|ct| !ct.is_empty() && *ct != FALLBACK_MIME)
        .map(str::to_string)
        .or_else(|| infer::get(&file.data).map(|kind| kind.mime_type().to_string()))
        .unwrap_or_else(|| FALLBACK_MIME.to_string())
}

pub fn to_data_uri(mime: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(data))
}
