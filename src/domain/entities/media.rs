use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result of a media host upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadedMedia {
    pub public_id: String,
    pub secure_url: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub bytes: Option<u64>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Remaining fields of the host response, passed through to clients.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DestroyOutcome {
    Deleted,
    /// The host answered with a result other than `ok`, e.g. `not found`.
    NotDeleted(String),
}

/// An uploaded file held in memory.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMediaRequest {
    #[serde(alias = "public_id")]
    pub public_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteMediaResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upload_response_keeps_unlisted_fields() {
        let response = json!({
            "public_id": "folder/sample",
            "secure_url": "https://res.cloudinary.com/demo/image/upload/v1/folder/sample.jpg",
            "format": "jpg",
            "version": 1312461204,
            "etag": "d1ac0ee70a9a36b14887aca7f7211737",
            "tags": []
        });

        let uploaded: UploadedMedia = serde_json::from_value(response).unwrap();
        assert_eq!(uploaded.format.as_deref(), Some("jpg"));
        assert_eq!(uploaded.extra["version"], 1312461204);

        let rendered = serde_json::to_value(&uploaded).unwrap();
        assert_eq!(rendered["etag"], "d1ac0ee70a9a36b14887aca7f7211737");
        assert_eq!(rendered["tags"], json!([]));
        assert_eq!(rendered["public_id"], "folder/sample");
    }
}
