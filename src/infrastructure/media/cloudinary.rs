use std::{collections::BTreeMap, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::{
    entities::media::{DestroyOutcome, UploadedMedia},
    errors::MediaError,
    repositories::media::MediaHost,
    settings::{AppConfig, SignatureAlgorithm},
};

const UPLOAD_QUALITY_TRANSFORMATION: &str = "q_50";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Signed-upload client for the Cloudinary REST API.
#[derive(Clone)]
pub struct CloudinaryClient {
    client: Client,
    base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: Zeroizing<String>,
    signature_algorithm: SignatureAlgorithm,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorBody {
    error: CloudinaryErrorDetail,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

impl CloudinaryClient {
    pub fn new(config: &AppConfig) -> Result<Self, MediaError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(CloudinaryClient {
            client,
            base_url: config.cloudinary_base_url.trim_end_matches('/').to_string(),
            cloud_name: config.cloudinary_cloud_name.clone(),
            api_key: config.cloudinary_api_key.clone(),
            api_secret: Zeroizing::new(config.cloudinary_api_secret.clone()),
            signature_algorithm: config.cloudinary_signature_algorithm,
        })
    }

    fn endpoint(&self, resource_type: &str, action: &str) -> String {
        format!("{}/{}/{}/{}", self.base_url, self.cloud_name, resource_type, action)
    }

    /// Adds `timestamp`, `api_key` and `signature` to the signed parameters.
    fn signed_form(&self, mut params: BTreeMap<&'static str, String>) -> BTreeMap<&'static str, String> {
        params.insert("timestamp", Utc::now().timestamp().to_string());
        let signature = sign_params(&params, &self.api_secret, self.signature_algorithm);
        params.insert("api_key", self.api_key.clone());
        params.insert("signature", signature);
        params
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<CloudinaryErrorBody>().await {
            Ok(body) => format!("{}: {}", status, body.error.message),
            Err(_) => status.to_string(),
        }
    }
}

/// Signature over the parameters in name order, `k=v` joined with `&`,
/// secret appended, hex-encoded with the account's digest.
pub fn sign_params(params: &BTreeMap<&str, String>, api_secret: &str, algorithm: SignatureAlgorithm) -> String {
    let to_sign = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    match algorithm {
        SignatureAlgorithm::Sha1 => hex_digest::<Sha1>(&to_sign, api_secret),
        SignatureAlgorithm::Sha256 => hex_digest::<Sha256>(&to_sign, api_secret),
    }
}

fn hex_digest<D: Digest>(to_sign: &str, api_secret: &str) -> String {
    let mut hasher = D::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MediaHost for CloudinaryClient {
    async fn upload(&self, data_uri: String) -> Result<UploadedMedia, MediaError> {
        let mut params = BTreeMap::new();
        params.insert("transformation", UPLOAD_QUALITY_TRANSFORMATION.to_string());
        let mut form = self.signed_form(params);
        form.insert("file", data_uri);

        let response = self.client
            .post(self.endpoint("auto", "upload"))
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MediaError::Rejected(Self::error_message(response).await));
        }

        let uploaded = response.json::<UploadedMedia>().await?;
        tracing::info!(public_id = %uploaded.public_id, "Uploaded media asset");
        Ok(uploaded)
    }

    async fn destroy(&self, public_id: &str) -> Result<DestroyOutcome, MediaError> {
        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());
        let form = self.signed_form(params);

        let response = self.client
            .post(self.endpoint("image", "destroy"))
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MediaError::Rejected(Self::error_message(response).await));
        }

        let body = response.json::<DestroyResponse>().await?;
        if body.result == "ok" {
            Ok(DestroyOutcome::Deleted)
        } else {
            Ok(DestroyOutcome::NotDeleted(body.result))
        }
    }
}
