use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    entities::media::{DestroyOutcome, UploadedMedia},
    errors::MediaError,
};

#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Uploads a `data:` URI and returns the hosted asset.
    async fn upload(&self, data_uri: String) -> Result<UploadedMedia, MediaError>;

    /// Deletes a hosted asset by its public identifier.
    async fn destroy(&self, public_id: &str) -> Result<DestroyOutcome, MediaError>;
}

#[async_trait]
impl<H> MediaHost for Arc<H>
where
    H: MediaHost + ?Sized,
{
    async fn upload(&self, data_uri: String) -> Result<UploadedMedia, MediaError> {
        (**self).upload(data_uri).await
    }

    async fn destroy(&self, public_id: &str) -> Result<DestroyOutcome, MediaError> {
        (**self).destroy(public_id).await
    }
}

/// Stand-in used when no media host credentials are configured.
pub struct UnconfiguredMediaHost;

#[async_trait]
impl MediaHost for UnconfiguredMediaHost {
    async fn upload(&self, _data_uri: String) -> Result<UploadedMedia, MediaError> {
        Err(MediaError::NotConfigured)
    }

    async fn destroy(&self, _public_id: &str) -> Result<DestroyOutcome, MediaError> {
        Err(MediaError::NotConfigured)
    }
}
