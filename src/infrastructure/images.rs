use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("image provider request failed: {0}")]
    Request(String),
    #[error("image provider returned status {0}")]
    Status(u16),
}

/// An image accepted by the hosting provider.
#[derive(Debug, Clone, Deserialize)]
pub struct HostedImage {
    pub secure_url: String,
    pub public_id: String,
}

#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    file: &'a str,
}

#[derive(Debug, Serialize)]
struct DestroyRequest<'a> {
    public_id: &'a str,
}

/// HTTP client for the external image-hosting provider. Uploads take the raw
/// client payload (a data URL) and return the hosted URL that gets persisted;
/// destroys address the hosted asset by its public id.
#[derive(Clone)]
pub struct ImageStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ImageStore {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub async fn upload(&self, image_data: &str) -> Result<HostedImage, ImageStoreError> {
        let response = self
            .request(&format!("{}/upload", self.base_url))
            .json(&UploadRequest { file: image_data })
            .send()
            .await
            .map_err(|err| ImageStoreError::Request(err.to_string()))?;

        if !response.status().is_success() {
            return Err(ImageStoreError::Status(response.status().as_u16()));
        }

        response
            .json::<HostedImage>()
            .await
            .map_err(|err| ImageStoreError::Request(err.to_string()))
    }

    pub async fn destroy(&self, public_id: &str) -> Result<(), ImageStoreError> {
        let response = self
            .request(&format!("{}/destroy", self.base_url))
            .json(&DestroyRequest { public_id })
            .send()
            .await
            .map_err(|err| ImageStoreError::Request(err.to_string()))?;

        if !response.status().is_success() {
            warn!(public_id, status = %response.status(), "image destroy rejected by provider");
            return Err(ImageStoreError::Status(response.status().as_u16()));
        }

        Ok(())
    }

    /// If `image_url` points at this provider, extract the public id of the
    /// hosted asset (the final path segment, extension stripped). Returns
    /// `None` for images hosted elsewhere, which are left alone on delete.
    pub fn hosted_public_id(&self, image_url: &str) -> Option<String> {
        let rest = image_url.strip_prefix(&self.base_url)?;
        let segment = rest.rsplit('/').next()?;
        let public_id = segment.split('.').next().unwrap_or(segment);

        if public_id.is_empty() {
            None
        } else {
            Some(public_id.to_string())
        }
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.http.post(url);
        if self.api_key.is_empty() {
            request
        } else {
            request.bearer_auth(&self.api_key)
        }
    }
}
