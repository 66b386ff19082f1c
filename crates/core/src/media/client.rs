//! Signed client for the media host REST API.

use std::fmt::Write as _;

use bytes::Bytes;
use chrono::Utc;
use folio_shared::MediaConfig;
use serde::Deserialize;
use sha1::{Digest, Sha1};

use super::error::MediaError;

/// Resource class on the media host.
///
/// Images get transformations and format negotiation; everything else
/// (PDF documents) is stored as a raw blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Image assets (photo, logo).
    Image,
    /// Raw blobs (CV document).
    Raw,
}

impl ResourceKind {
    /// Path segment used by the media host API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Raw => "raw",
        }
    }
}

/// A stored asset as reported by the media host after upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    /// Public delivery URL.
    pub url: String,
    /// Host-side identifier, needed to delete the asset later.
    pub storage_id: String,
}

/// Storage backend for profile assets.
pub trait MediaStorage: Send + Sync {
    /// Uploads a file and returns its delivery URL and storage id.
    fn upload(
        &self,
        data: Bytes,
        folder: &str,
        kind: ResourceKind,
    ) -> impl Future<Output = Result<StoredAsset, MediaError>> + Send;

    /// Deletes a previously uploaded asset.
    fn delete(
        &self,
        storage_id: &str,
        kind: ResourceKind,
    ) -> impl Future<Output = Result<(), MediaError>> + Send;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

/// Client for the Cloudinary upload API.
///
/// All requests are authenticated by signing the sorted request parameters
/// with the account's API secret.
#[derive(Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    config: MediaConfig,
}

impl std::fmt::Debug for CloudinaryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryClient")
            .field("cloud_name", &self.config.cloud_name)
            .finish_non_exhaustive()
    }
}

impl CloudinaryClient {
    /// Creates a new client for the configured account.
    #[must_use]
    pub fn new(config: MediaConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// The cloud name, used when composing delivery URLs locally.
    #[must_use]
    pub fn cloud_name(&self) -> &str {
        &self.config.cloud_name
    }

    fn endpoint(&self, kind: ResourceKind, action: &str) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/{}/{action}",
            self.config.cloud_name,
            kind.as_str()
        )
    }

    /// Signs request parameters.
    ///
    /// Parameters must already be sorted by key; the signature is the SHA-1
    /// hex digest of `k1=v1&k2=v2...` with the API secret appended.
    fn sign(&self, sorted_params: &[(&str, &str)]) -> String {
        let mut payload = sorted_params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        payload.push_str(&self.config.api_secret);

        let digest = Sha1::digest(payload.as_bytes());
        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest {
            let _ = write!(hex, "{byte:02x}");
        }
        hex
    }
}

impl MediaStorage for CloudinaryClient {
    async fn upload(
        &self,
        data: Bytes,
        folder: &str,
        kind: ResourceKind,
    ) -> Result<StoredAsset, MediaError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[("folder", folder), ("timestamp", &timestamp)]);

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(data.to_vec()).file_name("file"),
            )
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature);

        let response = self
            .http
            .post(self.endpoint(kind, "upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Upload(format!("status {status}: {body}")));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        Ok(StoredAsset {
            url: body.secure_url,
            storage_id: body.public_id,
        })
    }

    async fn delete(&self, storage_id: &str, kind: ResourceKind) -> Result<(), MediaError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[
            ("invalidate", "true"),
            ("public_id", storage_id),
            ("timestamp", &timestamp),
        ]);

        let response = self
            .http
            .post(self.endpoint(kind, "destroy"))
            .form(&[
                ("public_id", storage_id),
                ("invalidate", "true"),
                ("timestamp", &timestamp),
                ("api_key", &self.config.api_key),
                ("signature", &signature),
            ])
            .send()
            .await
            .map_err(|e| MediaError::Delete(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Delete(format!("status {status}: {body}")));
        }

        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        // "not found" counts as deleted; the asset is gone either way.
        match body.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(MediaError::Delete(format!("unexpected result: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> CloudinaryClient {
        CloudinaryClient::new(MediaConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        })
    }

    #[test]
    fn test_upload_signature() {
        let client = test_client();
        let signature = client.sign(&[("folder", "profile"), ("timestamp", "1700000000")]);
        assert_eq!(signature, "06eea69b05024f9ce10ad1c1abb0c900a12af4a6");
    }

    #[test]
    fn test_destroy_signature() {
        let client = test_client();
        let signature = client.sign(&[
            ("invalidate", "true"),
            ("public_id", "profile/cv-abc123"),
            ("timestamp", "1700000000"),
        ]);
        assert_eq!(signature, "4819fe9e911788e293bacc01b7f515aa0dab5acc");
    }

    #[test]
    fn test_endpoints() {
        let client = test_client();
        assert_eq!(
            client.endpoint(ResourceKind::Image, "upload"),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
        assert_eq!(
            client.endpoint(ResourceKind::Raw, "destroy"),
            "https://api.cloudinary.com/v1_1/demo/raw/destroy"
        );
    }

    #[test]
    fn test_resource_kind_str() {
        assert_eq!(ResourceKind::Image.as_str(), "image");
        assert_eq!(ResourceKind::Raw.as_str(), "raw");
    }
}
