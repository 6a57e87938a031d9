//! Object storage client for item photos
//!
//! Talks to an S3-style HTTP endpoint: one PUT per upload, public URLs
//! derived from the configured base. Kept behind a trait so upload failures
//! can be exercised in tests.

use async_trait::async_trait;

use crate::{
    config::StorageConfig,
    error::{AppError, AppResult},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload a blob and return its public URL
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<String>;
}

pub struct HttpObjectStorage {
    client: reqwest::Client,
    config: StorageConfig,
}

impl HttpObjectStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.bucket,
            key
        )
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.config.public_base_url.trim_end_matches('/'),
            key
        )
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<String> {
        let mut request = self
            .client
            .put(self.object_url(key))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);

        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Storage(format!(
                "Upload rejected with status {}",
                response.status()
            )));
        }

        Ok(self.public_url(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> HttpObjectStorage {
        HttpObjectStorage::new(StorageConfig {
            endpoint: "http://store.local:9000/".to_string(),
            bucket: "gear".to_string(),
            access_token: None,
            public_base_url: "https://cdn.example.org/gear/".to_string(),
        })
    }

    #[test]
    fn object_url_joins_endpoint_bucket_and_key() {
        assert_eq!(
            storage().object_url("items/4/photo.png"),
            "http://store.local:9000/gear/items/4/photo.png"
        );
    }

    #[test]
    fn public_url_uses_configured_base() {
        assert_eq!(
            storage().public_url("items/4/photo.png"),
            "https://cdn.example.org/gear/items/4/photo.png"
        );
    }
}
