//! Object storage client for product images
//!
//! Speaks the Supabase Storage REST API: objects are uploaded with
//! `POST {base}/object/{bucket}/{key}` and served from
//! `{base}/object/public/{bucket}/{key}`.

use chrono::Utc;
use reqwest::Client;

use crate::config::StorageConfig;
use crate::error::{AppError, AppResult};

/// Object storage client
#[derive(Clone)]
pub struct ObjectStorageClient {
    client: Client,
    base_url: String,
    bucket: String,
    api_key: String,
}

impl ObjectStorageClient {
    /// Create a new ObjectStorageClient
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Upload an image and return its public URL
    pub async fn upload_image(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> AppResult<String> {
        let key = object_key(file_name, Utc::now().timestamp_millis());
        let url = format!("{}/object/{}/{}", self.base_url, self.bucket, key);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .header("Content-Type", content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::StorageError(format!("Upload request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::StorageError(format!(
                "Upload returned {}: {}",
                status, body
            )));
        }

        Ok(self.public_url(&key))
    }

    /// Public URL for an object key
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/object/public/{}/{}", self.base_url, self.bucket, key)
    }
}

/// Build a unique object key: `{unix_millis}-{random}.{ext}`
pub fn object_key(file_name: &str, unix_millis: i64) -> String {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| "bin".to_string());
    let random = uuid::Uuid::new_v4().simple().to_string();

    format!("{}-{}.{}", unix_millis, &random[..8], ext)
}
