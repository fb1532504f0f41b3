//! Object-store transport. Implements FileStorePort by uploading raw bytes
//! to Supabase storage and returning the durable public URL.

use crate::domain::{DomainError, EncodingError, FileAttachment, FileReference, GroupCode};
use crate::ports::FileStorePort;
use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;
use reqwest::Client;
use tracing::{info, warn};

/// Length of the random token in generated object names.
const NAME_TOKEN_LEN: usize = 10;

/// Supabase storage uploader. Objects land under a folder named after the
/// group, with a collision-resistant name built from the upload timestamp,
/// a random token, and the original extension.
pub struct ObjectStoreUploader {
    client: Client,
    base_url: String,
    anon_key: String,
    bucket: String,
}

impl ObjectStoreUploader {
    /// # Arguments
    /// * `client` - Shared HTTP client (constructed once at startup)
    /// * `base_url` - Platform base URL, e.g. `https://xyz.supabase.co`
    /// * `anon_key` - Anon API key used for both header and bearer token
    /// * `bucket` - Storage bucket name
    pub fn new(client: Client, base_url: String, anon_key: String, bucket: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            bucket,
        }
    }

    /// Build the object path: `{group}/{timestamp_ms}-{token}.{ext}`.
    /// The original extension is preserved; files without one get no
    /// trailing dot.
    fn object_path(group: GroupCode, file: &FileAttachment, timestamp_ms: i64, token: &str) -> String {
        match file.extension() {
            Some(ext) => format!("{}/{}-{}.{}", group, timestamp_ms, token, ext),
            None => format!("{}/{}-{}", group, timestamp_ms, token),
        }
    }

    fn random_token() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(NAME_TOKEN_LEN)
            .map(|b| (b as char).to_ascii_lowercase())
            .collect()
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }
}

#[async_trait::async_trait]
impl FileStorePort for ObjectStoreUploader {
    async fn store(
        &self,
        group: GroupCode,
        file: &FileAttachment,
    ) -> Result<FileReference, DomainError> {
        let path = Self::object_path(group, file, Utc::now().timestamp_millis(), &Self::random_token());
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path);

        let res = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .header("Content-Type", &file.mime)
            .body(file.bytes.clone())
            .send()
            .await
            .map_err(|e| EncodingError::Upload(format!("request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            warn!(%status, body = %text, "object store rejected upload");
            return Err(EncodingError::Upload(format!("storage error {}: {}", status, text)).into());
        }

        info!(
            group = %group,
            object = %path,
            bytes = file.bytes.len(),
            "file uploaded to object store"
        );

        Ok(FileReference::Stored {
            url: self.public_url(&path),
        })
    }
}
