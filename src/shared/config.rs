//! Application configuration. Endpoint URLs, storage bucket, upload limits.

use serde::Deserialize;

/// Default upload ceiling in megabytes. The two historical deployments
/// disagreed (45 MB behind the script endpoint, 50 MB behind the hosted
/// platform); the ceiling is configuration, never a hard-coded literal.
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 45;

/// Default bucket for exam file uploads.
pub const DEFAULT_STORAGE_BUCKET: &str = "exams";

/// Which file/submission transport is active. Exactly one per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Base64 payloads POSTed to the spreadsheet-script endpoint.
    Inline,
    /// Raw uploads to hosted object storage; records inserted via REST.
    Storage,
}

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Spreadsheet-script endpoint for registrations. Read from ENROLL_REGISTRATION_ENDPOINT.
    #[serde(default)]
    pub registration_endpoint: Option<String>,

    /// Spreadsheet-script endpoint for exam submissions. Read from ENROLL_EXAMS_ENDPOINT.
    #[serde(default)]
    pub exams_endpoint: Option<String>,

    /// Hosted platform base URL (REST + storage). Read from ENROLL_SUPABASE_URL.
    #[serde(default)]
    pub supabase_url: Option<String>,

    /// Hosted platform anon key. Read from ENROLL_SUPABASE_ANON_KEY.
    #[serde(default)]
    pub supabase_anon_key: Option<String>,

    /// Object storage bucket for exam files. Read from ENROLL_STORAGE_BUCKET.
    #[serde(default)]
    pub storage_bucket: Option<String>,

    /// Upload ceiling per file in MB. Read from ENROLL_MAX_UPLOAD_MB.
    #[serde(default)]
    pub max_upload_mb: Option<u64>,

    /// File/submission transport: "inline" or "storage". Read from ENROLL_TRANSPORT.
    #[serde(default)]
    pub transport: Option<String>,

    /// Directory for downloads and CSV exports. Read from ENROLL_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("ENROLL"));
        if let Ok(path) = std::env::var("ENROLL_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let cfg: Self = c.build()?.try_deserialize()?;
        Ok(cfg)
    }

    /// Upload ceiling in bytes. Defaults to DEFAULT_MAX_UPLOAD_MB.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb.unwrap_or(DEFAULT_MAX_UPLOAD_MB) * 1024 * 1024
    }

    /// Returns the storage bucket name. Defaults to "exams".
    pub fn storage_bucket_or_default(&self) -> String {
        self.storage_bucket
            .clone()
            .unwrap_or_else(|| DEFAULT_STORAGE_BUCKET.to_string())
    }

    /// Returns the data directory. Defaults to "./data".
    pub fn data_dir_or_default(&self) -> String {
        self.data_dir.clone().unwrap_or_else(|| "./data".to_string())
    }

    /// Selected transport. Unknown values fall back to the storage variant.
    pub fn transport_kind(&self) -> TransportKind {
        match self.transport.as_deref() {
            Some("inline") => TransportKind::Inline,
            _ => TransportKind::Storage,
        }
    }

    /// True if the script endpoints needed by the inline transport are set.
    pub fn is_inline_configured(&self) -> bool {
        self.registration_endpoint.is_some() && self.exams_endpoint.is_some()
    }

    /// True if the hosted platform credentials are set.
    pub fn is_supabase_configured(&self) -> bool {
        self.supabase_url.is_some() && self.supabase_anon_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.max_upload_bytes(), 45 * 1024 * 1024);
        assert_eq!(cfg.storage_bucket_or_default(), "exams");
        assert_eq!(cfg.transport_kind(), TransportKind::Storage);
        assert!(!cfg.is_inline_configured());
        assert!(!cfg.is_supabase_configured());
    }

    #[test]
    fn transport_parsing() {
        let cfg = AppConfig {
            transport: Some("inline".to_string()),
            ..Default::default()
        };
        assert_eq!(cfg.transport_kind(), TransportKind::Inline);

        let cfg = AppConfig {
            transport: Some("bogus".to_string()),
            ..Default::default()
        };
        assert_eq!(cfg.transport_kind(), TransportKind::Storage);
    }
}
