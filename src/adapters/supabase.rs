//! Hosted-platform adapter (Supabase REST). Implements SubmissionPort and
//! RecordQueryPort over the `registrations` and `exams` tables.
//!
//! The client is constructed once at startup and injected; there is no
//! lazily-populated global.

use crate::domain::{
    DomainError, ExamRecord, ExamSubmission, FileReference, Registration, RegistrationRecord,
    SubmissionError,
};
use crate::ports::RecordQueryPort;
use crate::ports::SubmissionPort;
use reqwest::Client;
use serde_json::json;
use std::path::Path;
use tracing::{info, warn};

/// REST client for the hosted backend.
pub struct SupabaseRest {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseRest {
    pub fn new(client: Client, base_url: String, anon_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
    }

    async fn insert(&self, table: &str, row: serde_json::Value) -> Result<(), DomainError> {
        let res = self
            .authed(self.client.post(self.table_url(table)))
            .header("Prefer", "return=minimal")
            .json(&json!([row]))
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            warn!(table, %status, body = %text, "insert rejected");
            return Err(SubmissionError::ServerRejected(format!("{}: {}", status, text)).into());
        }
        Ok(())
    }

    async fn select_desc<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
    ) -> Result<Vec<T>, DomainError> {
        let res = self
            .authed(self.client.get(self.table_url(table)))
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await
            .map_err(|e| DomainError::Fetch(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            return Err(DomainError::Fetch(format!("{} {}: {}", table, status, text)));
        }

        res.json().await.map_err(|e| DomainError::Fetch(e.to_string()))
    }

    /// Stored URL of an encoded file. The hosted backend persists URLs
    /// only; an inline reference here means the wiring paired the wrong
    /// encoder with this submission client.
    fn stored_url(reference: &FileReference) -> Result<&str, DomainError> {
        match reference {
            FileReference::Stored { url } => Ok(url),
            FileReference::Inline { .. } => Err(DomainError::Config(
                "hosted backend requires object-store file references".to_string(),
            )),
        }
    }
}

#[async_trait::async_trait]
impl SubmissionPort for SupabaseRest {
    async fn submit_registration(&self, record: &Registration) -> Result<(), DomainError> {
        let row = json!({
            "first_name": record.first_name,
            "last_name": record.last_name,
            "birth_date": record.birth_date.format("%Y-%m-%d").to_string(),
            "church": record.church,
            "pastor_name": record.pastor_name,
            "pastor_phone": record.pastor_phone,
            "course_type": record.course_type.as_str(),
        });
        self.insert("registrations", row).await?;
        info!(
            first_name = %record.first_name,
            last_name = %record.last_name,
            course = %record.course_type,
            "registration inserted"
        );
        Ok(())
    }

    async fn submit_exam(&self, record: &ExamSubmission) -> Result<(), DomainError> {
        let row = json!({
            "student_id": record.student_id,
            "first_name": record.first_name,
            "last_name": record.last_name,
            "group_name": record.group.as_str(),
            "theory_answer": record.theory_answer,
            "exam_file_url": Self::stored_url(&record.theory)?,
            "performance_file_url": Self::stored_url(&record.performance)?,
        });
        self.insert("exams", row).await?;
        info!(
            student_id = record.student_id,
            group = %record.group,
            "exam inserted"
        );
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordQueryPort for SupabaseRest {
    async fn fetch_registrations(&self) -> Result<Vec<RegistrationRecord>, DomainError> {
        self.select_desc("registrations").await
    }

    async fn fetch_exams(&self) -> Result<Vec<ExamRecord>, DomainError> {
        self.select_desc("exams").await
    }

    async fn download_file(&self, url: &str, dest: &Path) -> Result<(), DomainError> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::Fetch(e.to_string()))?;

        if !res.status().is_success() {
            return Err(DomainError::Fetch(format!(
                "download failed with status {}",
                res.status()
            )));
        }

        let bytes = res.bytes().await.map_err(|e| DomainError::Fetch(e.to_string()))?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::Fetch(format!("create download dir: {}", e)))?;
        }
        tokio::fs::write(dest, &bytes)
            .await
            .map_err(|e| DomainError::Fetch(format!("write download: {}", e)))?;

        info!(url, dest = %dest.display(), bytes = bytes.len(), "file downloaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_url_and_trailing_slash() {
        let rest = SupabaseRest::new(
            Client::new(),
            "https://example.supabase.co/".to_string(),
            "anon".to_string(),
        );
        assert_eq!(
            rest.table_url("registrations"),
            "https://example.supabase.co/rest/v1/registrations"
        );
    }

    #[test]
    fn inline_reference_is_a_wiring_error() {
        let inline = FileReference::Inline {
            name: "a.pdf".to_string(),
            mime: "application/pdf".to_string(),
            data: "QQ==".to_string(),
        };
        assert!(matches!(
            SupabaseRest::stored_url(&inline),
            Err(DomainError::Config(_))
        ));

        let stored = FileReference::Stored {
            url: "https://x/y.pdf".to_string(),
        };
        assert_eq!(SupabaseRest::stored_url(&stored).unwrap(), "https://x/y.pdf");
    }
}
