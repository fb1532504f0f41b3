//! In-memory backend for development and testing without remote services.
//!
//! Implements all three outbound ports. Used automatically when the
//! selected transport is not fully configured, and by use-case tests to
//! count delivery attempts.

use crate::domain::{
    DomainError, ExamRecord, ExamSubmission, FileAttachment, FileReference, GroupCode,
    Registration, RegistrationRecord,
};
use crate::ports::{FileStorePort, RecordQueryPort, SubmissionPort};
use chrono::Utc;
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::Mutex;
use tracing::info;

/// Mock backend: append-only vectors behind a lock, newest first.
#[derive(Default)]
pub struct MemoryBackend {
    registrations: Mutex<Vec<RegistrationRecord>>,
    exams: Mutex<Vec<ExamRecord>>,
    next_id: AtomicI64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            registrations: Mutex::new(Vec::new()),
            exams: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of registrations accepted so far. Test hook.
    pub async fn registration_count(&self) -> usize {
        self.registrations.lock().await.len()
    }

    /// Number of exams accepted so far. Test hook.
    pub async fn exam_count(&self) -> usize {
        self.exams.lock().await.len()
    }
}

#[async_trait::async_trait]
impl SubmissionPort for MemoryBackend {
    async fn submit_registration(&self, record: &Registration) -> Result<(), DomainError> {
        let row = RegistrationRecord {
            id: self.allocate_id(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            birth_date: Some(record.birth_date),
            church: Some(record.church.clone()),
            pastor_name: Some(record.pastor_name.clone()),
            pastor_phone: Some(record.pastor_phone.clone()),
            course_type: Some(record.course_type.as_str().to_string()),
            created_at: Some(Utc::now()),
        };
        info!(id = row.id, "[MEMORY] registration stored");
        self.registrations.lock().await.insert(0, row);
        Ok(())
    }

    async fn submit_exam(&self, record: &ExamSubmission) -> Result<(), DomainError> {
        let url_of = |reference: &FileReference| match reference {
            FileReference::Stored { url } => Some(url.clone()),
            FileReference::Inline { name, .. } => Some(format!("memory://inline/{}", name)),
        };
        let row = ExamRecord {
            id: self.allocate_id(),
            student_id: Some(record.student_id),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            group_name: Some(record.group.as_str().to_string()),
            theory_answer: Some(record.theory_answer.clone()),
            exam_file_url: url_of(&record.theory),
            performance_file_url: url_of(&record.performance),
            created_at: Some(Utc::now()),
        };
        info!(id = row.id, "[MEMORY] exam stored");
        self.exams.lock().await.insert(0, row);
        Ok(())
    }
}

#[async_trait::async_trait]
impl FileStorePort for MemoryBackend {
    async fn store(
        &self,
        group: GroupCode,
        file: &FileAttachment,
    ) -> Result<FileReference, DomainError> {
        Ok(FileReference::Stored {
            url: format!("memory://{}/{}", group, file.name),
        })
    }
}

#[async_trait::async_trait]
impl RecordQueryPort for MemoryBackend {
    async fn fetch_registrations(&self) -> Result<Vec<RegistrationRecord>, DomainError> {
        Ok(self.registrations.lock().await.clone())
    }

    async fn fetch_exams(&self) -> Result<Vec<ExamRecord>, DomainError> {
        Ok(self.exams.lock().await.clone())
    }

    async fn download_file(&self, url: &str, _dest: &Path) -> Result<(), DomainError> {
        Err(DomainError::Fetch(format!(
            "downloads are not available in memory mode ({})",
            url
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn registration(first: &str) -> Registration {
        Registration {
            first_name: first.to_string(),
            last_name: "Lee".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2010, 6, 15).unwrap(),
            church: "Hope".to_string(),
            pastor_name: "Y".to_string(),
            pastor_phone: "555-123-4567".to_string(),
            course_type: GroupCode::G,
        }
    }

    #[tokio::test]
    async fn stores_and_returns_newest_first() {
        let backend = MemoryBackend::new();
        backend.submit_registration(&registration("Ana")).await.unwrap();
        backend.submit_registration(&registration("Bogdan")).await.unwrap();

        let rows = backend.fetch_registrations().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].first_name, "Bogdan");
        assert_eq!(rows[1].first_name, "Ana");
        assert!(rows[0].id > rows[1].id);
    }

    #[tokio::test]
    async fn file_store_produces_stored_reference() {
        let backend = MemoryBackend::new();
        let file = FileAttachment {
            name: "piece.mp4".to_string(),
            mime: "video/mp4".to_string(),
            bytes: vec![0; 8],
        };
        let reference = backend.store(GroupCode::V, &file).await.unwrap();
        assert_eq!(
            reference,
            FileReference::Stored {
                url: "memory://V/piece.mp4".to_string()
            }
        );
    }
}
