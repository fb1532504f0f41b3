//! Exam pipeline: collect fields + files -> validate -> encode -> submit.
//!
//! The two file transforms run concurrently (independent, no shared
//! state) and are joined before the composite record is sent. Any
//! failure aborts the whole attempt; nothing partial is persisted by
//! this side.

use crate::domain::{DomainError, ExamDraft, ExamSubmission, FileRole, ValidationError, validation};
use crate::ports::{FileStorePort, SubmissionPort};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Exam submission service.
pub struct ExamService {
    store: Arc<dyn FileStorePort>,
    submission: Arc<dyn SubmissionPort>,
    max_upload_bytes: u64,
}

impl ExamService {
    pub fn new(
        store: Arc<dyn FileStorePort>,
        submission: Arc<dyn SubmissionPort>,
        max_upload_bytes: u64,
    ) -> Self {
        Self {
            store,
            submission,
            max_upload_bytes,
        }
    }

    /// Validate, encode both files, then deliver once. The draft stays
    /// with the caller so a failed attempt keeps the form state.
    pub async fn submit(&self, draft: &ExamDraft) -> Result<(), DomainError> {
        let group = validation::validate_exam(draft, self.max_upload_bytes)?;

        // Guaranteed present after validation.
        let theory_file = draft
            .theory_file
            .as_ref()
            .ok_or(ValidationError::MissingFile(FileRole::Theory))?;
        let performance_file = draft
            .performance_file
            .as_ref()
            .ok_or(ValidationError::MissingFile(FileRole::Performance))?;
        let student_id = draft
            .student_id
            .ok_or(ValidationError::MissingField("student"))?;

        // Join, not race: both must complete before anything is sent.
        let (theory, performance) = tokio::try_join!(
            self.store.store(group, theory_file),
            self.store.store(group, performance_file)
        )?;

        let record = ExamSubmission {
            student_id,
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            group,
            theory_answer: draft.theory_answer.trim().to_string(),
            theory,
            performance,
            submitted_at: Utc::now(),
        };

        self.submission.submit_exam(&record).await?;

        info!(
            student_id,
            group = %group,
            theory_file = %theory_file.name,
            performance_file = %performance_file.name,
            "exam submitted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryBackend;
    use crate::domain::FileAttachment;
    use crate::ports::RecordQueryPort;

    const LIMIT: u64 = 1024;

    fn attachment(name: &str, mime: &str, len: usize) -> FileAttachment {
        FileAttachment {
            name: name.to_string(),
            mime: mime.to_string(),
            bytes: vec![0u8; len],
        }
    }

    fn valid_draft() -> ExamDraft {
        ExamDraft {
            student_id: Some(7),
            first_name: "Ana".to_string(),
            last_name: "Lee".to_string(),
            group_name: "V".to_string(),
            theory_answer: " Cadence analysis ".to_string(),
            theory_file: Some(attachment("theory.pdf", "application/pdf", 64)),
            performance_file: Some(attachment("piece.mp4", "video/mp4", 128)),
        }
    }

    fn service(backend: &Arc<MemoryBackend>) -> ExamService {
        ExamService::new(backend.clone(), backend.clone(), LIMIT)
    }

    #[tokio::test]
    async fn valid_exam_is_encoded_and_stored_once() {
        let backend = Arc::new(MemoryBackend::new());
        service(&backend).submit(&valid_draft()).await.unwrap();

        assert_eq!(backend.exam_count().await, 1);
        let rows = backend.fetch_exams().await.unwrap();
        assert_eq!(rows[0].student_id, Some(7));
        assert_eq!(rows[0].group_name.as_deref(), Some("V"));
        assert_eq!(rows[0].theory_answer.as_deref(), Some("Cadence analysis"));
        assert_eq!(rows[0].exam_file_url.as_deref(), Some("memory://V/theory.pdf"));
        assert_eq!(
            rows[0].performance_file_url.as_deref(),
            Some("memory://V/piece.mp4")
        );
    }

    #[tokio::test]
    async fn oversized_file_aborts_before_any_call() {
        let backend = Arc::new(MemoryBackend::new());
        let mut draft = valid_draft();
        draft.performance_file = Some(attachment("big.mp4", "video/mp4", (LIMIT + 1) as usize));

        let err = service(&backend).submit(&draft).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationError::FileTooLarge { .. })
        ));
        assert_eq!(backend.exam_count().await, 0);
    }

    #[tokio::test]
    async fn missing_file_aborts_before_any_call() {
        let backend = Arc::new(MemoryBackend::new());
        let mut draft = valid_draft();
        draft.theory_file = None;

        let err = service(&backend).submit(&draft).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationError::MissingFile(FileRole::Theory))
        ));
        assert_eq!(backend.exam_count().await, 0);
    }
}
