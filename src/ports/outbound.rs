//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{
    DomainError, ExamRecord, ExamSubmission, FileAttachment, FileReference, GroupCode,
    Registration, RegistrationRecord,
};
use std::path::Path;

/// File store port: turn a validated attachment into the reference the
/// submission payload carries. Two strategies exist: inline base64 for
/// the spreadsheet-script endpoint, and direct upload to object storage
/// returning a durable public URL. Exactly one is active per deployment.
#[async_trait::async_trait]
pub trait FileStorePort: Send + Sync {
    /// Encode or upload one attachment. `group` keys the storage folder
    /// for the upload strategy. A failure is terminal for the submission
    /// attempt; there is no retry or resume.
    async fn store(
        &self,
        group: GroupCode,
        file: &FileAttachment,
    ) -> Result<FileReference, DomainError>;
}

/// Submission port: one delivery attempt per user action, no retries and
/// no idempotency key. The remote side owns atomicity of its writes.
#[async_trait::async_trait]
pub trait SubmissionPort: Send + Sync {
    /// Persist a validated registration record.
    async fn submit_registration(&self, record: &Registration) -> Result<(), DomainError>;

    /// Persist a validated, fully encoded exam record. Both file
    /// references must already be resolved.
    async fn submit_exam(&self, record: &ExamSubmission) -> Result<(), DomainError>;
}

/// Record query port. Dashboard read path: two immutable snapshots ordered
/// by creation time descending. A re-fetch replaces the previous snapshot
/// wholesale.
#[async_trait::async_trait]
pub trait RecordQueryPort: Send + Sync {
    async fn fetch_registrations(&self) -> Result<Vec<RegistrationRecord>, DomainError>;

    async fn fetch_exams(&self) -> Result<Vec<ExamRecord>, DomainError>;

    /// Download a stored file (by its public URL) to a local path.
    async fn download_file(&self, url: &str, dest: &Path) -> Result<(), DomainError>;
}
