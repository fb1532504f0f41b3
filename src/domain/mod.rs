//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod listing;
pub mod validation;

pub use entities::{
    ExamDraft, ExamRecord, ExamSubmission, FileAttachment, FileReference, FileRole, GroupCode,
    Registration, RegistrationDraft, RegistrationRecord,
};
pub use errors::{DomainError, EncodingError, SubmissionError, ValidationError};
