//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these. The three inner enums
//! mirror the stages of a submission attempt: validate, encode, submit.

use crate::domain::entities::FileRole;
use thiserror::Error;

/// Validation rejections. Short-circuiting: a candidate record carries at
/// most one of these, the first rule that failed.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must be one of the known group codes, got \"{value}\"")]
    InvalidGroup { field: &'static str, value: String },

    #[error("student must be at least 13 years old to register (currently {0})")]
    Underage(i32),

    #[error("phone number must have at least 9 digits (found {0})")]
    InvalidPhone(usize),

    #[error("please attach a {0} file")]
    MissingFile(FileRole),

    #[error("{role} file type \"{mime}\" is not accepted")]
    InvalidFileType { role: FileRole, mime: String },

    #[error("{role} file is too large: {size} bytes (limit {limit})")]
    FileTooLarge { role: FileRole, size: u64, limit: u64 },
}

/// File-transform failures: reading/encoding for the inline transport, or
/// uploading to the object store. Terminal for the submission attempt.
#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("could not read file: {0}")]
    FileRead(String),

    #[error("upload failed: {0}")]
    Upload(String),
}

/// Submission failures. At-most-one delivery attempt; the user resubmits
/// manually after any of these.
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server rejected submission: {0}")]
    ServerRejected(String),
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// Dashboard read path. Surfaced to the user; retry is manual.
    #[error("failed to load data: {0}")]
    Fetch(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("input error: {0}")]
    Input(String),
}
