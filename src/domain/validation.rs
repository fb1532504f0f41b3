//! Form validation rules. Pure functions of the candidate record plus an
//! injected "today": no clock reads, no I/O, deterministic.
//!
//! Validation short-circuits: rules run in a fixed order and the first
//! failure is returned. Both entry points (registration and exam) share
//! this module so the rule set cannot diverge between the two flows.

use crate::domain::entities::{
    ExamDraft, FileAttachment, FileRole, GroupCode, Registration, RegistrationDraft,
};
use crate::domain::errors::ValidationError;
use chrono::{Datelike, NaiveDate};

/// Minimum student age in whole years at submission time.
pub const MIN_AGE_YEARS: i32 = 13;

/// Minimum digits in the contact phone number after stripping separators.
pub const MIN_PHONE_DIGITS: usize = 9;

/// Accepted MIME types for the theory upload.
pub const THEORY_MIME_TYPES: &[&str] = &["application/pdf", "image/jpeg", "image/png"];

/// Accepted MIME types for the performance upload.
pub const PERFORMANCE_MIME_TYPES: &[&str] =
    &["video/mp4", "video/quicktime", "audio/mpeg", "audio/wav"];

/// Whole years between `birth` and `today`, calendar-aware: the year
/// difference, minus one if today's month/day precedes the birth
/// month/day. The age increments exactly on the anniversary date.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Count of digit characters in a raw phone string. Separators, spaces,
/// and prefixes like `+` are ignored.
pub fn phone_digit_count(raw: &str) -> usize {
    raw.chars().filter(|c| c.is_ascii_digit()).count()
}

fn require<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed)
}

fn require_group(value: &str, field: &'static str) -> Result<GroupCode, ValidationError> {
    GroupCode::parse(value.trim()).ok_or_else(|| ValidationError::InvalidGroup {
        field,
        value: value.trim().to_string(),
    })
}

/// Validate a registration draft against `today`. On success returns the
/// typed record ready for submission; on failure the draft is untouched so
/// the form can be corrected and resubmitted.
pub fn validate_registration(
    draft: &RegistrationDraft,
    today: NaiveDate,
) -> Result<Registration, ValidationError> {
    let first_name = require(&draft.first_name, "first name")?;
    let last_name = require(&draft.last_name, "last name")?;
    let birth_date = draft
        .birth_date
        .ok_or(ValidationError::MissingField("birth date"))?;
    let church = require(&draft.church, "church")?;
    let pastor_name = require(&draft.pastor_name, "pastor name")?;
    let pastor_phone = require(&draft.pastor_phone, "pastor phone")?;
    require(&draft.course_type, "course type")?;

    let course_type = require_group(&draft.course_type, "course type")?;

    let age = age_on(birth_date, today);
    if age < MIN_AGE_YEARS {
        return Err(ValidationError::Underage(age));
    }

    let digits = phone_digit_count(pastor_phone);
    if digits < MIN_PHONE_DIGITS {
        return Err(ValidationError::InvalidPhone(digits));
    }

    Ok(Registration {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        birth_date,
        church: church.to_string(),
        pastor_name: pastor_name.to_string(),
        pastor_phone: pastor_phone.to_string(),
        course_type,
    })
}

fn check_file_type(
    file: &FileAttachment,
    role: FileRole,
    allowed: &[&str],
) -> Result<(), ValidationError> {
    if !allowed.contains(&file.mime.as_str()) {
        return Err(ValidationError::InvalidFileType {
            role,
            mime: file.mime.clone(),
        });
    }
    Ok(())
}

fn check_file_size(
    file: &FileAttachment,
    role: FileRole,
    max_bytes: u64,
) -> Result<(), ValidationError> {
    if file.size() > max_bytes {
        return Err(ValidationError::FileTooLarge {
            role,
            size: file.size(),
            limit: max_bytes,
        });
    }
    Ok(())
}

/// Validate an exam draft. `max_file_bytes` is the configured upload
/// ceiling. Returns the parsed group code on success; the draft itself is
/// not consumed so a rejected form keeps its state.
///
/// Rule order: presence, group membership, file presence, file type, file
/// size. Each file rule runs for both roles (theory first) before the next
/// rule starts, so a type failure always wins over a size failure.
pub fn validate_exam(draft: &ExamDraft, max_file_bytes: u64) -> Result<GroupCode, ValidationError> {
    if draft.student_id.is_none() {
        return Err(ValidationError::MissingField("student"));
    }
    require(&draft.group_name, "group")?;
    require(&draft.theory_answer, "theory answer")?;

    let group = require_group(&draft.group_name, "group")?;

    let theory = draft
        .theory_file
        .as_ref()
        .ok_or(ValidationError::MissingFile(FileRole::Theory))?;
    let performance = draft
        .performance_file
        .as_ref()
        .ok_or(ValidationError::MissingFile(FileRole::Performance))?;

    check_file_type(theory, FileRole::Theory, THEORY_MIME_TYPES)?;
    check_file_type(performance, FileRole::Performance, PERFORMANCE_MIME_TYPES)?;

    check_file_size(theory, FileRole::Theory, max_file_bytes)?;
    check_file_size(performance, FileRole::Performance, max_file_bytes)?;

    Ok(group)
}
