//! Registration pipeline: collect fields -> validate -> submit.
//!
//! One attempt per user action. Validation is local; a rejected draft
//! produces zero network activity and keeps the form state for
//! correction.

use crate::domain::{DomainError, Registration, RegistrationDraft, validation};
use crate::ports::SubmissionPort;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Registration service. Coordinates validation and submission.
pub struct RegistrationService {
    submission: Arc<dyn SubmissionPort>,
}

impl RegistrationService {
    pub fn new(submission: Arc<dyn SubmissionPort>) -> Self {
        Self { submission }
    }

    /// Validate the draft against the current date and, if it passes,
    /// deliver it once. Returns the accepted record so the caller can
    /// report the outcome and reset the form.
    pub async fn submit(&self, draft: &RegistrationDraft) -> Result<Registration, DomainError> {
        let today = Utc::now().date_naive();
        let record = validation::validate_registration(draft, today)?;

        self.submission.submit_registration(&record).await?;

        info!(
            first_name = %record.first_name,
            last_name = %record.last_name,
            age = validation::age_on(record.birth_date, today),
            course = %record.course_type,
            "registration accepted"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryBackend;
    use crate::domain::ValidationError;
    use chrono::{Datelike, NaiveDate};

    fn draft_aged(years_ago: i32) -> RegistrationDraft {
        let today = Utc::now().date_naive();
        let birth = NaiveDate::from_ymd_opt(today.year() - years_ago, today.month(), today.day())
            .or_else(|| NaiveDate::from_ymd_opt(today.year() - years_ago, today.month(), 28))
            .unwrap();
        RegistrationDraft {
            first_name: "Ana".to_string(),
            last_name: "Lee".to_string(),
            birth_date: Some(birth),
            church: "X".to_string(),
            pastor_name: "Y".to_string(),
            pastor_phone: "555-123-4567".to_string(),
            course_type: "G".to_string(),
        }
    }

    #[tokio::test]
    async fn valid_draft_produces_exactly_one_submission() {
        let backend = Arc::new(MemoryBackend::new());
        let service = RegistrationService::new(backend.clone());

        let record = service.submit(&draft_aged(14)).await.unwrap();
        assert_eq!(record.first_name, "Ana");
        assert_eq!(backend.registration_count().await, 1);
    }

    #[tokio::test]
    async fn underage_draft_makes_no_network_call() {
        let backend = Arc::new(MemoryBackend::new());
        let service = RegistrationService::new(backend.clone());

        let err = service.submit(&draft_aged(12)).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationError::Underage(12))
        ));
        assert_eq!(backend.registration_count().await, 0);
    }

    #[tokio::test]
    async fn missing_field_makes_no_network_call() {
        let backend = Arc::new(MemoryBackend::new());
        let service = RegistrationService::new(backend.clone());

        let mut draft = draft_aged(14);
        draft.church = String::new();
        let err = service.submit(&draft).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationError::MissingField("church"))
        ));
        assert_eq!(backend.registration_count().await, 0);
    }
}
