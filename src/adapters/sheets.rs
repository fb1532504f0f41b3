//! Spreadsheet-script adapter. Implements SubmissionPort against the two
//! hosted Apps-Script endpoints.
//!
//! Registration is a single form-encoded field carrying the JSON payload
//! and is acknowledgment-only. Exams POST a JSON body (inline base64
//! files) and the response's `status` field must be the literal "success".

use crate::domain::{
    DomainError, ExamSubmission, FileReference, Registration, SubmissionError,
};
use crate::ports::SubmissionPort;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{info, warn};

/// Literal success marker the script returns in its JSON body.
const SUCCESS_STATUS: &str = "success";

/// Script-endpoint submission client.
pub struct SheetsSubmission {
    client: Client,
    registration_url: String,
    exams_url: String,
}

impl SheetsSubmission {
    pub fn new(client: Client, registration_url: String, exams_url: String) -> Self {
        Self {
            client,
            registration_url,
            exams_url,
        }
    }

    fn registration_payload(record: &Registration) -> Value {
        json!({
            "firstName": record.first_name,
            "lastName": record.last_name,
            "birthDate": record.birth_date.format("%Y-%m-%d").to_string(),
            "church": record.church,
            "churchServantName": record.pastor_name,
            "churchServantPhone": record.pastor_phone,
            "courseType": record.course_type.as_str(),
        })
    }

    fn exam_payload(record: &ExamSubmission) -> Value {
        let mut payload = json!({
            "studentId": record.student_id,
            "firstName": record.first_name,
            "lastName": record.last_name,
            "group": record.group.as_str(),
            "theoryAnswer": record.theory_answer,
            "timestamp": record.submitted_at.to_rfc3339(),
        });
        Self::attach_file(&mut payload, "theory", &record.theory);
        Self::attach_file(&mut payload, "performance", &record.performance);
        payload
    }

    fn attach_file(payload: &mut Value, prefix: &str, reference: &FileReference) {
        match reference {
            FileReference::Inline { name, mime, data } => {
                payload[format!("{prefix}FileName")] = json!(name);
                payload[format!("{prefix}FileType")] = json!(mime);
                payload[format!("{prefix}FileData")] = json!(data);
            }
            FileReference::Stored { url } => {
                payload[format!("{prefix}FileUrl")] = json!(url);
            }
        }
    }
}

/// Shape of the script's JSON response.
#[derive(serde::Deserialize, Default)]
struct ScriptResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
}

#[async_trait::async_trait]
impl SubmissionPort for SheetsSubmission {
    async fn submit_registration(&self, record: &Registration) -> Result<(), DomainError> {
        let payload = Self::registration_payload(record);
        let body = serde_json::to_string(&payload)
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        // Fire-and-forget: the endpoint acknowledges without a readable
        // body, so only transport failures count.
        self.client
            .post(&self.registration_url)
            .form(&[("data", body)])
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        info!(
            first_name = %record.first_name,
            last_name = %record.last_name,
            course = %record.course_type,
            "registration sent to script endpoint"
        );
        Ok(())
    }

    async fn submit_exam(&self, record: &ExamSubmission) -> Result<(), DomainError> {
        let payload = Self::exam_payload(record);

        let res = self
            .client
            .post(&self.exams_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            warn!(%status, body = %text, "exam endpoint returned error");
            return Err(SubmissionError::ServerRejected(format!("{}: {}", status, text)).into());
        }

        // A success-shaped body must still carry the literal marker.
        let parsed: ScriptResponse = res.json().await.unwrap_or_default();
        if parsed.status != SUCCESS_STATUS {
            warn!(status = %parsed.status, message = %parsed.message, "exam submission not accepted");
            return Err(SubmissionError::ServerRejected(if parsed.message.is_empty() {
                "upload failed".to_string()
            } else {
                parsed.message
            })
            .into());
        }

        info!(
            student_id = record.student_id,
            group = %record.group,
            "exam submitted to script endpoint"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GroupCode;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn registration_payload_uses_script_field_names() {
        let record = Registration {
            first_name: "Ana".to_string(),
            last_name: "Lee".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2010, 6, 15).unwrap(),
            church: "Hope".to_string(),
            pastor_name: "Y".to_string(),
            pastor_phone: "555-123-4567".to_string(),
            course_type: GroupCode::G,
        };
        let payload = SheetsSubmission::registration_payload(&record);
        assert_eq!(payload["firstName"], "Ana");
        assert_eq!(payload["birthDate"], "2010-06-15");
        assert_eq!(payload["churchServantName"], "Y");
        assert_eq!(payload["churchServantPhone"], "555-123-4567");
        assert_eq!(payload["courseType"], "G");
    }

    #[test]
    fn exam_payload_carries_inline_files_and_timestamp() {
        let record = ExamSubmission {
            student_id: 7,
            first_name: "Ana".to_string(),
            last_name: "Lee".to_string(),
            group: GroupCode::Armonie,
            theory_answer: "Cadence analysis".to_string(),
            theory: FileReference::Inline {
                name: "theory.pdf".to_string(),
                mime: "application/pdf".to_string(),
                data: "QUJD".to_string(),
            },
            performance: FileReference::Stored {
                url: "https://files.example/p.mp4".to_string(),
            },
            submitted_at: Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap(),
        };
        let payload = SheetsSubmission::exam_payload(&record);
        assert_eq!(payload["group"], "Armonie");
        assert_eq!(payload["theoryFileName"], "theory.pdf");
        assert_eq!(payload["theoryFileType"], "application/pdf");
        assert_eq!(payload["theoryFileData"], "QUJD");
        assert_eq!(payload["performanceFileUrl"], "https://files.example/p.mp4");
        assert_eq!(payload["timestamp"], "2026-03-10T12:00:00+00:00");
        assert_eq!(payload["theoryAnswer"], "Cadence analysis");
    }
}
