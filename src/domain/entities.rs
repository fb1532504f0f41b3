//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/terminal types here; adapters map into these.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Class cohort. The fixed set of group codes shared by registration
/// (course type) and exams (group name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupCode {
    G,
    B,
    V,
    A,
    Armonie,
}

impl GroupCode {
    pub const ALL: [GroupCode; 5] = [
        GroupCode::G,
        GroupCode::B,
        GroupCode::V,
        GroupCode::A,
        GroupCode::Armonie,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupCode::G => "G",
            GroupCode::B => "B",
            GroupCode::V => "V",
            GroupCode::A => "A",
            GroupCode::Armonie => "Armonie",
        }
    }

    /// Parse a raw form value. Returns `None` for anything outside the set.
    pub fn parse(value: &str) -> Option<GroupCode> {
        GroupCode::ALL.iter().copied().find(|g| g.as_str() == value)
    }
}

impl std::fmt::Display for GroupCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw registration form state. Collected by the UI, not yet validated.
#[derive(Debug, Clone, Default)]
pub struct RegistrationDraft {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub church: String,
    pub pastor_name: String,
    pub pastor_phone: String,
    pub course_type: String,
}

/// A registration that passed validation. Ready for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub church: String,
    pub pastor_name: String,
    pub pastor_phone: String,
    pub course_type: GroupCode,
}

/// Which of the two exam uploads a file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Theory,
    Performance,
}

impl std::fmt::Display for FileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileRole::Theory => f.write_str("theory"),
            FileRole::Performance => f.write_str("performance"),
        }
    }
}

/// A file attached to an exam draft: original name, declared MIME type,
/// and full content.
#[derive(Debug, Clone)]
pub struct FileAttachment {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FileAttachment {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Original filename extension, if any.
    pub fn extension(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(_, ext)| ext)
    }
}

/// What a stored file looks like to the submission payload: either the
/// content itself (base64, inline transport) or a durable URL returned by
/// the object store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileReference {
    Inline {
        name: String,
        mime: String,
        data: String,
    },
    Stored {
        url: String,
    },
}

/// Raw exam form state. `student_id` references a previously created
/// registration; names are denormalized from the selected student.
#[derive(Debug, Clone, Default)]
pub struct ExamDraft {
    pub student_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub group_name: String,
    pub theory_answer: String,
    pub theory_file: Option<FileAttachment>,
    pub performance_file: Option<FileAttachment>,
}

/// A validated, fully encoded exam record. One submission attempt each.
#[derive(Debug, Clone)]
pub struct ExamSubmission {
    pub student_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub group: GroupCode,
    pub theory_answer: String,
    pub theory: FileReference,
    pub performance: FileReference,
    /// Client-side timestamp sent with the payload. The remote system
    /// assigns the authoritative `created_at`.
    pub submitted_at: DateTime<Utc>,
}

/// Registration row as returned by the record query interface.
/// Remote columns are nullable, hence the Options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub church: Option<String>,
    pub pastor_name: Option<String>,
    pub pastor_phone: Option<String>,
    pub course_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Exam row as returned by the record query interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamRecord {
    pub id: i64,
    pub student_id: Option<i64>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub group_name: Option<String>,
    pub theory_answer: Option<String>,
    pub exam_file_url: Option<String>,
    pub performance_file_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_code_parses_exact_names_only() {
        assert_eq!(GroupCode::parse("G"), Some(GroupCode::G));
        assert_eq!(GroupCode::parse("Armonie"), Some(GroupCode::Armonie));
        assert_eq!(GroupCode::parse("armonie"), None);
        assert_eq!(GroupCode::parse(""), None);
        assert_eq!(GroupCode::parse("X"), None);
    }

    #[test]
    fn attachment_extension() {
        let file = FileAttachment {
            name: "sonata.final.pdf".to_string(),
            mime: "application/pdf".to_string(),
            bytes: vec![1, 2, 3],
        };
        assert_eq!(file.extension(), Some("pdf"));
        assert_eq!(file.size(), 3);

        let bare = FileAttachment {
            name: "noext".to_string(),
            mime: "application/octet-stream".to_string(),
            bytes: vec![],
        };
        assert_eq!(bare.extension(), None);
    }
}
