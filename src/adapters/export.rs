//! CSV export of dashboard tables. Uses the `csv` crate for safe
//! serialization (quoting, escaping).

use crate::domain::{ExamRecord, RegistrationRecord};
use chrono::{DateTime, NaiveDate, Utc};

fn date_cell(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn day_cell(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn opt_cell(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

fn into_string(wtr: csv::Writer<Vec<u8>>) -> Result<String, csv::Error> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?;
    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })
}

/// Serialize registration rows (as currently filtered/sorted) to CSV.
pub fn registrations_to_csv(records: &[RegistrationRecord]) -> Result<String, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "Date",
        "First Name",
        "Last Name",
        "Birth Date",
        "Church",
        "Pastor",
        "Phone",
        "Course",
    ])?;

    for r in records {
        wtr.write_record([
            date_cell(r.created_at).as_str(),
            &r.first_name,
            &r.last_name,
            day_cell(r.birth_date).as_str(),
            opt_cell(&r.church),
            opt_cell(&r.pastor_name),
            opt_cell(&r.pastor_phone),
            opt_cell(&r.course_type),
        ])?;
    }

    wtr.flush()?;
    into_string(wtr)
}

/// Serialize exam rows (as currently filtered/sorted) to CSV. The theory
/// answer is flattened to a single line.
pub fn exams_to_csv(records: &[ExamRecord]) -> Result<String, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "Date",
        "First Name",
        "Last Name",
        "Group",
        "Theory Answer",
        "Exam File",
        "Performance File",
    ])?;

    for e in records {
        let theory = e
            .theory_answer
            .as_deref()
            .unwrap_or("-")
            .replace('\n', " ")
            .replace('\r', "");
        wtr.write_record([
            date_cell(e.created_at).as_str(),
            &e.first_name,
            &e.last_name,
            opt_cell(&e.group_name),
            &theory,
            opt_cell(&e.exam_file_url),
            opt_cell(&e.performance_file_url),
        ])?;
    }

    wtr.flush()?;
    into_string(wtr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn registrations_csv_has_header_and_rows() {
        let records = vec![RegistrationRecord {
            id: 1,
            first_name: "Ana".to_string(),
            last_name: "Lee".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2010, 6, 15),
            church: Some("Hope".to_string()),
            pastor_name: None,
            pastor_phone: Some("555-123-4567".to_string()),
            course_type: Some("G".to_string()),
            created_at: Some(Utc.with_ymd_and_hms(2026, 3, 10, 9, 30, 0).unwrap()),
        }];

        let csv = registrations_to_csv(&records).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("Date,First Name"));
        let row = lines.next().unwrap();
        assert!(row.contains("2026-03-10 09:30"));
        assert!(row.contains("Ana"));
        assert!(row.contains("2010-06-15"));
        // Missing pastor name renders as a dash.
        assert!(row.contains("-"));
    }

    #[test]
    fn exams_csv_flattens_multiline_answers() {
        let records = vec![ExamRecord {
            id: 1,
            student_id: Some(7),
            first_name: "Ana".to_string(),
            last_name: "Lee".to_string(),
            group_name: Some("Armonie".to_string()),
            theory_answer: Some("line one\nline two".to_string()),
            exam_file_url: None,
            performance_file_url: Some("https://x/p.mp4".to_string()),
            created_at: None,
        }];

        let csv = exams_to_csv(&records).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("line one line two"));
        assert!(csv.contains("https://x/p.mp4"));
    }
}
