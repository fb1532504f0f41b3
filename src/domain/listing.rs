//! Dashboard list shaping: search, group filter, sorting, statistics.
//!
//! Pure functions over fetched snapshots. Applied in a fixed order: group
//! filter (exams only), then search, then sort. Missing values always sort
//! after present ones regardless of direction; date keys compare parsed
//! dates, never their string form.

use crate::domain::entities::{ExamRecord, GroupCode, RegistrationRecord};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> SortDirection {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationSortKey {
    CreatedAt,
    FirstName,
    LastName,
    BirthDate,
    Church,
    PastorName,
    PastorPhone,
    CourseType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamSortKey {
    CreatedAt,
    FirstName,
    LastName,
    GroupName,
}

/// Null-aware comparison: present values compare in `dir`, missing values
/// trail in both directions.
fn cmp_option<T: Ord>(a: Option<&T>, b: Option<&T>, dir: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match dir {
            SortDirection::Asc => a.cmp(b),
            SortDirection::Desc => b.cmp(a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Case-insensitive substring search over first name, last name, church,
/// and pastor name.
pub fn filter_registrations(records: &[RegistrationRecord], search: &str) -> Vec<RegistrationRecord> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| {
            contains_ci(&r.first_name, &needle)
                || contains_ci(&r.last_name, &needle)
                || r.church.as_deref().is_some_and(|v| contains_ci(v, &needle))
                || r.pastor_name
                    .as_deref()
                    .is_some_and(|v| contains_ci(v, &needle))
        })
        .cloned()
        .collect()
}

/// Group equality filter (when selected), then case-insensitive substring
/// search over first name, last name, and group name.
pub fn filter_exams(
    records: &[ExamRecord],
    group: Option<GroupCode>,
    search: &str,
) -> Vec<ExamRecord> {
    let needle = search.trim().to_lowercase();
    records
        .iter()
        .filter(|e| match group {
            Some(g) => e.group_name.as_deref() == Some(g.as_str()),
            None => true,
        })
        .filter(|e| {
            if needle.is_empty() {
                return true;
            }
            contains_ci(&e.first_name, &needle)
                || contains_ci(&e.last_name, &needle)
                || e.group_name
                    .as_deref()
                    .is_some_and(|v| contains_ci(v, &needle))
        })
        .cloned()
        .collect()
}

/// Stable sort by the chosen key and direction.
pub fn sort_registrations(
    records: &mut [RegistrationRecord],
    key: RegistrationSortKey,
    dir: SortDirection,
) {
    records.sort_by(|a, b| match key {
        RegistrationSortKey::CreatedAt => cmp_option(a.created_at.as_ref(), b.created_at.as_ref(), dir),
        RegistrationSortKey::FirstName => cmp_option(Some(&a.first_name), Some(&b.first_name), dir),
        RegistrationSortKey::LastName => cmp_option(Some(&a.last_name), Some(&b.last_name), dir),
        RegistrationSortKey::BirthDate => cmp_option(a.birth_date.as_ref(), b.birth_date.as_ref(), dir),
        RegistrationSortKey::Church => cmp_option(a.church.as_ref(), b.church.as_ref(), dir),
        RegistrationSortKey::PastorName => cmp_option(a.pastor_name.as_ref(), b.pastor_name.as_ref(), dir),
        RegistrationSortKey::PastorPhone => {
            cmp_option(a.pastor_phone.as_ref(), b.pastor_phone.as_ref(), dir)
        }
        RegistrationSortKey::CourseType => cmp_option(a.course_type.as_ref(), b.course_type.as_ref(), dir),
    });
}

/// Stable sort by the chosen key and direction.
pub fn sort_exams(records: &mut [ExamRecord], key: ExamSortKey, dir: SortDirection) {
    records.sort_by(|a, b| match key {
        ExamSortKey::CreatedAt => cmp_option(a.created_at.as_ref(), b.created_at.as_ref(), dir),
        ExamSortKey::FirstName => cmp_option(Some(&a.first_name), Some(&b.first_name), dir),
        ExamSortKey::LastName => cmp_option(Some(&a.last_name), Some(&b.last_name), dir),
        ExamSortKey::GroupName => cmp_option(a.group_name.as_ref(), b.group_name.as_ref(), dir),
    });
}

/// Headline numbers for the dashboard.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_registrations: usize,
    pub total_exams: usize,
    pub today_registrations: usize,
    pub today_exams: usize,
    /// Exam count per group code, ordered by group label.
    pub group_counts: BTreeMap<String, usize>,
}

/// Compute totals, today's counts (`today` in UTC), and the per-group exam
/// distribution.
pub fn compute_stats(
    registrations: &[RegistrationRecord],
    exams: &[ExamRecord],
    today: NaiveDate,
) -> DashboardStats {
    let today_registrations = registrations
        .iter()
        .filter(|r| r.created_at.is_some_and(|t| t.date_naive() == today))
        .count();
    let today_exams = exams
        .iter()
        .filter(|e| e.created_at.is_some_and(|t| t.date_naive() == today))
        .count();

    let mut group_counts: BTreeMap<String, usize> = BTreeMap::new();
    for exam in exams {
        if let Some(group) = &exam.group_name {
            *group_counts.entry(group.clone()).or_insert(0) += 1;
        }
    }

    DashboardStats {
        total_registrations: registrations.len(),
        total_exams: exams.len(),
        today_registrations,
        today_exams,
        group_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(s: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(s, 0).unwrap()
    }

    fn reg(id: i64, first: &str, created: Option<i64>) -> RegistrationRecord {
        RegistrationRecord {
            id,
            first_name: first.to_string(),
            last_name: "Lee".to_string(),
            birth_date: None,
            church: Some("Hope".to_string()),
            pastor_name: Some("Pastor P".to_string()),
            pastor_phone: None,
            course_type: Some("G".to_string()),
            created_at: created.map(ts),
        }
    }

    fn exam(id: i64, group: Option<&str>, created: Option<i64>) -> ExamRecord {
        ExamRecord {
            id,
            student_id: Some(id),
            first_name: "Ana".to_string(),
            last_name: "Lee".to_string(),
            group_name: group.map(str::to_string),
            theory_answer: None,
            exam_file_url: None,
            performance_file_url: None,
            created_at: created.map(ts),
        }
    }

    #[test]
    fn search_is_case_insensitive() {
        let records = vec![reg(1, "Ana", None), reg(2, "Bogdan", None)];
        let hits = filter_registrations(&records, "aNa");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);

        // Searchable fields include church and pastor name.
        assert_eq!(filter_registrations(&records, "hope").len(), 2);
        assert_eq!(filter_registrations(&records, "pastor p").len(), 2);
        assert_eq!(filter_registrations(&records, "nobody").len(), 0);
    }

    #[test]
    fn empty_search_keeps_everything() {
        let records = vec![reg(1, "Ana", None), reg(2, "Bogdan", None)];
        assert_eq!(filter_registrations(&records, "  ").len(), 2);
    }

    #[test]
    fn exam_group_filter_is_equality() {
        let records = vec![
            exam(1, Some("G"), None),
            exam(2, Some("Armonie"), None),
            exam(3, None, None),
        ];
        let hits = filter_exams(&records, Some(GroupCode::G), "");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
        assert_eq!(filter_exams(&records, None, "").len(), 3);
    }

    #[test]
    fn date_sort_reverses_with_nulls_trailing_both_ways() {
        let mut records = vec![
            exam(1, None, Some(100)),
            exam(2, None, None),
            exam(3, None, Some(300)),
            exam(4, None, Some(200)),
        ];

        sort_exams(&mut records, ExamSortKey::CreatedAt, SortDirection::Desc);
        let desc: Vec<i64> = records.iter().map(|e| e.id).collect();
        assert_eq!(desc, vec![3, 4, 1, 2]);

        sort_exams(&mut records, ExamSortKey::CreatedAt, SortDirection::Asc);
        let asc: Vec<i64> = records.iter().map(|e| e.id).collect();
        // Exact reversal of the non-null prefix, null still last.
        assert_eq!(asc, vec![1, 4, 3, 2]);
    }

    #[test]
    fn string_sort_orders_by_key() {
        let mut records = vec![reg(1, "Cora", None), reg(2, "Ana", None), reg(3, "Bogdan", None)];
        sort_registrations(
            &mut records,
            RegistrationSortKey::FirstName,
            SortDirection::Asc,
        );
        let names: Vec<&str> = records.iter().map(|r| r.first_name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Bogdan", "Cora"]);
    }

    #[test]
    fn stats_count_today_and_groups() {
        let today = ts(1_700_000_000).date_naive();
        let registrations = vec![
            reg(1, "Ana", Some(1_700_000_000)),
            reg(2, "Bogdan", Some(1_000)),
            reg(3, "Cora", None),
        ];
        let exams = vec![
            exam(1, Some("G"), Some(1_700_000_100)),
            exam(2, Some("G"), Some(1_000)),
            exam(3, Some("Armonie"), None),
        ];

        let stats = compute_stats(&registrations, &exams, today);
        assert_eq!(stats.total_registrations, 3);
        assert_eq!(stats.total_exams, 3);
        assert_eq!(stats.today_registrations, 1);
        assert_eq!(stats.today_exams, 1);
        assert_eq!(stats.group_counts.get("G"), Some(&2));
        assert_eq!(stats.group_counts.get("Armonie"), Some(&1));
    }
}
