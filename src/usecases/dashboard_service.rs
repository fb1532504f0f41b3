//! Dashboard read path: fetch both collections, shape them for display,
//! export and download on request.
//!
//! Re-fetching replaces the previous snapshot wholesale; there is no
//! incremental merge or staleness check. Fetch errors surface to the UI
//! and retry is manual.

use crate::adapters::export;
use crate::domain::listing::{
    self, DashboardStats, ExamSortKey, RegistrationSortKey, SortDirection,
};
use crate::domain::{DomainError, ExamRecord, GroupCode, RegistrationRecord};
use crate::ports::RecordQueryPort;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::info;

/// One fetched snapshot: both collections, newest first as returned by
/// the query interface.
#[derive(Debug, Default, Clone)]
pub struct DashboardSnapshot {
    pub registrations: Vec<RegistrationRecord>,
    pub exams: Vec<ExamRecord>,
}

/// Dashboard service. Fetch, filter/sort views, stats, exports.
pub struct DashboardService {
    query: Arc<dyn RecordQueryPort>,
    data_dir: PathBuf,
}

impl DashboardService {
    pub fn new(query: Arc<dyn RecordQueryPort>, data_dir: PathBuf) -> Self {
        Self { query, data_dir }
    }

    /// Fetch both collections. The returned snapshot replaces whatever
    /// the caller held before.
    pub async fn refresh(&self) -> Result<DashboardSnapshot, DomainError> {
        let (registrations, exams) = tokio::try_join!(
            self.query.fetch_registrations(),
            self.query.fetch_exams()
        )?;
        info!(
            registrations = registrations.len(),
            exams = exams.len(),
            "dashboard snapshot loaded"
        );
        Ok(DashboardSnapshot {
            registrations,
            exams,
        })
    }

    /// Registration view: search filter, then stable sort.
    pub fn registrations_view(
        snapshot: &DashboardSnapshot,
        search: &str,
        sort: Option<(RegistrationSortKey, SortDirection)>,
    ) -> Vec<RegistrationRecord> {
        let mut rows = listing::filter_registrations(&snapshot.registrations, search);
        if let Some((key, dir)) = sort {
            listing::sort_registrations(&mut rows, key, dir);
        }
        rows
    }

    /// Exam view: group filter, search filter, then stable sort.
    pub fn exams_view(
        snapshot: &DashboardSnapshot,
        group: Option<GroupCode>,
        search: &str,
        sort: Option<(ExamSortKey, SortDirection)>,
    ) -> Vec<ExamRecord> {
        let mut rows = listing::filter_exams(&snapshot.exams, group, search);
        if let Some((key, dir)) = sort {
            listing::sort_exams(&mut rows, key, dir);
        }
        rows
    }

    /// Headline stats over the full (unfiltered) snapshot.
    pub fn stats(snapshot: &DashboardSnapshot) -> DashboardStats {
        listing::compute_stats(
            &snapshot.registrations,
            &snapshot.exams,
            Utc::now().date_naive(),
        )
    }

    /// Export the given registration rows to a timestamped CSV file.
    /// Returns the written path.
    pub async fn export_registrations(
        &self,
        rows: &[RegistrationRecord],
    ) -> Result<PathBuf, DomainError> {
        let content = export::registrations_to_csv(rows)
            .map_err(|e| DomainError::Fetch(format!("CSV export: {}", e)))?;
        self.write_export("registrations", content).await
    }

    /// Export the given exam rows to a timestamped CSV file.
    pub async fn export_exams(&self, rows: &[ExamRecord]) -> Result<PathBuf, DomainError> {
        let content = export::exams_to_csv(rows)
            .map_err(|e| DomainError::Fetch(format!("CSV export: {}", e)))?;
        self.write_export("exams", content).await
    }

    async fn write_export(&self, kind: &str, content: String) -> Result<PathBuf, DomainError> {
        let dir = self.data_dir.join("exports");
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| DomainError::Fetch(format!("create exports dir: {}", e)))?;
        let filename = format!("{}_{}.csv", kind, Utc::now().format("%Y%m%d_%H%M%S"));
        let path = dir.join(filename);
        fs::write(&path, content)
            .await
            .map_err(|e| DomainError::Fetch(format!("write export: {}", e)))?;
        info!(path = %path.display(), "export written");
        Ok(path)
    }

    /// Download a stored file into the data directory, named after the
    /// last URL segment.
    pub async fn download(&self, url: &str) -> Result<PathBuf, DomainError> {
        let name = url
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("download");
        let dest = self.data_dir.join("downloads").join(name);
        self.query.download_file(url, &dest).await?;
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryBackend;
    use crate::domain::Registration;
    use crate::ports::SubmissionPort;
    use chrono::NaiveDate;

    fn registration(first: &str) -> Registration {
        Registration {
            first_name: first.to_string(),
            last_name: "Lee".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2010, 6, 15).unwrap(),
            church: "Hope".to_string(),
            pastor_name: "Y".to_string(),
            pastor_phone: "555-123-4567".to_string(),
            course_type: crate::domain::GroupCode::G,
        }
    }

    #[tokio::test]
    async fn refresh_loads_both_collections() {
        let backend = Arc::new(MemoryBackend::new());
        backend.submit_registration(&registration("Ana")).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let service = DashboardService::new(backend.clone(), dir.path().to_path_buf());
        let snapshot = service.refresh().await.unwrap();
        assert_eq!(snapshot.registrations.len(), 1);
        assert!(snapshot.exams.is_empty());

        let stats = DashboardService::stats(&snapshot);
        assert_eq!(stats.total_registrations, 1);
        // Inserted just now: counts as today.
        assert_eq!(stats.today_registrations, 1);
    }

    #[tokio::test]
    async fn views_filter_and_sort() {
        let backend = Arc::new(MemoryBackend::new());
        backend.submit_registration(&registration("Ana")).await.unwrap();
        backend.submit_registration(&registration("Bogdan")).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let service = DashboardService::new(backend.clone(), dir.path().to_path_buf());
        let snapshot = service.refresh().await.unwrap();

        let hits = DashboardService::registrations_view(&snapshot, "bogdan", None);
        assert_eq!(hits.len(), 1);

        let sorted = DashboardService::registrations_view(
            &snapshot,
            "",
            Some((RegistrationSortKey::FirstName, SortDirection::Asc)),
        );
        assert_eq!(sorted[0].first_name, "Ana");
    }

    #[tokio::test]
    async fn export_writes_csv_into_data_dir() {
        let backend = Arc::new(MemoryBackend::new());
        backend.submit_registration(&registration("Ana")).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let service = DashboardService::new(backend.clone(), dir.path().to_path_buf());
        let snapshot = service.refresh().await.unwrap();

        let path = service
            .export_registrations(&snapshot.registrations)
            .await
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Date,First Name"));
        assert!(content.contains("Ana"));
        assert!(path.starts_with(dir.path()));
    }
}
