//! Implements InputPort. Inquire-based interactive prompts.
//!
//! Three flows behind one main menu: registration form, exam submission
//! form, admin dashboard. Form drafts survive a failed attempt so the
//! user corrects instead of retyping; Esc backs out of any flow.

use crate::adapters::files;
use crate::adapters::ui::{self, progress};
use crate::domain::listing::{ExamSortKey, RegistrationSortKey, SortDirection};
use crate::domain::{
    DomainError, ExamDraft, ExamRecord, FileAttachment, GroupCode, RegistrationDraft,
    RegistrationRecord,
};
use crate::ports::{InputPort, RecordQueryPort};
use crate::usecases::{DashboardService, DashboardSnapshot, ExamService, RegistrationService};
use async_trait::async_trait;
use inquire::ui::{Color, RenderConfig, StyleSheet, Styled};
use inquire::{Confirm, DateSelect, InquireError, Select, Text};
use std::path::Path;
use std::sync::Arc;

const MENU_REGISTER: &str = "Register student";
const MENU_EXAM: &str = "Submit exam";
const MENU_DASHBOARD: &str = "Admin dashboard";
const MENU_QUIT: &str = "Quit";

/// Rows printed per dashboard page. The rest is summarized.
const TABLE_LIMIT: usize = 20;

const GOLD: Color = Color::Rgb {
    r: 0xd6,
    g: 0x9e,
    b: 0x2e,
};
const BLUE: Color = Color::Rgb {
    r: 0x4a,
    g: 0x90,
    b: 0xe2,
};

/// Applies the academy palette to every subsequent inquire prompt.
pub fn apply_theme() {
    let config = RenderConfig::default()
        .with_prompt_prefix(Styled::new("?").with_fg(GOLD))
        .with_answered_prompt_prefix(Styled::new(">").with_fg(BLUE))
        .with_highlighted_option_prefix(Styled::new(">").with_fg(GOLD))
        .with_selected_option(Some(StyleSheet::new().with_fg(BLUE)));
    inquire::set_global_render_config(config);
}

fn prompt_err(e: InquireError) -> DomainError {
    DomainError::Input(e.to_string())
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let cut: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => "-",
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Registrations,
    Exams,
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    registration: Arc<RegistrationService>,
    exams: Arc<ExamService>,
    dashboard: Arc<DashboardService>,
    query: Arc<dyn RecordQueryPort>,
}

impl TuiInputPort {
    pub fn new(
        registration: Arc<RegistrationService>,
        exams: Arc<ExamService>,
        dashboard: Arc<DashboardService>,
        query: Arc<dyn RecordQueryPort>,
    ) -> Self {
        Self {
            registration,
            exams,
            dashboard,
            query,
        }
    }

    // --- Registration flow ---

    async fn register_student(&self) -> Result<(), DomainError> {
        let mut draft = RegistrationDraft::default();
        loop {
            if !self.fill_registration(&mut draft)? {
                return Ok(());
            }
            let bar = progress::spinner("Submitting registration...");
            let result = self.registration.submit(&draft).await;
            bar.finish_and_clear();
            match result {
                Ok(record) => {
                    ui::success(&format!(
                        "{} {} registered for course {}.",
                        record.first_name, record.last_name, record.course_type
                    ));
                    return Ok(());
                }
                Err(DomainError::Validation(e)) => {
                    // Draft is kept; the next pass pre-fills every field.
                    ui::failure(&e.to_string());
                }
                Err(e) => {
                    ui::failure(&e.to_string());
                    if !self.confirm("Try again?")? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Prompts every registration field, pre-filled from the draft.
    /// Returns false when the user backs out with Esc.
    fn fill_registration(&self, draft: &mut RegistrationDraft) -> Result<bool, DomainError> {
        let Some(first) = Text::new("First name:")
            .with_initial_value(&draft.first_name)
            .prompt_skippable()
            .map_err(prompt_err)?
        else {
            return Ok(false);
        };
        draft.first_name = first;

        let Some(last) = Text::new("Last name:")
            .with_initial_value(&draft.last_name)
            .prompt_skippable()
            .map_err(prompt_err)?
        else {
            return Ok(false);
        };
        draft.last_name = last;

        let mut birth = DateSelect::new("Birth date:");
        if let Some(current) = draft.birth_date {
            birth = birth.with_default(current);
        }
        let Some(date) = birth.prompt_skippable().map_err(prompt_err)? else {
            return Ok(false);
        };
        draft.birth_date = Some(date);

        let Some(church) = Text::new("Church:")
            .with_initial_value(&draft.church)
            .prompt_skippable()
            .map_err(prompt_err)?
        else {
            return Ok(false);
        };
        draft.church = church;

        let Some(pastor) = Text::new("Pastor name:")
            .with_initial_value(&draft.pastor_name)
            .prompt_skippable()
            .map_err(prompt_err)?
        else {
            return Ok(false);
        };
        draft.pastor_name = pastor;

        let Some(phone) = Text::new("Pastor phone:")
            .with_initial_value(&draft.pastor_phone)
            .prompt_skippable()
            .map_err(prompt_err)?
        else {
            return Ok(false);
        };
        draft.pastor_phone = phone;

        let Some(course) = Select::new("Course type:", GroupCode::ALL.to_vec())
            .prompt_skippable()
            .map_err(prompt_err)?
        else {
            return Ok(false);
        };
        draft.course_type = course.as_str().to_string();

        Ok(true)
    }

    // --- Exam flow ---

    async fn submit_exam(&self) -> Result<(), DomainError> {
        let bar = progress::spinner("Loading registered students...");
        let students = self.query.fetch_registrations().await;
        bar.finish_and_clear();
        let students = match students {
            Ok(s) => s,
            Err(e) => {
                ui::failure(&e.to_string());
                return Ok(());
            }
        };
        if students.is_empty() {
            ui::notice("No registered students yet. Register a student first.");
            return Ok(());
        }

        let labels: Vec<String> = students
            .iter()
            .map(|r| format!("{} {} (#{})", r.first_name, r.last_name, r.id))
            .collect();
        let Some(picked) = Select::new("Student:", labels)
            .raw_prompt_skippable()
            .map_err(prompt_err)?
        else {
            return Ok(());
        };
        let student = &students[picked.index];

        let mut draft = ExamDraft {
            student_id: Some(student.id),
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            ..ExamDraft::default()
        };

        loop {
            if !self.fill_exam(&mut draft).await? {
                return Ok(());
            }
            let bar = progress::spinner("Uploading files and submitting exam...");
            let result = self.exams.submit(&draft).await;
            bar.finish_and_clear();
            match result {
                Ok(()) => {
                    ui::success(&format!(
                        "Exam submitted for {} {} (group {}).",
                        draft.first_name, draft.last_name, draft.group_name
                    ));
                    return Ok(());
                }
                Err(DomainError::Validation(e)) => {
                    ui::failure(&e.to_string());
                }
                Err(e) => {
                    ui::failure(&e.to_string());
                    if !self.confirm("Try again?")? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Prompts the exam fields after student selection. Returns false when
    /// the user backs out with Esc.
    async fn fill_exam(&self, draft: &mut ExamDraft) -> Result<bool, DomainError> {
        let Some(group) = Select::new("Group:", GroupCode::ALL.to_vec())
            .prompt_skippable()
            .map_err(prompt_err)?
        else {
            return Ok(false);
        };
        draft.group_name = group.as_str().to_string();

        let Some(answer) = Text::new("Theory answer:")
            .with_initial_value(&draft.theory_answer)
            .with_help_message("Free-text answer to the theory question")
            .prompt_skippable()
            .map_err(prompt_err)?
        else {
            return Ok(false);
        };
        draft.theory_answer = answer;

        match self.prompt_attachment("Theory file (PDF/JPEG/PNG path):").await? {
            Some(file) => draft.theory_file = Some(file),
            None => return Ok(false),
        }
        match self
            .prompt_attachment("Performance recording (MP4/MOV/MP3/WAV path):")
            .await?
        {
            Some(file) => draft.performance_file = Some(file),
            None => return Ok(false),
        }

        Ok(true)
    }

    /// Asks for a local path and loads it, re-prompting on read failure.
    /// Returns `None` when the user backs out with Esc.
    async fn prompt_attachment(&self, label: &str) -> Result<Option<FileAttachment>, DomainError> {
        loop {
            let Some(raw) = Text::new(label).prompt_skippable().map_err(prompt_err)? else {
                return Ok(None);
            };
            let path = raw.trim();
            if path.is_empty() {
                ui::failure("A file is required");
                continue;
            }
            match files::load_attachment(Path::new(path)).await {
                Ok(file) => {
                    ui::notice(&format!(
                        "{} ({} bytes, {})",
                        file.name,
                        file.size(),
                        file.mime
                    ));
                    return Ok(Some(file));
                }
                Err(e) => ui::failure(&e.to_string()),
            }
        }
    }

    // --- Dashboard flow ---

    async fn dashboard(&self) -> Result<(), DomainError> {
        let Some(mut snapshot) = self.load_snapshot().await? else {
            return Ok(());
        };
        let mut tab = Tab::Registrations;
        let mut search = String::new();
        let mut group: Option<GroupCode> = None;
        let mut reg_sort: Option<(RegistrationSortKey, SortDirection)> = None;
        let mut exam_sort: Option<(ExamSortKey, SortDirection)> = None;

        loop {
            match tab {
                Tab::Registrations => {
                    let rows = DashboardService::registrations_view(&snapshot, &search, reg_sort);
                    render_stats(&snapshot);
                    render_registrations(&rows);
                }
                Tab::Exams => {
                    let rows = DashboardService::exams_view(&snapshot, group, &search, exam_sort);
                    render_stats(&snapshot);
                    render_exams(&rows);
                }
            }

            let mut actions = vec![match tab {
                Tab::Registrations => "Switch to exams",
                Tab::Exams => "Switch to registrations",
            }];
            actions.extend(["Search", "Sort", "Export CSV"]);
            if tab == Tab::Exams {
                actions.extend(["Filter by group", "Download file"]);
            }
            actions.extend(["Refresh", "Back"]);

            let Some(action) = Select::new("Dashboard:", actions)
                .prompt_skippable()
                .map_err(prompt_err)?
            else {
                return Ok(());
            };

            match action {
                "Switch to exams" => tab = Tab::Exams,
                "Switch to registrations" => tab = Tab::Registrations,
                "Search" => {
                    if let Some(term) = Text::new("Search:")
                        .with_initial_value(&search)
                        .with_help_message("Name, church or group; empty clears")
                        .prompt_skippable()
                        .map_err(prompt_err)?
                    {
                        search = term;
                    }
                }
                "Filter by group" => group = self.prompt_group_filter(group)?,
                "Sort" => match tab {
                    Tab::Registrations => reg_sort = self.prompt_registration_sort(reg_sort)?,
                    Tab::Exams => exam_sort = self.prompt_exam_sort(exam_sort)?,
                },
                "Export CSV" => {
                    let result = match tab {
                        Tab::Registrations => {
                            let rows =
                                DashboardService::registrations_view(&snapshot, &search, reg_sort);
                            self.dashboard.export_registrations(&rows).await
                        }
                        Tab::Exams => {
                            let rows =
                                DashboardService::exams_view(&snapshot, group, &search, exam_sort);
                            self.dashboard.export_exams(&rows).await
                        }
                    };
                    match result {
                        Ok(path) => ui::success(&format!("Exported to {}", path.display())),
                        Err(e) => ui::failure(&e.to_string()),
                    }
                }
                "Download file" => {
                    let rows = DashboardService::exams_view(&snapshot, group, &search, exam_sort);
                    self.download_exam_file(&rows).await?;
                }
                "Refresh" => {
                    if let Some(fresh) = self.load_snapshot().await? {
                        snapshot = fresh;
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Fetches a snapshot with a spinner. `None` means the fetch failed
    /// and the user declined to retry.
    async fn load_snapshot(&self) -> Result<Option<DashboardSnapshot>, DomainError> {
        loop {
            let bar = progress::spinner("Loading dashboard data...");
            let result = self.dashboard.refresh().await;
            bar.finish_and_clear();
            match result {
                Ok(snapshot) => return Ok(Some(snapshot)),
                Err(e) => {
                    ui::failure(&e.to_string());
                    if !self.confirm("Retry?")? {
                        return Ok(None);
                    }
                }
            }
        }
    }

    fn prompt_group_filter(
        &self,
        current: Option<GroupCode>,
    ) -> Result<Option<GroupCode>, DomainError> {
        let mut options = vec!["All groups".to_string()];
        options.extend(GroupCode::ALL.iter().map(|g| g.as_str().to_string()));
        let Some(picked) = Select::new("Group filter:", options)
            .prompt_skippable()
            .map_err(prompt_err)?
        else {
            return Ok(current);
        };
        Ok(GroupCode::parse(&picked))
    }

    /// Picking the already-active key flips its direction, like clicking
    /// a column header twice.
    fn prompt_registration_sort(
        &self,
        current: Option<(RegistrationSortKey, SortDirection)>,
    ) -> Result<Option<(RegistrationSortKey, SortDirection)>, DomainError> {
        const KEYS: [(&str, RegistrationSortKey); 8] = [
            ("Date", RegistrationSortKey::CreatedAt),
            ("First name", RegistrationSortKey::FirstName),
            ("Last name", RegistrationSortKey::LastName),
            ("Birth date", RegistrationSortKey::BirthDate),
            ("Church", RegistrationSortKey::Church),
            ("Pastor", RegistrationSortKey::PastorName),
            ("Phone", RegistrationSortKey::PastorPhone),
            ("Course", RegistrationSortKey::CourseType),
        ];
        let labels: Vec<&str> = KEYS.iter().map(|(l, _)| *l).collect();
        let Some(picked) = Select::new("Sort by:", labels)
            .raw_prompt_skippable()
            .map_err(prompt_err)?
        else {
            return Ok(current);
        };
        let key = KEYS[picked.index].1;
        Ok(Some(next_sort(current, key)))
    }

    fn prompt_exam_sort(
        &self,
        current: Option<(ExamSortKey, SortDirection)>,
    ) -> Result<Option<(ExamSortKey, SortDirection)>, DomainError> {
        const KEYS: [(&str, ExamSortKey); 4] = [
            ("Date", ExamSortKey::CreatedAt),
            ("First name", ExamSortKey::FirstName),
            ("Last name", ExamSortKey::LastName),
            ("Group", ExamSortKey::GroupName),
        ];
        let labels: Vec<&str> = KEYS.iter().map(|(l, _)| *l).collect();
        let Some(picked) = Select::new("Sort by:", labels)
            .raw_prompt_skippable()
            .map_err(prompt_err)?
        else {
            return Ok(current);
        };
        let key = KEYS[picked.index].1;
        Ok(Some(next_sort(current, key)))
    }

    async fn download_exam_file(&self, rows: &[ExamRecord]) -> Result<(), DomainError> {
        let mut labels: Vec<String> = Vec::new();
        let mut urls: Vec<String> = Vec::new();
        for row in rows {
            if let Some(url) = row.exam_file_url.as_deref() {
                labels.push(format!("#{} {} {} / theory", row.id, row.first_name, row.last_name));
                urls.push(url.to_string());
            }
            if let Some(url) = row.performance_file_url.as_deref() {
                labels.push(format!(
                    "#{} {} {} / performance",
                    row.id, row.first_name, row.last_name
                ));
                urls.push(url.to_string());
            }
        }
        if labels.is_empty() {
            ui::notice("No stored files in the current view.");
            return Ok(());
        }
        let Some(picked) = Select::new("Download:", labels)
            .raw_prompt_skippable()
            .map_err(prompt_err)?
        else {
            return Ok(());
        };
        let bar = progress::spinner("Downloading...");
        let result = self.dashboard.download(&urls[picked.index]).await;
        bar.finish_and_clear();
        match result {
            Ok(path) => ui::success(&format!("Saved to {}", path.display())),
            Err(e) => ui::failure(&e.to_string()),
        }
        Ok(())
    }

    fn confirm(&self, question: &str) -> Result<bool, DomainError> {
        Ok(Confirm::new(question)
            .with_default(true)
            .prompt_skippable()
            .map_err(prompt_err)?
            .unwrap_or(false))
    }
}

/// Toggle direction when the same key is picked again, otherwise start
/// ascending on the new key.
fn next_sort<K: PartialEq>(
    current: Option<(K, SortDirection)>,
    key: K,
) -> (K, SortDirection) {
    match current {
        Some((k, dir)) if k == key => (key, dir.toggled()),
        _ => (key, SortDirection::Asc),
    }
}

fn render_stats(snapshot: &DashboardSnapshot) {
    let stats = DashboardService::stats(snapshot);
    let groups: Vec<String> = stats
        .group_counts
        .iter()
        .map(|(g, n)| format!("{}: {}", g, n))
        .collect();
    println!(
        "\nRegistrations: {} ({} today) | Exams: {} ({} today) | {}",
        stats.total_registrations,
        stats.today_registrations,
        stats.total_exams,
        stats.today_exams,
        if groups.is_empty() {
            "no exams yet".to_string()
        } else {
            groups.join(", ")
        }
    );
}

fn render_registrations(rows: &[RegistrationRecord]) {
    println!(
        "{:<5} {:<12} {:<14} {:<14} {:<12} {:<16} {:<14} {:<8} {}",
        "#", "Date", "First name", "Last name", "Birth", "Church", "Pastor", "Course", "Phone"
    );
    for row in rows.iter().take(TABLE_LIMIT) {
        let date = row
            .created_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let birth = row
            .birth_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<5} {:<12} {:<14} {:<14} {:<12} {:<16} {:<14} {:<8} {}",
            row.id,
            date,
            truncate(&row.first_name, 13),
            truncate(&row.last_name, 13),
            birth,
            truncate(or_dash(row.church.as_deref()), 15),
            truncate(or_dash(row.pastor_name.as_deref()), 13),
            or_dash(row.course_type.as_deref()),
            or_dash(row.pastor_phone.as_deref()),
        );
    }
    if rows.len() > TABLE_LIMIT {
        println!("... and {} more rows", rows.len() - TABLE_LIMIT);
    }
    if rows.is_empty() {
        println!("(no rows match)");
    }
}

fn render_exams(rows: &[ExamRecord]) {
    println!(
        "{:<5} {:<12} {:<14} {:<14} {:<8} {:<7} {:<7} {}",
        "#", "Date", "First name", "Last name", "Group", "Theory", "Perf.", "Answer"
    );
    for row in rows.iter().take(TABLE_LIMIT) {
        let date = row
            .created_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<5} {:<12} {:<14} {:<14} {:<8} {:<7} {:<7} {}",
            row.id,
            date,
            truncate(&row.first_name, 13),
            truncate(&row.last_name, 13),
            or_dash(row.group_name.as_deref()),
            if row.exam_file_url.is_some() { "yes" } else { "-" },
            if row.performance_file_url.is_some() { "yes" } else { "-" },
            truncate(or_dash(row.theory_answer.as_deref()), 40),
        );
    }
    if rows.len() > TABLE_LIMIT {
        println!("... and {} more rows", rows.len() - TABLE_LIMIT);
    }
    if rows.is_empty() {
        println!("(no rows match)");
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            println!();
            let choice = Select::new(
                "Main menu",
                vec![MENU_REGISTER, MENU_EXAM, MENU_DASHBOARD, MENU_QUIT],
            )
            .prompt_skippable()
            .map_err(prompt_err)?;

            match choice {
                Some(MENU_REGISTER) => self.register_student().await?,
                Some(MENU_EXAM) => self.submit_exam().await?,
                Some(MENU_DASHBOARD) => self.dashboard().await?,
                _ => {
                    ui::notice("Goodbye.");
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate("Ana", 10), "Ana");
        assert_eq!(truncate("Bartholomew", 6), "Barth…");
    }

    #[test]
    fn sort_toggles_on_repeat_key() {
        let first = next_sort(None, ExamSortKey::CreatedAt);
        assert_eq!(first, (ExamSortKey::CreatedAt, SortDirection::Asc));

        let second = next_sort(Some(first), ExamSortKey::CreatedAt);
        assert_eq!(second, (ExamSortKey::CreatedAt, SortDirection::Desc));

        let switched = next_sort(Some(second), ExamSortKey::GroupName);
        assert_eq!(switched, (ExamSortKey::GroupName, SortDirection::Asc));
    }
}
