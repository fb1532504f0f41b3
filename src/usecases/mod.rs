//! Application use cases. Orchestrate domain logic via ports.

pub mod dashboard_service;
pub mod exam_service;
pub mod registration_service;

pub use dashboard_service::{DashboardService, DashboardSnapshot};
pub use exam_service::ExamService;
pub use registration_service::RegistrationService;
