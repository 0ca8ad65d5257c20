use serde::Serialize;

use super::domain::{AggregateReport, ReportId, UserProfile};
use super::views::AssessmentView;

/// Stored assessment: the immutable report plus who it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentRecord {
    pub report_id: ReportId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
    pub report: AggregateReport,
}

impl AssessmentRecord {
    pub fn view(&self) -> AssessmentView {
        AssessmentView::from_record(self)
    }
}

/// Storage abstraction so the service can be exercised without a database.
pub trait ReportRepository: Send + Sync {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError>;
    fn fetch(&self, id: &ReportId) -> Result<Option<AssessmentRecord>, RepositoryError>;
    /// Every record for `user_id`, oldest first.
    fn for_user(&self, user_id: &str) -> Result<Vec<AssessmentRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("report already exists")]
    Conflict,
    #[error("report not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for report consumers (PDF rendering, e-mail delivery).
pub trait ReportExporter: Send + Sync {
    fn export(&self, record: &AssessmentRecord) -> Result<(), ExportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("report export unavailable: {0}")]
    Transport(String),
}
