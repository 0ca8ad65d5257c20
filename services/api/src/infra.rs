use maternal_risk::assessment::{
    AssessmentRecord, ExportError, ReportExporter, ReportId, ReportRepository, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local report store. Records are kept in submission order so
/// per-user history comes back oldest first.
#[derive(Default, Clone)]
pub(crate) struct InMemoryReportRepository {
    records: Arc<Mutex<Vec<AssessmentRecord>>>,
}

impl InMemoryReportRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Vec<AssessmentRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("report store lock poisoned".to_string()))
    }
}

impl ReportRepository for InMemoryReportRepository {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.iter().any(|stored| stored.report_id == record.report_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ReportId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.iter().find(|record| &record.report_id == id).cloned())
    }

    fn for_user(&self, user_id: &str) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .iter()
            .filter(|record| record.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }
}

/// Stands in for PDF/e-mail delivery by logging what would be sent.
#[derive(Default, Clone, Copy)]
pub(crate) struct LogExporter;

impl ReportExporter for LogExporter {
    fn export(&self, record: &AssessmentRecord) -> Result<(), ExportError> {
        let has_email = record
            .profile
            .as_ref()
            .is_some_and(|profile| profile.email.is_some());
        info!(
            report_id = %record.report_id,
            has_email,
            conditions = record.report.results.len(),
            "assessment report queued for delivery"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use maternal_risk::assessment::AggregateReport;

    fn record(id: &str, user: Option<&str>) -> AssessmentRecord {
        AssessmentRecord {
            report_id: ReportId(id.to_string()),
            user_id: user.map(str::to_string),
            profile: None,
            report: AggregateReport {
                generated_at: Utc::now(),
                results: Vec::new(),
                inputs: Default::default(),
            },
        }
    }

    #[test]
    fn duplicate_report_ids_conflict() {
        let repository = InMemoryReportRepository::default();
        repository
            .insert(record("rpt-000001", None))
            .expect("first insert");

        assert!(matches!(
            repository.insert(record("rpt-000001", None)),
            Err(RepositoryError::Conflict)
        ));
    }

    #[test]
    fn history_keeps_submission_order() {
        let repository = InMemoryReportRepository::default();
        for (id, user) in [
            ("rpt-000003", Some("m-1")),
            ("rpt-000004", Some("m-2")),
            ("rpt-000001", Some("m-1")),
        ] {
            repository.insert(record(id, user)).expect("insert");
        }

        let ids: Vec<_> = repository
            .for_user("m-1")
            .expect("history")
            .into_iter()
            .map(|record| record.report_id.0)
            .collect();
        assert_eq!(ids, vec!["rpt-000003", "rpt-000001"]);
        assert!(repository
            .fetch(&ReportId("rpt-000009".to_string()))
            .expect("fetch")
            .is_none());
    }
}
