use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Value};

use crate::assessment::domain::{
    AssessmentSubmission, Condition, EvaluationInput, EvaluationResult, ReportId, UserProfile,
};
use crate::assessment::normalizer::RawAssessmentRequest;
use crate::assessment::repository::{
    AssessmentRecord, ExportError, ReportExporter, ReportRepository, RepositoryError,
};
use crate::assessment::scoring::{EvaluationError, Evaluator, ScoringProfile};
use crate::assessment::{assessment_router, standard_profile, AssessmentService};
use crate::config::AssessmentConfig;

pub(super) fn assessment_config() -> AssessmentConfig {
    AssessmentConfig {
        default_conditions: vec![Condition::Uti, Condition::Anaemia],
        ..AssessmentConfig::default()
    }
}

/// Third trimester with frequent, burning urination plus fatigue and pale
/// skin picked from the symptom list.
pub(super) fn answers() -> RawAssessmentRequest {
    RawAssessmentRequest::new()
        .with("Frequent_Urination", "Yes")
        .with("burning_sensation", 1)
        .with("trimester", "Third")
        .with("symptoms", json!(["Pale skin", "Fatigue"]))
}

pub(super) fn submission() -> AssessmentSubmission {
    AssessmentSubmission {
        user_id: Some("mother-7".to_string()),
        profile: None,
        conditions: Vec::new(),
        answers: answers(),
        weight_overrides: Default::default(),
    }
}

pub(super) fn profiled_submission() -> AssessmentSubmission {
    AssessmentSubmission {
        profile: Some(UserProfile {
            name: "Asha".to_string(),
            age: Some(27),
            email: Some("asha@example.org".to_string()),
        }),
        ..submission()
    }
}

pub(super) fn invalid_submission() -> AssessmentSubmission {
    AssessmentSubmission {
        answers: RawAssessmentRequest::new().with("trimester", "Fourth"),
        ..submission()
    }
}

pub(super) fn build_service() -> (
    AssessmentService<MemoryRepository, MemoryExporter>,
    Arc<MemoryRepository>,
    Arc<MemoryExporter>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let exporter = Arc::new(MemoryExporter::default());
    let service =
        AssessmentService::new(repository.clone(), exporter.clone(), &assessment_config());
    (service, repository, exporter)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<Vec<AssessmentRecord>>>,
}

impl ReportRepository for MemoryRepository {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|stored| stored.report_id == record.report_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ReportId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|record| &record.report_id == id).cloned())
    }

    fn for_user(&self, user_id: &str) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| record.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryExporter {
    exported: Arc<Mutex<Vec<ReportId>>>,
}

impl MemoryExporter {
    pub(super) fn exported(&self) -> Vec<ReportId> {
        self.exported.lock().expect("exporter mutex poisoned").clone()
    }
}

impl ReportExporter for MemoryExporter {
    fn export(&self, record: &AssessmentRecord) -> Result<(), ExportError> {
        self.exported
            .lock()
            .expect("exporter mutex poisoned")
            .push(record.report_id.clone());
        Ok(())
    }
}

pub(super) struct OfflineExporter;

impl ReportExporter for OfflineExporter {
    fn export(&self, _record: &AssessmentRecord) -> Result<(), ExportError> {
        Err(ExportError::Transport("mail relay offline".to_string()))
    }
}

pub(super) struct ConflictRepository;

impl ReportRepository for ConflictRepository {
    fn insert(&self, _record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &ReportId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        Ok(None)
    }

    fn for_user(&self, _user_id: &str) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl ReportRepository for UnavailableRepository {
    fn insert(&self, _record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ReportId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_user(&self, _user_id: &str) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Evaluator that always rejects its input, for exercising degraded results.
pub(super) struct BrokenEvaluator {
    condition: Condition,
    profile: ScoringProfile,
}

impl BrokenEvaluator {
    pub(super) fn new(condition: Condition) -> Self {
        Self {
            condition,
            profile: standard_profile(condition),
        }
    }
}

impl Evaluator for BrokenEvaluator {
    fn condition(&self) -> Condition {
        self.condition
    }

    fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    fn evaluate(&self, _input: &EvaluationInput) -> Result<EvaluationResult, EvaluationError> {
        Err(EvaluationError::InvalidInput {
            key: "glucose".to_string(),
            reason: "sensor returned garbage".to_string(),
        })
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assessment_router_with_service(
    service: AssessmentService<MemoryRepository, MemoryExporter>,
) -> axum::Router {
    assessment_router(Arc::new(service))
}
