use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::info;

use super::aggregator::{Aggregator, EvaluatorRegistry};
use super::domain::{AggregateReport, AssessmentSubmission, Condition, ReportId};
use super::normalizer::{InputNormalizer, NormalizationError};
use super::repository::{
    AssessmentRecord, ExportError, ReportExporter, ReportRepository, RepositoryError,
};
use super::scoring::EvaluationError;
use crate::config::AssessmentConfig;

/// Service composing the normalizer, aggregator, report store and exporter.
pub struct AssessmentService<R, E> {
    repository: Arc<R>,
    exporter: Arc<E>,
    normalizer: InputNormalizer,
    aggregator: Arc<Aggregator>,
    default_conditions: Vec<Condition>,
}

static REPORT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_report_id() -> ReportId {
    let id = REPORT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReportId(format!("rpt-{id:06}"))
}

impl<R, E> AssessmentService<R, E>
where
    R: ReportRepository + 'static,
    E: ReportExporter + 'static,
{
    pub fn new(repository: Arc<R>, exporter: Arc<E>, config: &AssessmentConfig) -> Self {
        let aggregator = Aggregator::new(EvaluatorRegistry::with_anaemia_model(config.anaemia_model));
        Self::with_aggregator(repository, exporter, aggregator, config)
    }

    pub fn with_aggregator(
        repository: Arc<R>,
        exporter: Arc<E>,
        aggregator: Aggregator,
        config: &AssessmentConfig,
    ) -> Self {
        Self {
            repository,
            exporter,
            normalizer: InputNormalizer::new(),
            aggregator: Arc::new(aggregator),
            default_conditions: config.default_conditions.clone(),
        }
    }

    /// Evaluators this service scores with, before any request overrides.
    pub fn registry(&self) -> &EvaluatorRegistry {
        self.aggregator.registry()
    }

    pub fn default_conditions(&self) -> &[Condition] {
        &self.default_conditions
    }

    /// Normalize and score a submission without storing it.
    pub fn score(
        &self,
        submission: &AssessmentSubmission,
    ) -> Result<AggregateReport, AssessmentServiceError> {
        let inputs = self.normalizer.normalize(&submission.answers)?;
        let conditions = if submission.conditions.is_empty() {
            self.default_conditions.as_slice()
        } else {
            submission.conditions.as_slice()
        };

        if submission.weight_overrides.is_empty() {
            return Ok(self.aggregator.run_all(conditions, &inputs));
        }

        let registry = self
            .aggregator
            .registry()
            .with_overrides(&submission.weight_overrides)?;
        Ok(Aggregator::new(registry).run_all(conditions, &inputs))
    }

    /// Score a submission, hand it to the exporter when a user profile is
    /// attached, then persist it. A failed export stores nothing.
    pub fn submit(
        &self,
        submission: AssessmentSubmission,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let report = self.score(&submission)?;
        let record = AssessmentRecord {
            report_id: next_report_id(),
            user_id: submission.user_id,
            profile: submission.profile,
            report,
        };

        if record.profile.is_some() {
            self.exporter.export(&record)?;
        }
        let stored = self.repository.insert(record)?;

        info!(
            report_id = %stored.report_id,
            conditions = stored.report.results.len(),
            unavailable = stored.report.degraded().count(),
            "assessment stored"
        );
        Ok(stored)
    }

    /// Fetch a stored assessment for API responses.
    pub fn get(&self, report_id: &ReportId) -> Result<AssessmentRecord, AssessmentServiceError> {
        let record = self
            .repository
            .fetch(report_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn history(&self, user_id: &str) -> Result<Vec<AssessmentRecord>, AssessmentServiceError> {
        Ok(self.repository.for_user(user_id)?)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Normalization(#[from] NormalizationError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
