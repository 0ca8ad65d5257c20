//! Maternal-health risk assessment: raw symptom intake, per-condition scoring,
//! aggregation into a single report, and the HTTP surface around it.
//!
//! Scoring is pure. Evaluators read an immutable [`ScoringProfile`] and one
//! [`EvaluationInput`], so the same instances serve every request. Storage and
//! export sit behind the [`ReportRepository`] and [`ReportExporter`] seams.

pub mod aggregator;
pub mod batch;
pub mod conditions;
pub mod domain;
pub mod normalizer;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use aggregator::{Aggregator, EvaluatorRegistry, WeightOverrides};
pub use batch::{BatchAssessment, BatchImportError, BatchImporter, BatchRecord};
pub use conditions::{
    evaluator_with_profile, standard_evaluator, standard_profile, AnaemiaModel,
    UnknownAnaemiaModel,
};
pub use domain::{
    AggregateReport, AssessmentSubmission, Condition, ConditionInputs, Contribution,
    EvaluationInput, EvaluationResult, InputValue, ReportId, RiskTier, Trimester, UnknownCondition,
    UserProfile,
};
pub use normalizer::{InputNormalizer, NormalizationError, RawAssessmentRequest};
pub use repository::{
    AssessmentRecord, ExportError, ReportExporter, ReportRepository, RepositoryError,
};
pub use router::assessment_router;
pub use scoring::{
    EvaluationError, Evaluator, ScoringProfile, ScoringStrategy, SymptomWeight, TierThresholds,
    WeightTable,
};
pub use service::{AssessmentService, AssessmentServiceError};
pub use views::{render_report, AssessmentView, ConditionView};
