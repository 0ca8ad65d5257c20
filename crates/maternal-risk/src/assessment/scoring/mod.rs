mod card;
mod config;
mod policy;

pub use config::{ScoringProfile, ScoringStrategy, SymptomWeight, TierThresholds, WeightTable};

pub(crate) use card::ScoreCard;

use super::domain::{Condition, EvaluationInput, EvaluationResult};

/// Shared contract for the per-condition rule sets.
///
/// Implementations hold only an immutable [`ScoringProfile`], so a single
/// instance may be shared across threads and requests.
pub trait Evaluator: Send + Sync {
    fn condition(&self) -> Condition;

    fn profile(&self) -> &ScoringProfile;

    fn evaluate(&self, input: &EvaluationInput) -> Result<EvaluationResult, EvaluationError>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("invalid value for '{key}': {reason}")]
    InvalidInput { key: String, reason: String },
    #[error("'{key}' is not part of the weight table")]
    UnknownFactor { key: String },
    #[error("no evaluator registered for {0}")]
    UnsupportedCondition(Condition),
}
