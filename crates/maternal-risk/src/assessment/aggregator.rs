use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::conditions::{evaluator_with_profile, standard_evaluator, AnaemiaModel};
use super::domain::{AggregateReport, Condition, ConditionInputs, EvaluationInput, EvaluationResult};
use super::scoring::{EvaluationError, Evaluator};

/// Request-scoped weight replacements, keyed by condition then factor key.
pub type WeightOverrides = BTreeMap<Condition, BTreeMap<String, f64>>;

/// Lookup from condition to the evaluator that scores it.
#[derive(Clone, Default)]
pub struct EvaluatorRegistry {
    evaluators: BTreeMap<Condition, Arc<dyn Evaluator>>,
}

impl EvaluatorRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every condition with its default profile.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for condition in Condition::ALL {
            registry.register(standard_evaluator(condition));
        }
        registry
    }

    /// Every condition with its default profile, anaemia scored by `model`.
    pub fn with_anaemia_model(model: AnaemiaModel) -> Self {
        let mut registry = Self::standard();
        registry.register(model.evaluator());
        registry
    }

    /// Install an evaluator, returning the one it replaced.
    pub fn register(&mut self, evaluator: Arc<dyn Evaluator>) -> Option<Arc<dyn Evaluator>> {
        self.evaluators.insert(evaluator.condition(), evaluator)
    }

    pub fn get(&self, condition: Condition) -> Option<&Arc<dyn Evaluator>> {
        self.evaluators.get(&condition)
    }

    pub fn conditions(&self) -> impl Iterator<Item = Condition> + '_ {
        self.evaluators.keys().copied()
    }

    /// Copy of this registry in which the named conditions score against
    /// freshly built weight tables. The receiver's evaluators stay untouched.
    pub fn with_overrides(&self, overrides: &WeightOverrides) -> Result<Self, EvaluationError> {
        let mut registry = self.clone();
        for (condition, weights) in overrides {
            let current = self
                .get(*condition)
                .ok_or(EvaluationError::UnsupportedCondition(*condition))?;
            let profile = current.profile().with_overrides(weights)?;
            registry.register(evaluator_with_profile(*condition, profile));
        }
        Ok(registry)
    }
}

impl std::fmt::Debug for EvaluatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluatorRegistry")
            .field("conditions", &self.evaluators.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Runs the requested evaluators over one normalized snapshot.
#[derive(Debug, Clone)]
pub struct Aggregator {
    registry: EvaluatorRegistry,
}

impl Aggregator {
    pub fn new(registry: EvaluatorRegistry) -> Self {
        Self { registry }
    }

    pub fn standard() -> Self {
        Self::new(EvaluatorRegistry::standard())
    }

    pub fn registry(&self) -> &EvaluatorRegistry {
        &self.registry
    }

    /// Score a single condition with its registered evaluator.
    pub fn run_one(
        &self,
        condition: Condition,
        input: &EvaluationInput,
    ) -> Result<EvaluationResult, EvaluationError> {
        let evaluator = self
            .registry
            .get(condition)
            .ok_or(EvaluationError::UnsupportedCondition(condition))?;
        evaluator.evaluate(input)
    }

    pub fn run_all(&self, conditions: &[Condition], inputs: &ConditionInputs) -> AggregateReport {
        self.run_all_at(conditions, inputs, Utc::now())
    }

    /// Evaluate each requested condition in request order. Repeated conditions
    /// are scored once and a condition absent from `inputs` scores against
    /// every default. A failing evaluator yields a degraded entry for its own
    /// condition and never aborts the rest.
    pub fn run_all_at(
        &self,
        conditions: &[Condition],
        inputs: &ConditionInputs,
        generated_at: DateTime<Utc>,
    ) -> AggregateReport {
        let empty = EvaluationInput::new();
        let mut results: Vec<EvaluationResult> = Vec::with_capacity(conditions.len());

        for &condition in conditions {
            if results.iter().any(|result| result.condition == condition) {
                continue;
            }

            let input = inputs.get(&condition).unwrap_or(&empty);
            let result = match self.run_one(condition, input) {
                Ok(result) => {
                    debug!(
                        %condition,
                        tier = %result.risk_tier,
                        probability = result.probability,
                        "condition evaluated"
                    );
                    result
                }
                Err(error) => {
                    warn!(%condition, %error, "condition evaluation failed; recording degraded result");
                    EvaluationResult::degraded(condition)
                }
            };
            results.push(result);
        }

        AggregateReport {
            generated_at,
            results,
            inputs: inputs.clone(),
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::standard()
    }
}
