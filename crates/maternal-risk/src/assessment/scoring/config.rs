use std::collections::BTreeMap;

use serde::Serialize;

use super::EvaluationError;

/// A named scoring factor with its display metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymptomWeight {
    pub key: &'static str,
    pub weight: f64,
    pub label: &'static str,
    pub color: &'static str,
}

impl SymptomWeight {
    pub const fn new(key: &'static str, weight: f64, label: &'static str, color: &'static str) -> Self {
        Self {
            key,
            weight,
            label,
            color,
        }
    }
}

/// Closed, ordered set of factors an evaluator may award.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightTable {
    entries: Vec<SymptomWeight>,
}

impl WeightTable {
    pub fn new(entries: &[SymptomWeight]) -> Self {
        Self {
            entries: entries.to_vec(),
        }
    }

    pub fn entries(&self) -> &[SymptomWeight] {
        &self.entries
    }

    pub fn entry(&self, key: &str) -> Result<&SymptomWeight, EvaluationError> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .ok_or_else(|| EvaluationError::UnknownFactor {
                key: key.to_string(),
            })
    }

    pub fn weight(&self, key: &str) -> Result<f64, EvaluationError> {
        self.entry(key).map(|entry| entry.weight)
    }

    /// Maximum attainable score when every factor fires once.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|entry| entry.weight).sum()
    }

    /// Build a fresh table with some weights replaced. The receiver is never mutated.
    pub fn with_overrides(&self, overrides: &BTreeMap<String, f64>) -> Result<Self, EvaluationError> {
        let mut table = self.clone();
        for (key, weight) in overrides {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(EvaluationError::InvalidInput {
                    key: key.clone(),
                    reason: format!("weight override {weight} must be a non-negative number"),
                });
            }

            let entry = table
                .entries
                .iter_mut()
                .find(|entry| entry.key == key.as_str())
                .ok_or_else(|| EvaluationError::UnknownFactor { key: key.clone() })?;
            entry.weight = *weight;
        }
        Ok(table)
    }
}

/// How accumulated points become a 0-100 probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "family")]
pub enum ScoringStrategy {
    /// Direct point total bounded by `cap`.
    CappedSum { cap: f64 },
    /// Score expressed as a percentage of the table's total weight.
    WeightedNormalized,
}

/// Lower bounds (inclusive) of the Moderate and High tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierThresholds {
    pub moderate: f64,
    pub high: f64,
}

impl TierThresholds {
    /// Daily symptom tracker scheme.
    pub const TRACKER: Self = Self {
        moderate: 45.0,
        high: 75.0,
    };
    /// Standalone screening tool scheme (thyroid, UTI).
    pub const SCREENING: Self = Self {
        moderate: 40.0,
        high: 70.0,
    };
}

/// Everything an evaluator needs to turn rule hits into a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringProfile {
    pub table: WeightTable,
    pub strategy: ScoringStrategy,
    pub thresholds: TierThresholds,
}

impl ScoringProfile {
    pub fn new(table: WeightTable, strategy: ScoringStrategy, thresholds: TierThresholds) -> Self {
        Self {
            table,
            strategy,
            thresholds,
        }
    }

    pub fn with_overrides(&self, overrides: &BTreeMap<String, f64>) -> Result<Self, EvaluationError> {
        Ok(Self {
            table: self.table.with_overrides(overrides)?,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &[SymptomWeight] = &[
        SymptomWeight::new("fatigue", 2.0, "Fatigue", "#B22222"),
        SymptomWeight::new("hair_loss", 1.5, "Hair Loss", "#DAA520"),
    ];

    #[test]
    fn total_sums_every_weight() {
        let table = WeightTable::new(TABLE);
        assert_eq!(table.total(), 3.5);
        assert_eq!(table.weight("hair_loss").expect("known"), 1.5);
    }

    #[test]
    fn overrides_produce_a_fresh_table() {
        let table = WeightTable::new(TABLE);
        let overrides = BTreeMap::from([("fatigue".to_string(), 4.0)]);

        let adjusted = table.with_overrides(&overrides).expect("override applies");

        assert_eq!(adjusted.weight("fatigue").expect("known"), 4.0);
        assert_eq!(table.weight("fatigue").expect("known"), 2.0);
        assert_eq!(adjusted.total(), 5.5);
    }

    #[test]
    fn overrides_reject_unknown_keys_and_bad_weights() {
        let table = WeightTable::new(TABLE);

        let unknown = BTreeMap::from([("sneezing".to_string(), 1.0)]);
        assert!(matches!(
            table.with_overrides(&unknown),
            Err(EvaluationError::UnknownFactor { key }) if key == "sneezing"
        ));

        let negative = BTreeMap::from([("fatigue".to_string(), -1.0)]);
        assert!(matches!(
            table.with_overrides(&negative),
            Err(EvaluationError::InvalidInput { .. })
        ));
    }
}
