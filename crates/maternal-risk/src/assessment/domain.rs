use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::aggregator::WeightOverrides;
use super::normalizer::RawAssessmentRequest;
use super::scoring::EvaluationError;

/// Conditions the engine knows how to score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Anaemia,
    Thyroid,
    Miscarriage,
    Uti,
    Gdm,
    Preeclampsia,
    MentalHealth,
}

impl Condition {
    pub const ALL: [Condition; 7] = [
        Condition::Anaemia,
        Condition::Thyroid,
        Condition::Miscarriage,
        Condition::Uti,
        Condition::Gdm,
        Condition::Preeclampsia,
        Condition::MentalHealth,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Condition::Anaemia => "anaemia",
            Condition::Thyroid => "thyroid",
            Condition::Miscarriage => "miscarriage",
            Condition::Uti => "uti",
            Condition::Gdm => "gdm",
            Condition::Preeclampsia => "preeclampsia",
            Condition::MentalHealth => "mental_health",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Condition::Anaemia => "Anaemia",
            Condition::Thyroid => "Thyroid Disorder",
            Condition::Miscarriage => "Miscarriage",
            Condition::Uti => "Urinary Tract Infection",
            Condition::Gdm => "Gestational Diabetes",
            Condition::Preeclampsia => "Preeclampsia",
            Condition::MentalHealth => "Mental Health",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown condition '{0}'")]
pub struct UnknownCondition(pub String);

impl FromStr for Condition {
    type Err = UnknownCondition;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "anaemia" | "anemia" => Ok(Condition::Anaemia),
            "thyroid" => Ok(Condition::Thyroid),
            "miscarriage" => Ok(Condition::Miscarriage),
            "uti" => Ok(Condition::Uti),
            "gdm" | "gestational_diabetes" => Ok(Condition::Gdm),
            "preeclampsia" => Ok(Condition::Preeclampsia),
            "mental_health" | "mental" => Ok(Condition::MentalHealth),
            _ => Err(UnknownCondition(value.to_string())),
        }
    }
}

/// Pregnancy trimester, the only categorical input the evaluators consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trimester {
    First,
    Second,
    Third,
}

impl FromStr for Trimester {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "first" | "1" | "1st" => Ok(Trimester::First),
            "second" | "2" | "2nd" => Ok(Trimester::Second),
            "third" | "3" | "3rd" => Ok(Trimester::Third),
            other => Err(format!("unrecognized trimester '{other}'")),
        }
    }
}

impl Trimester {
    pub const fn label(self) -> &'static str {
        match self {
            Trimester::First => "First",
            Trimester::Second => "Second",
            Trimester::Third => "Third",
        }
    }
}

/// Value representation for a single symptom or lab entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InputValue {
    Flag(bool),
    Ordinal(u8),
    Measure(f64),
    Category(String),
}

impl InputValue {
    fn kind(&self) -> &'static str {
        match self {
            InputValue::Flag(_) => "flag",
            InputValue::Ordinal(_) => "ordinal",
            InputValue::Measure(_) => "measure",
            InputValue::Category(_) => "category",
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            InputValue::Flag(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            InputValue::Ordinal(level) => Some(f64::from(*level)),
            InputValue::Measure(value) => Some(*value),
            InputValue::Category(_) => None,
        }
    }
}

/// Typed symptom/lab record for one condition. Absent keys resolve to the
/// caller-supplied "normal" default so missing data never raises risk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationInput {
    values: BTreeMap<String, InputValue>,
}

impl EvaluationInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: InputValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn with_flag(self, key: impl Into<String>, flag: bool) -> Self {
        self.with(key, InputValue::Flag(flag))
    }

    pub fn with_ordinal(self, key: impl Into<String>, level: u8) -> Self {
        self.with(key, InputValue::Ordinal(level))
    }

    pub fn with_measure(self, key: impl Into<String>, value: f64) -> Self {
        self.with(key, InputValue::Measure(value))
    }

    pub fn with_category(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(key, InputValue::Category(value.into()))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: InputValue) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&InputValue> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &InputValue)> {
        self.values.iter()
    }

    /// Presence flag; absent means "not present".
    pub fn flag(&self, key: &str) -> Result<bool, EvaluationError> {
        match self.values.get(key) {
            None => Ok(false),
            Some(InputValue::Flag(flag)) => Ok(*flag),
            Some(other) => other
                .as_number()
                .map(|number| number != 0.0)
                .ok_or_else(|| mismatch(key, "flag", other)),
        }
    }

    /// Ordinal severity; absent resolves to `default`.
    pub fn ordinal_or(&self, key: &str, default: u8) -> Result<u8, EvaluationError> {
        match self.values.get(key) {
            None => Ok(default),
            Some(InputValue::Ordinal(level)) => Ok(*level),
            Some(other) => match other.as_number() {
                Some(number) if number.is_finite() && (0.0..=255.0).contains(&number) => {
                    Ok(number.round() as u8)
                }
                _ => Err(mismatch(key, "ordinal", other)),
            },
        }
    }

    /// Optional continuous measurement; absent stays `None`.
    pub fn measure(&self, key: &str) -> Result<Option<f64>, EvaluationError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(other) => match other.as_number() {
                Some(number) if number.is_finite() => Ok(Some(number)),
                _ => Err(mismatch(key, "measure", other)),
            },
        }
    }

    /// Continuous measurement with a "normal" default substituted when absent.
    pub fn measure_or(&self, key: &str, default: f64) -> Result<f64, EvaluationError> {
        Ok(self.measure(key)?.unwrap_or(default))
    }

    /// Optional categorical value. Unrecognized values are rejected rather than defaulted.
    pub fn category<T>(&self, key: &str) -> Result<Option<T>, EvaluationError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.values.get(key) {
            None => Ok(None),
            Some(InputValue::Category(raw)) => {
                raw.parse::<T>()
                    .map(Some)
                    .map_err(|err| EvaluationError::InvalidInput {
                        key: key.to_string(),
                        reason: err.to_string(),
                    })
            }
            Some(other) => Err(mismatch(key, "category", other)),
        }
    }
}

fn mismatch(key: &str, expected: &str, found: &InputValue) -> EvaluationError {
    EvaluationError::InvalidInput {
        key: key.to_string(),
        reason: format!("expected {expected}, found {}", found.kind()),
    }
}

/// Per-condition input records produced by the normalizer.
pub type ConditionInputs = BTreeMap<Condition, EvaluationInput>;

/// Risk classification. `Error` marks a condition whose evaluation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Moderate,
    High,
    Error,
}

impl RiskTier {
    pub const fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Moderate => "Moderate",
            RiskTier::High => "High",
            RiskTier::Error => "Error",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One weighted factor that fired during evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub key: String,
    pub weight: f64,
    pub label: String,
    pub color: String,
}

/// Output of a single evaluator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub condition: Condition,
    pub risk_tier: RiskTier,
    pub probability: u8,
    pub reasons: Vec<String>,
    pub advice: Vec<String>,
    pub contributions: Vec<Contribution>,
    /// Condition-specific classification, e.g. the thyroid disorder a TSH reading points to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finding: Option<String>,
}

impl EvaluationResult {
    /// Placeholder recorded when an evaluator fails inside a batch.
    pub fn degraded(condition: Condition) -> Self {
        Self {
            condition,
            risk_tier: RiskTier::Error,
            probability: 0,
            reasons: Vec::new(),
            advice: Vec::new(),
            contributions: Vec::new(),
            finding: None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.risk_tier == RiskTier::Error
    }
}

/// Identifier wrapper for stored assessment reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReportId(pub String);

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who the report is about; consumed by export collaborators only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Inbound assessment request. An empty `conditions` list means "use the
/// configured defaults".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssessmentSubmission {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub profile: Option<UserProfile>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub answers: RawAssessmentRequest,
    #[serde(default)]
    pub weight_overrides: WeightOverrides,
}

/// Results for every requested condition plus the input snapshot they were computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateReport {
    pub generated_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_results")]
    pub results: Vec<EvaluationResult>,
    pub inputs: ConditionInputs,
}

impl AggregateReport {
    pub fn get(&self, condition: Condition) -> Option<&EvaluationResult> {
        self.results
            .iter()
            .find(|result| result.condition == condition)
    }

    pub fn conditions(&self) -> impl Iterator<Item = Condition> + '_ {
        self.results.iter().map(|result| result.condition)
    }

    pub fn degraded(&self) -> impl Iterator<Item = &EvaluationResult> {
        self.results.iter().filter(|result| result.is_degraded())
    }
}

// Results are emitted as a JSON object keyed by condition, in request order.
fn serialize_results<S>(results: &[EvaluationResult], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(results.len()))?;
    for result in results {
        map.serialize_entry(result.condition.key(), result)?;
    }
    map.end()
}
