use super::super::domain::{Condition, EvaluationInput, EvaluationResult};
use super::super::scoring::{
    EvaluationError, Evaluator, ScoreCard, ScoringProfile, ScoringStrategy, SymptomWeight,
    TierThresholds, WeightTable,
};

const WEIGHTS: &[SymptomWeight] = &[
    SymptomWeight::new("fatigue", 1.5, "Fatigue", "#B22222"),
    SymptomWeight::new("dizziness", 1.5, "Dizziness", "#CD5C5C"),
    SymptomWeight::new("breathlessness", 1.5, "Breathlessness", "#FF7F50"),
    SymptomWeight::new("heart_rate", 2.0, "High Heart Rate", "#8B0000"),
    SymptomWeight::new("pale_skin", 1.5, "Pale Skin", "#FFA07A"),
    SymptomWeight::new("cravings", 1.0, "Cravings (Pica)", "#DAA520"),
    SymptomWeight::new("iron_diet", 1.5, "Low Iron Diet", "#F4A460"),
];

/// Sliders scored against a lower bound: input key, table key, minimum level, reason, advice.
const SEVERITY_RULES: [(&str, &str, u8, &str, &str); 3] = [
    (
        "fatigue_level",
        "fatigue",
        4,
        "You reported severe fatigue today.",
        "→ Get your hemoglobin levels tested to rule out iron-deficiency anaemia.",
    ),
    (
        "dizziness_level",
        "dizziness",
        3,
        "You reported frequent dizziness.",
        "→ Stay hydrated and consult your doctor if it continues.",
    ),
    (
        "breathlessness_level",
        "breathlessness",
        3,
        "You are experiencing shortness of breath.",
        "→ This may indicate low oxygen levels. Get your blood checked.",
    ),
];

const HEART_RATE_LIMIT: f64 = 100.0;
const IRON_DIET_DEFAULT: u8 = 5;
const IRON_DIET_LOW: u8 = 2;

const QUIET_ADVICE: [&str; 3] = [
    "✅ No major symptoms of anaemia today.",
    "→ Eat iron-rich foods and maintain a balanced diet.",
    "→ Follow up with healthcare provider if symptoms develop.",
];

/// Daily symptom tracker variant of the anaemia screen: severity sliders,
/// resting heart rate, pica and dietary iron, scored as a share of the table.
///
/// Reads its own slider keys (`fatigue_level`, `dizziness_level`,
/// `breathlessness_level`) so it can share one anaemia input with the
/// point-based [`AnaemiaEvaluator`](super::AnaemiaEvaluator).
#[derive(Debug, Clone)]
pub struct AnaemiaTrackerEvaluator {
    profile: ScoringProfile,
}

impl AnaemiaTrackerEvaluator {
    pub fn new() -> Self {
        Self::with_profile(Self::standard_profile())
    }

    pub fn with_profile(profile: ScoringProfile) -> Self {
        Self { profile }
    }

    pub fn standard_profile() -> ScoringProfile {
        ScoringProfile::new(
            WeightTable::new(WEIGHTS),
            ScoringStrategy::WeightedNormalized,
            TierThresholds::TRACKER,
        )
    }
}

impl Default for AnaemiaTrackerEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for AnaemiaTrackerEvaluator {
    fn condition(&self) -> Condition {
        Condition::Anaemia
    }

    fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    fn evaluate(&self, input: &EvaluationInput) -> Result<EvaluationResult, EvaluationError> {
        let mut card = ScoreCard::new(&self.profile);

        for (input_key, factor, minimum, reason, advice) in SEVERITY_RULES {
            if input.ordinal_or(input_key, 0)? >= minimum {
                card.award(factor, reason, Some(advice))?;
            }
        }

        if input.measure_or("heart_rate", 0.0)? > HEART_RATE_LIMIT {
            card.award(
                "heart_rate",
                "Your heart rate is elevated above 100 bpm.",
                Some("→ An increased heart rate may be compensating for low oxygen; consult your doctor."),
            )?;
        }

        if input.flag("pale_skin")? {
            card.award(
                "pale_skin",
                "Pale skin can be a visible sign of anaemia.",
                Some("→ Consider a blood test and discuss iron supplements with your healthcare provider."),
            )?;
        }

        if input.flag("cravings")? {
            card.award(
                "cravings",
                "Unusual cravings (pica) are linked to iron deficiency.",
                Some("→ Pica is often related to low iron. Increase iron intake under medical advice."),
            )?;
        }

        if input.ordinal_or("iron_diet", IRON_DIET_DEFAULT)? <= IRON_DIET_LOW {
            card.award(
                "iron_diet",
                "Your dietary iron intake seems too low.",
                Some("→ Add more iron-rich foods like spinach, lentils, dates, and jaggery."),
            )?;
        }

        if card.is_empty() {
            return Ok(card.finish_quiet(Condition::Anaemia, &[], &QUIET_ADVICE));
        }
        Ok(card.finish(Condition::Anaemia))
    }
}
