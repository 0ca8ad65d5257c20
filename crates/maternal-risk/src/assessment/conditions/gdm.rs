use super::super::domain::{Condition, EvaluationInput, EvaluationResult};
use super::super::scoring::{
    EvaluationError, Evaluator, ScoreCard, ScoringProfile, ScoringStrategy, SymptomWeight,
    TierThresholds, WeightTable,
};

const WEIGHTS: &[SymptomWeight] = &[
    SymptomWeight::new("thirst", 1.5, "High Thirst", "#FFA07A"),
    SymptomWeight::new("urination", 1.5, "Frequent Urination", "#FFD700"),
    SymptomWeight::new("fatigue", 1.0, "Fatigue", "#E9967A"),
    SymptomWeight::new("blurred_vision", 2.0, "Blurred Vision", "#FF4500"),
    SymptomWeight::new("increased_hunger", 1.5, "Increased Hunger", "#F4A460"),
    SymptomWeight::new("glucose", 3.0, "High Glucose", "#8B0000"),
    SymptomWeight::new("urine_sugar", 2.0, "High Urine Sugar", "#CD5C5C"),
    SymptomWeight::new("bmi", 2.0, "High BMI", "#DA70D6"),
    SymptomWeight::new("heart_rate", 1.5, "High Heart Rate", "#BC8F8F"),
    SymptomWeight::new("age", 1.0, "Age ≥ 30", "#9ACD32"),
    SymptomWeight::new("previous_gdm", 2.0, "Previous GDM", "#DC143C"),
    SymptomWeight::new("family_history_diabetes", 2.0, "Family History", "#8A2BE2"),
    SymptomWeight::new("pcos", 1.5, "PCOS", "#FF69B4"),
];

/// Severity sliders (0-5) that count from 4 upwards: input key, table key, reason, advice.
const SEVERITY_RULES: [(&str, &str, &str, &str); 3] = [
    (
        "thirst",
        "thirst",
        "Unusually high thirst reported.",
        "→ Drink more water and monitor thirst throughout the day.",
    ),
    (
        "frequent_urination",
        "urination",
        "Frequent urination observed.",
        "→ Avoid excess fluids before bedtime and track urination pattern.",
    ),
    (
        "fatigue",
        "fatigue",
        "Severe fatigue reported.",
        "→ Get adequate rest and monitor your energy levels.",
    ),
];

const HISTORY_RULES: [(&str, &str, &str); 3] = [
    (
        "previous_gdm",
        "Previous GDM increases recurrence risk.",
        "→ Early OGTT is strongly recommended.",
    ),
    (
        "family_history_diabetes",
        "Family history of diabetes present.",
        "→ Be extra mindful of diet and exercise.",
    ),
    (
        "pcos",
        "PCOS is linked to insulin resistance.",
        "→ Reduce refined sugar intake and monitor weight.",
    ),
];

const SEVERE: u8 = 4;

const QUIET_ADVICE: [&str; 3] = [
    "✅ No major symptoms of gestational diabetes (GDM) today.",
    "→ Maintain a balanced diet and regular exercise.",
    "→ Attend routine check-ups and glucose screenings.",
];

/// Gestational diabetes screen combining the day's symptoms, static history
/// and glucose test readings.
///
/// Fasting and post-meal glucose are scored independently against the same
/// table weight, so both readings out of range count it twice.
#[derive(Debug, Clone)]
pub struct GdmEvaluator {
    profile: ScoringProfile,
}

impl GdmEvaluator {
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

impl Default for GdmEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for GdmEvaluator {
    fn condition(&self) -> Condition {
        Condition::Gdm
    }

    fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    fn evaluate(&self, input: &EvaluationInput) -> Result<EvaluationResult, EvaluationError> {
        let mut card = ScoreCard::new(&self.profile);

        for (input_key, factor, reason, advice) in SEVERITY_RULES {
            if input.ordinal_or(input_key, 0)? >= SEVERE {
                card.award(factor, reason, Some(advice))?;
            }
        }

        if input.ordinal_or("hunger", 0)? >= SEVERE {
            card.award(
                "increased_hunger",
                "Increased hunger noted.",
                Some("→ Opt for high-fiber foods and avoid skipping meals."),
            )?;
        }

        if input.flag("blurred_vision")? {
            card.award(
                "blurred_vision",
                "Blurred vision can indicate glucose fluctuations.",
                Some("→ Consider getting your blood sugar checked soon."),
            )?;
        }

        if input.measure("heart_rate")?.is_some_and(|bpm| bpm > 100.0) {
            card.award(
                "heart_rate",
                "High heart rate detected (>100 bpm).",
                Some("→ Stay hydrated and avoid overexertion."),
            )?;
        }

        if input.measure("bmi")?.is_some_and(|bmi| bmi >= 28.0) {
            card.award(
                "bmi",
                "High BMI increases GDM risk.",
                Some("→ Maintain a balanced diet and engage in safe physical activity."),
            )?;
        }

        if input.measure("age")?.is_some_and(|age| age >= 30.0) {
            card.award(
                "age",
                "Age ≥ 30 lowers insulin sensitivity.",
                Some("→ Attend regular glucose screening after age 30."),
            )?;
        }

        for (key, reason, advice) in HISTORY_RULES {
            if input.flag(key)? {
                card.award(key, reason, Some(advice))?;
            }
        }

        if input.measure("fasting_glucose")?.is_some_and(|mg_dl| mg_dl > 95.0) {
            card.award_labeled(
                "glucose",
                "High Fasting Glucose",
                "Fasting glucose above 95 mg/dL.",
                Some("→ Consult your doctor for OGTT if not already done."),
            )?;
        }

        if input.measure("post_meal_glucose")?.is_some_and(|mg_dl| mg_dl > 140.0) {
            card.award_labeled(
                "glucose",
                "High Post-meal Glucose",
                "Post-meal glucose > 140 mg/dL.",
                Some("→ Maintain low glycemic index meals post-lunch."),
            )?;
        }

        if input.ordinal_or("urine_sugar", 0)? >= 2 {
            card.award(
                "urine_sugar",
                "High urine sugar (++ or +++).",
                Some("→ Consider checking blood glucose levels."),
            )?;
        }

        if card.is_empty() {
            return Ok(card.finish_quiet(Condition::Gdm, &[], &QUIET_ADVICE));
        }

        Ok(card.finish(Condition::Gdm))
    }
}
