use super::super::domain::{Condition, EvaluationInput, EvaluationResult};
use super::super::scoring::{
    EvaluationError, Evaluator, ScoreCard, ScoringProfile, ScoringStrategy, SymptomWeight,
    TierThresholds, WeightTable,
};

const WEIGHTS: &[SymptomWeight] = &[
    SymptomWeight::new("bp", 3.0, "High Blood Pressure", "#8B0000"),
    SymptomWeight::new("swelling", 2.0, "Swelling", "#FF8C00"),
    SymptomWeight::new("headache", 1.5, "Severe Headache", "#FF4500"),
    SymptomWeight::new("blurred_vision", 1.5, "Blurred Vision", "#9932CC"),
    SymptomWeight::new("urination", 1.0, "Low Urination", "#1E90FF"),
    SymptomWeight::new("chronic_hypertension", 2.0, "Chronic Hypertension", "#DA70D6"),
    SymptomWeight::new("diabetes", 2.0, "Diabetes History", "#FF69B4"),
];

const HYPERTENSIVE_SYSTOLIC: f64 = 140.0;
/// Urine output slider value assumed when nothing was reported.
const DEFAULT_URINATION: u8 = 3;

const QUIET_REASON: &str = "No major symptoms of preeclampsia were detected today.";
const QUIET_ADVICE: [&str; 2] = [
    "→ Continue tracking your BP and swelling daily.",
    "→ Maintain hydration and avoid high-sodium foods.",
];

#[derive(Debug, Clone)]
pub struct PreeclampsiaEvaluator {
    profile: ScoringProfile,
}

impl PreeclampsiaEvaluator {
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

impl Default for PreeclampsiaEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for PreeclampsiaEvaluator {
    fn condition(&self) -> Condition {
        Condition::Preeclampsia
    }

    fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    fn evaluate(&self, input: &EvaluationInput) -> Result<EvaluationResult, EvaluationError> {
        let mut card = ScoreCard::new(&self.profile);

        if input
            .measure("systolic")?
            .is_some_and(|mm_hg| mm_hg >= HYPERTENSIVE_SYSTOLIC)
        {
            card.award(
                "bp",
                "Blood pressure is high today (≥140 mmHg).",
                Some("→ Monitor your BP regularly and consult your doctor."),
            )?;
        }

        if input.flag("swelling")? {
            card.award(
                "swelling",
                "Swelling in hands or face is present.",
                Some("→ Reduce salt intake and rest with feet elevated."),
            )?;
        }

        if input.ordinal_or("headache", 0)? >= 4 {
            card.award(
                "headache",
                "Severe headache reported today.",
                Some("→ Take adequate rest and inform your healthcare provider."),
            )?;
        }

        if input.flag("blurred_vision")? {
            card.award(
                "blurred_vision",
                "Blurred vision or visual disturbance reported.",
                Some("→ Avoid screen time and get your eyes checked."),
            )?;
        }

        if input.ordinal_or("urination", DEFAULT_URINATION)? <= 1 {
            card.award(
                "urination",
                "Very low urine output reported today.",
                Some("→ Ensure you're staying hydrated and inform your doctor."),
            )?;
        }

        if input.flag("chronic_hypertension")? {
            card.award(
                "chronic_hypertension",
                "Pre-existing chronic hypertension increases your risk.",
                Some("→ Follow your hypertension management plan carefully."),
            )?;
        }

        if input.flag("diabetes")? {
            card.award(
                "diabetes",
                "History of diabetes is a known risk factor.",
                Some("→ Keep your blood sugar under control and avoid stress."),
            )?;
        }

        if card.is_empty() {
            return Ok(card.finish_quiet(
                Condition::Preeclampsia,
                &[QUIET_REASON],
                &QUIET_ADVICE,
            ));
        }

        Ok(card.finish(Condition::Preeclampsia))
    }
}
