use super::super::domain::{Condition, EvaluationInput, EvaluationResult};
use super::super::scoring::{
    EvaluationError, Evaluator, ScoreCard, ScoringProfile, ScoringStrategy, SymptomWeight,
    TierThresholds, WeightTable,
};

const WEIGHTS: &[SymptomWeight] = &[
    SymptomWeight::new("harm_thoughts", 3.0, "Harmful Thoughts", "#8B0000"),
    SymptomWeight::new("mood", 2.0, "Low Mood", "#FF6B6B"),
    SymptomWeight::new("anxiety", 2.0, "Anxiety", "#FFA500"),
    SymptomWeight::new("sleep_disturbance", 1.5, "Sleep Issues", "#6A5ACD"),
    SymptomWeight::new("feeling_overwhelmed", 1.5, "Feeling Overwhelmed", "#20B2AA"),
    SymptomWeight::new("hopelessness", 2.0, "Hopelessness", "#DC143C"),
    SymptomWeight::new("support_level", 1.5, "Low Support", "#9ACD32"),
];

/// Sliders (0-5) where 4 or more counts as significant.
const DISTRESS_RULES: [(&str, &str, &str); 4] = [
    (
        "anxiety",
        "High anxiety observed.",
        "→ Practice calming techniques like deep breathing or journaling.",
    ),
    (
        "sleep_disturbance",
        "Severe sleep disturbance noted.",
        "→ Try sleep hygiene routines or relaxation exercises before bed.",
    ),
    (
        "feeling_overwhelmed",
        "Feeling overwhelmed today.",
        "→ Break tasks into smaller parts and ask for help.",
    ),
    (
        "hopelessness",
        "Hopelessness is significantly high.",
        "→ Talk to a counselor or therapist about emotional lows.",
    ),
];

/// Mood and support sliders default to the top of the scale when unreported.
const NEUTRAL_LEVEL: u8 = 5;
const LOW_LEVEL: u8 = 2;
const SIGNIFICANT: u8 = 4;

const QUIET_ADVICE: [&str; 3] = [
    "✅ No major symptoms of mental health concerns today.",
    "→ Practice stress reduction and self-care.",
    "→ Reach out for support if you notice changes in mood.",
];

/// Perinatal mental health screen.
///
/// Harmful thoughts are scored first so that reason always leads the output,
/// but the flag carries only its table weight: on its own it computes to 22%
/// (Low). Escalating it to an unconditional High tier is a product decision
/// that has not been made.
#[derive(Debug, Clone)]
pub struct MentalHealthEvaluator {
    profile: ScoringProfile,
}

impl MentalHealthEvaluator {
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

impl Default for MentalHealthEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for MentalHealthEvaluator {
    fn condition(&self) -> Condition {
        Condition::MentalHealth
    }

    fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    fn evaluate(&self, input: &EvaluationInput) -> Result<EvaluationResult, EvaluationError> {
        let mut card = ScoreCard::new(&self.profile);

        if input.flag("harm_thoughts")? {
            card.award(
                "harm_thoughts",
                "Presence of harmful thoughts detected.",
                Some("→ Seek immediate support from a professional or trusted person."),
            )?;
        }

        if input.ordinal_or("mood", NEUTRAL_LEVEL)? <= LOW_LEVEL {
            card.award(
                "mood",
                "Very low mood reported today.",
                Some("→ Talk to a counselor or therapist about emotional lows."),
            )?;
        }

        for (key, reason, advice) in DISTRESS_RULES {
            if input.ordinal_or(key, 0)? >= SIGNIFICANT {
                card.award(key, reason, Some(advice))?;
            }
        }

        if input.ordinal_or("support_level", NEUTRAL_LEVEL)? <= LOW_LEVEL {
            card.award(
                "support_level",
                "Low emotional or social support.",
                Some("→ Reach out to a friend, partner, or support group."),
            )?;
        }

        if card.is_empty() {
            return Ok(card.finish_quiet(Condition::MentalHealth, &[], &QUIET_ADVICE));
        }

        Ok(card.finish(Condition::MentalHealth))
    }
}
