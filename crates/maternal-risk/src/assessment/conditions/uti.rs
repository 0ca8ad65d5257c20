use super::super::domain::{Condition, EvaluationInput, EvaluationResult, RiskTier};
use super::super::scoring::{
    EvaluationError, Evaluator, ScoreCard, ScoringProfile, ScoringStrategy, SymptomWeight,
    TierThresholds, WeightTable,
};

const WEIGHTS: &[SymptomWeight] = &[
    SymptomWeight::new("frequent_urination", 2.0, "Frequent Urination", "#FFA500"),
    SymptomWeight::new("burning_sensation", 2.5, "Burning Sensation", "#FF4500"),
    SymptomWeight::new("lower_abdominal_pain", 2.0, "Abdominal Pain", "#B22222"),
    SymptomWeight::new("fever", 2.0, "Fever", "#DC143C"),
    SymptomWeight::new("cloudy_urine", 1.5, "Cloudy Urine", "#BDB76B"),
    SymptomWeight::new("blood_in_urine", 2.5, "Blood in Urine", "#8B0000"),
    SymptomWeight::new("history_of_uti", 1.5, "UTI History", "#DAA520"),
];

const RULES: [(&str, &str, &str); 7] = [
    (
        "frequent_urination",
        "Frequent urination detected",
        "→ Track urination frequency throughout the day",
    ),
    (
        "burning_sensation",
        "Burning sensation while urinating",
        "→ Increase water intake to help flush out bacteria",
    ),
    (
        "lower_abdominal_pain",
        "Lower abdominal pain present",
        "→ Apply warm compress to lower abdomen for relief",
    ),
    (
        "fever",
        "Fever detected - possible infection spreading",
        "→ Monitor temperature regularly; seek medical attention if fever persists",
    ),
    (
        "cloudy_urine",
        "Cloudy or foul-smelling urine observed",
        "→ Maintain good hygiene and drink more fluids",
    ),
    (
        "blood_in_urine",
        "Blood in urine - indicates severe UTI",
        "→ URGENT: Consult doctor immediately for urine culture test",
    ),
    (
        "history_of_uti",
        "Previous history of UTI increases recurrence risk",
        "→ Consider preventive measures and regular check-ups",
    ),
];

const QUIET_ADVICE: [&str; 4] = [
    "✅ No major symptoms of UTI detected today.",
    "→ Stay hydrated (8-10 glasses of water daily)",
    "→ Maintain proper hygiene practices",
    "→ Urinate regularly and don't hold urine for long periods",
];

const HIGH_RISK_ADVICE: [&str; 3] = [
    "→ URGENT: Schedule appointment with healthcare provider",
    "→ Request urine culture and sensitivity test",
    "→ Complete full course of antibiotics if prescribed",
];

const MODERATE_RISK_ADVICE: [&str; 3] = [
    "→ Monitor symptoms closely for next 24-48 hours",
    "→ Increase fluid intake significantly",
    "→ Consider over-the-counter urinary pain relief (consult pharmacist)",
];

/// Urinary tract infection screen over seven presence flags.
#[derive(Debug, Clone)]
pub struct UtiEvaluator {
    profile: ScoringProfile,
}

impl UtiEvaluator {
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
            TierThresholds::SCREENING,
        )
    }
}

impl Default for UtiEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for UtiEvaluator {
    fn condition(&self) -> Condition {
        Condition::Uti
    }

    fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    fn evaluate(&self, input: &EvaluationInput) -> Result<EvaluationResult, EvaluationError> {
        let mut card = ScoreCard::new(&self.profile);

        for (key, reason, advice) in RULES {
            if input.flag(key)? {
                card.award(key, reason, Some(advice))?;
            }
        }

        if card.is_empty() {
            return Ok(card.finish_quiet(Condition::Uti, &[], &QUIET_ADVICE));
        }

        let escalation: &[&str] = match card.standing().1 {
            RiskTier::High => &HIGH_RISK_ADVICE,
            RiskTier::Moderate => &MODERATE_RISK_ADVICE,
            RiskTier::Low | RiskTier::Error => &[],
        };
        for line in escalation {
            card.advise(*line);
        }

        Ok(card.finish(Condition::Uti))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_symptom_reaches_one_hundred() {
        let input = RULES
            .iter()
            .fold(EvaluationInput::new(), |input, (key, _, _)| input.with_flag(*key, true));

        let result = UtiEvaluator::new().evaluate(&input).expect("evaluates");

        assert_eq!(result.probability, 100);
        assert_eq!(result.risk_tier, RiskTier::High);
        assert_eq!(result.contributions.len(), 7);
        assert_eq!(result.advice.len(), 7 + HIGH_RISK_ADVICE.len());
    }

    #[test]
    fn burning_and_blood_reach_moderate() {
        let input = EvaluationInput::new()
            .with_flag("burning_sensation", true)
            .with_flag("blood_in_urine", true)
            .with_flag("fever", true);

        let result = UtiEvaluator::new().evaluate(&input).expect("evaluates");

        // 7.0 / 14.0
        assert_eq!(result.probability, 50);
        assert_eq!(result.risk_tier, RiskTier::Moderate);
        assert_eq!(result.advice.last().map(String::as_str), MODERATE_RISK_ADVICE.last().copied());
    }

    #[test]
    fn single_mild_symptom_stays_low_without_escalation() {
        let input = EvaluationInput::new().with_flag("cloudy_urine", true);

        let result = UtiEvaluator::new().evaluate(&input).expect("evaluates");

        assert_eq!(result.probability, 11);
        assert_eq!(result.risk_tier, RiskTier::Low);
        assert_eq!(result.advice.len(), 1);
    }

    #[test]
    fn quiet_day_leaves_reasons_empty_and_leads_advice_with_reassurance() {
        let result = UtiEvaluator::new()
            .evaluate(&EvaluationInput::new())
            .expect("evaluates");

        assert!(result.reasons.is_empty());
        assert_eq!(
            result.advice.first().map(String::as_str),
            Some("✅ No major symptoms of UTI detected today.")
        );
        assert_eq!(result.advice.len(), QUIET_ADVICE.len());
        assert!(result.contributions.is_empty());
        assert_eq!(result.probability, 0);
    }
}
