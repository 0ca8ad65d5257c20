use super::super::domain::{Condition, EvaluationInput, EvaluationResult, RiskTier};
use super::super::scoring::{
    EvaluationError, Evaluator, ScoreCard, ScoringProfile, ScoringStrategy, SymptomWeight,
    TierThresholds, WeightTable,
};

const WEIGHTS: &[SymptomWeight] = &[
    SymptomWeight::new("fatigue", 2.0, "Fatigue", "#B22222"),
    SymptomWeight::new("weight_gain", 1.5, "Weight Gain", "#A0522D"),
    SymptomWeight::new("cold_intolerance", 2.0, "Cold Intolerance", "#4682B4"),
    SymptomWeight::new("constipation", 1.2, "Constipation", "#8B4513"),
    SymptomWeight::new("hair_loss", 1.5, "Hair Loss", "#DAA520"),
    SymptomWeight::new("palpitations", 1.3, "Palpitations", "#DC143C"),
    SymptomWeight::new("menstrual_irregularity", 1.5, "Menstrual Issues", "#FF69B4"),
    SymptomWeight::new("tsh", 3.0, "TSH", "#8B0000"),
    SymptomWeight::new("t3", 2.0, "T3", "#CD5C5C"),
    SymptomWeight::new("t4", 2.0, "T4", "#FF6347"),
    SymptomWeight::new("family_history", 1.8, "Family History", "#9370DB"),
    SymptomWeight::new("bmi", 1.0, "High BMI", "#D2B48C"),
];

/// Flag-style symptoms in evaluation order: key, reason, advice.
const SYMPTOMS: [(&str, &str, &str); 7] = [
    (
        "fatigue",
        "Persistent fatigue reported",
        "→ Ensure adequate rest and consider thyroid function testing",
    ),
    (
        "weight_gain",
        "Unexplained weight gain observed",
        "→ Monitor weight regularly and maintain balanced diet",
    ),
    (
        "cold_intolerance",
        "Cold intolerance - classic hypothyroid symptom",
        "→ Keep warm and track body temperature regularly",
    ),
    (
        "constipation",
        "Constipation present - may indicate low thyroid",
        "→ Increase fiber intake and stay hydrated",
    ),
    (
        "hair_loss",
        "Hair loss or thinning observed",
        "→ Hair changes often accompany thyroid disorders",
    ),
    (
        "palpitations",
        "Heart palpitations detected",
        "→ May indicate hyperthyroidism; monitor heart rate",
    ),
    (
        "menstrual_irregularity",
        "Menstrual irregularity reported",
        "→ Thyroid hormones affect reproductive cycle",
    ),
];

const TSH_HIGH: f64 = 4.0;
const TSH_HIGH_SPAN: f64 = 2.0;
const TSH_LOW: f64 = 0.4;
const TSH_LOW_SPAN: f64 = 0.3;
const MAX_TSH_SCALE: f64 = 2.0;

/// Disorder suggested by a TSH reading, using the same cut-offs as the scoring rule.
fn tsh_finding(tsh: f64) -> &'static str {
    if tsh > TSH_HIGH {
        "Hypothyroidism (Underactive)"
    } else if tsh < TSH_LOW {
        "Hyperthyroidism (Overactive)"
    } else {
        "Normal TSH Range"
    }
}

const QUIET_REASON: &str = "No significant thyroid-related symptoms reported today.";
const QUIET_ADVICE: [&str; 4] = [
    "✅ No major thyroid disorder symptoms detected.",
    "→ Maintain healthy lifestyle and balanced diet",
    "→ Include iodine-rich foods (fish, dairy, eggs)",
    "→ Schedule routine thyroid screening annually",
];

const HIGH_RISK_ADVICE: [&str; 4] = [
    "→ CRITICAL: Schedule endocrinologist appointment immediately",
    "→ Request complete thyroid panel (TSH, Free T3, Free T4, TPO antibodies)",
    "→ Avoid self-medication with thyroid supplements",
    "→ Monitor symptoms daily until medical consultation",
];

const MODERATE_RISK_ADVICE: [&str; 4] = [
    "→ Schedule thyroid function test within 2 weeks",
    "→ Track symptoms in a diary (fatigue, weight, temperature)",
    "→ Reduce goitrogenic foods if hypothyroid symptoms present",
    "→ Maintain regular sleep schedule and stress management",
];

/// Thyroid screen combining symptom flags with TSH/T3/T4 labs.
///
/// TSH is the only continuously scaled rule: an out-of-range reading adds the
/// TSH weight multiplied by its distance from the threshold over the span,
/// capped at twice the weight. Missing labs never trigger.
#[derive(Debug, Clone)]
pub struct ThyroidEvaluator {
    profile: ScoringProfile,
}

impl ThyroidEvaluator {
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

impl Default for ThyroidEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for ThyroidEvaluator {
    fn condition(&self) -> Condition {
        Condition::Thyroid
    }

    fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    fn evaluate(&self, input: &EvaluationInput) -> Result<EvaluationResult, EvaluationError> {
        let mut card = ScoreCard::new(&self.profile);

        for (key, reason, advice) in SYMPTOMS {
            if input.flag(key)? {
                card.award(key, reason, Some(advice))?;
            }
        }

        if let Some(tsh) = input.measure("tsh")? {
            card.note_finding(tsh_finding(tsh));
            if tsh > TSH_HIGH {
                card.award_scaled(
                    "tsh",
                    "High TSH",
                    ((tsh - TSH_HIGH) / TSH_HIGH_SPAN).min(MAX_TSH_SCALE),
                    format!("Elevated TSH level ({tsh:.2} mIU/L) - indicates hypothyroidism"),
                    Some("→ URGENT: Consult endocrinologist for thyroid hormone therapy"),
                )?;
            } else if tsh < TSH_LOW {
                card.award_scaled(
                    "tsh",
                    "Low TSH",
                    ((TSH_LOW - tsh) / TSH_LOW_SPAN).min(MAX_TSH_SCALE),
                    format!("Low TSH level ({tsh:.2} mIU/L) - indicates hyperthyroidism"),
                    Some("→ URGENT: Medical evaluation needed for hyperthyroidism"),
                )?;
            }
        }

        if let Some(t3) = input.measure("t3")? {
            if t3 < 1.2 {
                card.award_labeled(
                    "t3",
                    "Low T3",
                    format!("Low T3 level ({t3:.2}) detected"),
                    Some("→ Low T3 reduces metabolism and energy"),
                )?;
            } else if t3 > 4.0 {
                card.award_labeled(
                    "t3",
                    "High T3",
                    format!("Elevated T3 level ({t3:.2}) detected"),
                    Some("→ High T3 may cause anxiety and rapid heartbeat"),
                )?;
            }
        }

        if let Some(t4) = input.measure("t4")? {
            if t4 < 0.8 {
                card.award_labeled(
                    "t4",
                    "Low T4",
                    format!("Low T4 level ({t4:.2}) detected"),
                    Some("→ Low T4 confirms hypothyroidism diagnosis"),
                )?;
            } else if t4 > 2.5 {
                card.award_labeled(
                    "t4",
                    "High T4",
                    format!("Elevated T4 level ({t4:.2}) detected"),
                    Some("→ High T4 requires immediate medical attention"),
                )?;
            }
        }

        if input.flag("family_history")? {
            card.award(
                "family_history",
                "Family history of thyroid disorders",
                Some("→ Genetic predisposition increases risk - regular screening advised"),
            )?;
        }

        if let Some(bmi) = input.measure("bmi")? {
            if bmi >= 30.0 {
                card.award(
                    "bmi",
                    format!("High BMI ({bmi:.1}) - associated with thyroid dysfunction"),
                    Some("→ Weight management important for thyroid health"),
                )?;
            }
        }

        if card.is_empty() {
            return Ok(card.finish_quiet(Condition::Thyroid, &[QUIET_REASON], &QUIET_ADVICE));
        }

        let escalation: &[&str] = match card.standing().1 {
            RiskTier::High => &HIGH_RISK_ADVICE,
            RiskTier::Moderate => &MODERATE_RISK_ADVICE,
            RiskTier::Low | RiskTier::Error => &[],
        };
        for line in escalation {
            card.advise(*line);
        }

        Ok(card.finish(Condition::Thyroid))
    }
}
