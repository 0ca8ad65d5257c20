use super::super::domain::{Condition, EvaluationInput, EvaluationResult};
use super::super::scoring::{
    EvaluationError, Evaluator, ScoreCard, ScoringProfile, ScoringStrategy, SymptomWeight,
    TierThresholds, WeightTable,
};

const POINTS: &[SymptomWeight] = &[
    SymptomWeight::new("very_young_age", 15.0, "Age Under 20", "#9ACD32"),
    SymptomWeight::new("advanced_maternal_age", 20.0, "Age 35-39", "#6B8E23"),
    SymptomWeight::new("high_maternal_age", 35.0, "Age 40+", "#556B2F"),
    SymptomWeight::new("high_blood_pressure", 25.0, "High Blood Pressure", "#8B0000"),
    SymptomWeight::new("bleeding", 30.0, "Bleeding", "#DC143C"),
    SymptomWeight::new("cramping", 20.0, "Cramping", "#FF6347"),
    SymptomWeight::new("high_stress", 15.0, "High Stress", "#6A5ACD"),
    SymptomWeight::new("moderate_stress", 8.0, "Moderate Stress", "#9370DB"),
    SymptomWeight::new("previous_miscarriage", 25.0, "Past Miscarriage", "#8A2BE2"),
    SymptomWeight::new("thyroid_disorder", 18.0, "Thyroid Disorder", "#4682B4"),
    SymptomWeight::new("diabetes", 20.0, "Diabetes", "#FF69B4"),
    SymptomWeight::new("underweight", 12.0, "Underweight", "#F4A460"),
    SymptomWeight::new("obesity", 18.0, "Obesity", "#DA70D6"),
    SymptomWeight::new("overweight", 8.0, "Overweight", "#D2B48C"),
    SymptomWeight::new("smoking", 22.0, "Smoking", "#696969"),
    SymptomWeight::new("alcohol_consumption", 20.0, "Alcohol", "#A0522D"),
    SymptomWeight::new("severe_anemia", 20.0, "Severe Anaemia", "#B22222"),
    SymptomWeight::new("mild_anemia", 12.0, "Mild Anaemia", "#CD5C5C"),
    SymptomWeight::new("high_blood_sugar", 18.0, "High Blood Sugar", "#FF4500"),
    SymptomWeight::new("borderline_blood_sugar", 10.0, "Borderline Blood Sugar", "#FFA500"),
];

const THRESHOLDS: TierThresholds = TierThresholds {
    moderate: 30.0,
    high: 60.0,
};

const DEFAULT_AGE: f64 = 25.0;
const DEFAULT_STRESS: u8 = 0;
const DEFAULT_HEMOGLOBIN: f64 = 12.0;
const DEFAULT_BLOOD_SUGAR: f64 = 100.0;

const ROUTINE_ADVICE: &str = "✅ Continue regular prenatal care and healthy lifestyle habits";
const GENERAL_ADVICE: [&str; 3] = [
    "💊 Take prenatal vitamins with folic acid daily",
    "🏃‍♀️ Engage in moderate exercise as approved by your doctor",
    "😴 Get adequate rest and maintain a healthy sleep schedule",
];

/// Point-based miscarriage screen over age, symptoms, history, lifestyle
/// and two lab readings, capped at 100.
#[derive(Debug, Clone)]
pub struct MiscarriageEvaluator {
    profile: ScoringProfile,
}

impl MiscarriageEvaluator {
    pub fn new() -> Self {
        Self::with_profile(Self::standard_profile())
    }

    pub fn with_profile(profile: ScoringProfile) -> Self {
        Self { profile }
    }

    pub fn standard_profile() -> ScoringProfile {
        ScoringProfile::new(
            WeightTable::new(POINTS),
            ScoringStrategy::CappedSum { cap: 100.0 },
            THRESHOLDS,
        )
    }
}

impl Default for MiscarriageEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for MiscarriageEvaluator {
    fn condition(&self) -> Condition {
        Condition::Miscarriage
    }

    fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    fn evaluate(&self, input: &EvaluationInput) -> Result<EvaluationResult, EvaluationError> {
        let mut card = ScoreCard::new(&self.profile);
        let mut guidance = Vec::new();

        let age = input.measure_or("age", DEFAULT_AGE)?;
        if age < 20.0 {
            card.award("very_young_age", format!("Maternal age {age:.0} is under 20."), None)?;
        } else if (35.0..40.0).contains(&age) {
            card.award(
                "advanced_maternal_age",
                format!("Advanced maternal age ({age:.0})."),
                None,
            )?;
        } else if age >= 40.0 {
            card.award(
                "high_maternal_age",
                format!("Maternal age {age:.0} carries the highest age-related risk."),
                None,
            )?;
        }

        let high_blood_pressure = input.flag("high_blood_pressure")?;
        let bleeding = input.flag("bleeding")?;
        let cramping = input.flag("cramping")?;
        if high_blood_pressure {
            card.award("high_blood_pressure", "High blood pressure reported.", None)?;
        }
        if bleeding {
            card.award("bleeding", "Vaginal bleeding reported.", None)?;
        }
        if cramping {
            card.award("cramping", "Abdominal cramping reported.", None)?;
        }

        let stress = input.ordinal_or("stress_level", DEFAULT_STRESS)?;
        if stress >= 4 {
            card.award("high_stress", format!("High stress level ({stress}/5)."), None)?;
        } else if stress == 3 {
            card.award("moderate_stress", "Moderate stress level (3/5).", None)?;
        }

        let previous = input.flag("previous_miscarriage")?;
        let thyroid = input.flag("thyroid_disorder")?;
        let diabetes = input.flag("diabetes")?;
        if previous {
            card.award("previous_miscarriage", "Previous miscarriage is a strong predictor.", None)?;
        }
        if thyroid {
            card.award("thyroid_disorder", "Thyroid disorder reported.", None)?;
        }
        if diabetes {
            card.award("diabetes", "Diabetes reported.", None)?;
        }

        let mut weight_concern = false;
        if let Some(bmi) = input.measure("bmi")? {
            if bmi < 18.5 {
                weight_concern = true;
                card.award("underweight", format!("Underweight BMI ({bmi:.1})."), None)?;
            } else if bmi >= 30.0 {
                weight_concern = true;
                card.award("obesity", format!("Obese BMI ({bmi:.1})."), None)?;
            } else if bmi >= 25.0 {
                card.award("overweight", format!("Overweight BMI ({bmi:.1})."), None)?;
            }
        }

        let smoking = input.flag("smoking")?;
        let alcohol = input.flag("alcohol")?;
        if smoking {
            card.award("smoking", "Smoking during pregnancy.", None)?;
        }
        if alcohol {
            card.award("alcohol_consumption", "Alcohol consumption during pregnancy.", None)?;
        }

        let hemoglobin = input.measure_or("hemoglobin", DEFAULT_HEMOGLOBIN)?;
        let anaemic = hemoglobin < 11.0;
        if hemoglobin < 10.0 {
            card.award(
                "severe_anemia",
                format!("Hemoglobin {hemoglobin:.1} g/dL indicates severe anaemia."),
                None,
            )?;
        } else if anaemic {
            card.award(
                "mild_anemia",
                format!("Hemoglobin {hemoglobin:.1} g/dL indicates mild anaemia."),
                None,
            )?;
        }

        let blood_sugar = input.measure_or("blood_sugar", DEFAULT_BLOOD_SUGAR)?;
        let high_sugar = blood_sugar >= 140.0;
        if high_sugar {
            card.award(
                "high_blood_sugar",
                format!("Blood sugar {blood_sugar:.0} mg/dL is high."),
                None,
            )?;
        } else if blood_sugar >= 126.0 {
            card.award(
                "borderline_blood_sugar",
                format!("Blood sugar {blood_sugar:.0} mg/dL is borderline."),
                None,
            )?;
        }

        if bleeding || cramping {
            guidance.push(
                "⚠️ URGENT: Contact your healthcare provider immediately about bleeding/cramping",
            );
        }
        if high_blood_pressure {
            guidance.push("Monitor blood pressure daily and follow prescribed medications");
        }
        if stress >= 4 {
            guidance.push("Practice stress reduction: meditation, prenatal yoga, or counseling");
        }
        if previous {
            guidance.push(
                "Request early ultrasound monitoring and progesterone supplementation if appropriate",
            );
        }
        if thyroid {
            guidance.push("Ensure thyroid levels are optimized with regular TSH monitoring");
        }
        if diabetes || high_sugar {
            guidance.push("Maintain tight blood sugar control through diet, exercise, and medication");
        }
        if smoking {
            guidance.push("🚭 Quit smoking immediately - seek smoking cessation support");
        }
        if alcohol {
            guidance.push("🍷 Completely avoid alcohol during pregnancy");
        }
        if anaemic {
            guidance.push("Take iron supplements and eat iron-rich foods (spinach, red meat, beans)");
        }
        if weight_concern {
            guidance.push("Work with a nutritionist for appropriate pregnancy weight management");
        }
        if age >= 35.0 {
            guidance.push("Discuss additional monitoring options with your obstetrician");
        }
        if guidance.is_empty() {
            guidance.push(ROUTINE_ADVICE);
        }

        for line in guidance.into_iter().chain(GENERAL_ADVICE) {
            card.advise(line);
        }

        Ok(card.finish(Condition::Miscarriage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::domain::RiskTier;

    #[test]
    fn safe_defaults_score_zero_with_routine_advice() {
        let result = MiscarriageEvaluator::new()
            .evaluate(&EvaluationInput::new())
            .expect("evaluates");

        assert_eq!(result.probability, 0);
        assert_eq!(result.risk_tier, RiskTier::Low);
        assert!(result.contributions.is_empty());
        assert_eq!(result.advice[0], ROUTINE_ADVICE);
        assert_eq!(result.advice.len(), 1 + GENERAL_ADVICE.len());
    }

    #[test]
    fn bleeding_with_cramping_is_urgent_and_moderate() {
        let input = EvaluationInput::new()
            .with_flag("bleeding", true)
            .with_flag("cramping", true);

        let result = MiscarriageEvaluator::new().evaluate(&input).expect("evaluates");

        assert_eq!(result.probability, 50);
        assert_eq!(result.risk_tier, RiskTier::Moderate);
        assert!(result.advice[0].starts_with("⚠️ URGENT"));
    }

    #[test]
    fn bands_award_the_intermediate_increments() {
        let input = EvaluationInput::new()
            .with_ordinal("stress_level", 3)
            .with_measure("bmi", 27.0)
            .with_measure("blood_sugar", 130.0);

        let result = MiscarriageEvaluator::new().evaluate(&input).expect("evaluates");

        let keys: Vec<_> = result.contributions.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["moderate_stress", "overweight", "borderline_blood_sugar"]);
        assert_eq!(result.probability, 26);
        assert_eq!(result.reasons.len(), 3);
        // No factor-specific guidance fires for the intermediate bands.
        assert_eq!(result.advice[0], ROUTINE_ADVICE);
    }

    #[test]
    fn points_are_monotonic_and_capped() {
        let evaluator = MiscarriageEvaluator::new();
        let mut input = EvaluationInput::new().with_measure("age", 41.0);
        let mut last = evaluator.evaluate(&input).expect("evaluates").probability;

        for key in ["bleeding", "cramping", "smoking", "alcohol", "diabetes"] {
            input = input.with_flag(key, true);
            let next = evaluator.evaluate(&input).expect("evaluates").probability;
            assert!(next >= last);
            last = next;
        }

        assert_eq!(last, 100);
    }
}
