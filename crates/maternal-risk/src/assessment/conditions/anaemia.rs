use super::super::domain::{Condition, EvaluationInput, EvaluationResult, Trimester};
use super::super::scoring::{
    EvaluationError, Evaluator, ScoreCard, ScoringProfile, ScoringStrategy, SymptomWeight,
    TierThresholds, WeightTable,
};

const POINTS: &[SymptomWeight] = &[
    SymptomWeight::new("young_maternal_age", 12.0, "Age Under 20", "#9ACD32"),
    SymptomWeight::new("advanced_maternal_age", 10.0, "Age 35+", "#6B8E23"),
    SymptomWeight::new("third_trimester", 15.0, "Third Trimester", "#4682B4"),
    SymptomWeight::new("second_trimester", 8.0, "Second Trimester", "#87CEEB"),
    SymptomWeight::new("fatigue", 20.0, "Fatigue", "#B22222"),
    SymptomWeight::new("pale_skin", 22.0, "Pale Skin", "#FFA07A"),
    SymptomWeight::new("dizziness", 18.0, "Dizziness", "#CD5C5C"),
    SymptomWeight::new("shortness_of_breath", 20.0, "Breathlessness", "#FF7F50"),
    SymptomWeight::new("headache", 15.0, "Headache", "#FF4500"),
    SymptomWeight::new("cold_hands_feet", 16.0, "Cold Hands & Feet", "#5F9EA0"),
    SymptomWeight::new("history_of_anaemia", 25.0, "Anaemia History", "#8B0000"),
    SymptomWeight::new("multiple_symptoms", 15.0, "5+ Symptoms", "#DC143C"),
    SymptomWeight::new("four_symptoms", 10.0, "4 Symptoms", "#E9967A"),
    SymptomWeight::new("three_symptoms", 5.0, "3 Symptoms", "#F4A460"),
];

const THRESHOLDS: TierThresholds = TierThresholds {
    moderate: 35.0,
    high: 60.0,
};

const GENERAL_ADVICE: [&str; 7] = [
    "🥩 Eat iron-rich foods: red meat, spinach, lentils, beans, fortified cereals",
    "🍊 Consume Vitamin C with iron sources (citrus fruits, tomatoes) for better absorption",
    "💊 Take prescribed iron supplements (typically 30-60mg daily during pregnancy)",
    "☕ Avoid tea/coffee with meals as they inhibit iron absorption",
    "🍳 Cook in iron cookware to increase iron content in food",
    "📊 Request Complete Blood Count (CBC) test to check hemoglobin levels",
    "📅 Attend all prenatal appointments for regular monitoring",
];

/// Point-based anaemia screen: age, trimester, six symptoms, history and a
/// bonus for symptom clusters, capped at 100.
#[derive(Debug, Clone)]
pub struct AnaemiaEvaluator {
    profile: ScoringProfile,
}

impl AnaemiaEvaluator {
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

impl Default for AnaemiaEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for AnaemiaEvaluator {
    fn condition(&self) -> Condition {
        Condition::Anaemia
    }

    fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    fn evaluate(&self, input: &EvaluationInput) -> Result<EvaluationResult, EvaluationError> {
        let mut card = ScoreCard::new(&self.profile);
        let mut guidance = Vec::new();

        let age = input.measure_or("age", 25.0)?;
        if age < 20.0 {
            card.award(
                "young_maternal_age",
                format!("Maternal age {age:.0} is under 20, which raises iron demand."),
                None,
            )?;
        } else if age >= 35.0 {
            card.award(
                "advanced_maternal_age",
                format!("Maternal age {age:.0} is 35 or above."),
                None,
            )?;
        }

        let trimester = input.category::<Trimester>("trimester")?;
        match trimester {
            Some(Trimester::Third) => {
                card.award("third_trimester", "Third trimester iron demand is at its peak.", None)?;
            }
            Some(Trimester::Second) => {
                card.award("second_trimester", "Second trimester iron demand is rising.", None)?;
            }
            Some(Trimester::First) | None => {}
        }

        let fatigue = input.flag("fatigue")?;
        let pale_skin = input.flag("pale_skin")?;
        let dizziness = input.flag("dizziness")?;
        let breathless = input.flag("shortness_of_breath")?;
        let headache = input.flag("headache")?;
        let cold_extremities = input.flag("cold_hands_feet")?;
        let history = input.flag("history_of_anaemia")?;

        if fatigue {
            card.award("fatigue", "Persistent fatigue reported.", None)?;
        }
        if pale_skin {
            card.award("pale_skin", "Pale skin can be a visible sign of anaemia.", None)?;
        }
        if dizziness {
            card.award("dizziness", "Dizziness reported.", None)?;
        }
        if breathless {
            card.award("shortness_of_breath", "Shortness of breath reported.", None)?;
        }
        if headache {
            card.award("headache", "Headache reported.", None)?;
        }
        if cold_extremities {
            card.award("cold_hands_feet", "Cold hands and feet suggest poor circulation.", None)?;
        }
        if history {
            card.award("history_of_anaemia", "Previous anaemia is a strong predictor.", None)?;
        }

        let symptom_count = [fatigue, pale_skin, dizziness, breathless, headache, cold_extremities]
            .into_iter()
            .filter(|present| *present)
            .count();

        if symptom_count >= 5 {
            card.award(
                "multiple_symptoms",
                format!("{symptom_count} anaemia symptoms present together."),
                None,
            )?;
        } else if symptom_count == 4 {
            card.award("four_symptoms", "Four anaemia symptoms present together.", None)?;
        } else if symptom_count == 3 {
            card.award("three_symptoms", "Three anaemia symptoms present together.", None)?;
        }

        let urgent = (pale_skin && breathless).then_some(
            "⚠️ URGENT: Severe symptoms detected. Contact your healthcare provider immediately",
        );
        if history {
            guidance.push("Schedule regular hemoglobin checks (every 4-6 weeks) due to previous anaemia");
        }
        if fatigue || dizziness {
            guidance.push("Get adequate rest, avoid sudden position changes to prevent dizziness");
        }
        if pale_skin {
            guidance.push("Monitor for worsening pallor, especially in nail beds and inner eyelids");
        }
        if breathless {
            guidance.push("Avoid strenuous activities and rest when experiencing breathlessness");
        }
        if cold_extremities {
            guidance.push("Keep extremities warm, wear warm socks and gloves in cold weather");
        }
        if headache {
            guidance.push("Stay hydrated and maintain regular meal times to prevent headaches");
        }
        if trimester == Some(Trimester::Third) {
            guidance.push("Third trimester requires extra iron - discuss supplementation with your doctor");
        }
        if symptom_count >= 5 {
            guidance.push("Multiple symptoms present - comprehensive blood work recommended");
        }

        for line in urgent.into_iter().chain(guidance).chain(GENERAL_ADVICE) {
            card.advise(line);
        }

        Ok(card.finish(Condition::Anaemia))
    }
}
