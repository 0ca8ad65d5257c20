//! Per-condition rule sets. Each evaluator binds its scoring profile at
//! construction and never mutates it afterwards.

mod anaemia;
mod anaemia_tracker;
mod gdm;
mod mental_health;
mod miscarriage;
mod preeclampsia;
mod thyroid;
mod uti;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use anaemia::AnaemiaEvaluator;
pub use anaemia_tracker::AnaemiaTrackerEvaluator;
pub use gdm::GdmEvaluator;
pub use mental_health::MentalHealthEvaluator;
pub use miscarriage::MiscarriageEvaluator;
pub use preeclampsia::PreeclampsiaEvaluator;
pub use thyroid::ThyroidEvaluator;
pub use uti::UtiEvaluator;

use super::domain::Condition;
use super::scoring::{Evaluator, ScoringProfile, ScoringStrategy};

/// Which anaemia rule set scores [`Condition::Anaemia`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnaemiaModel {
    /// Point-based screen over age, trimester, symptoms and history, capped at 100.
    #[default]
    Screening,
    /// Daily tracker: severity sliders, heart rate, pica and dietary iron, weighted-normalized.
    Tracker,
}

impl AnaemiaModel {
    pub fn profile(self) -> ScoringProfile {
        match self {
            AnaemiaModel::Screening => AnaemiaEvaluator::standard_profile(),
            AnaemiaModel::Tracker => AnaemiaTrackerEvaluator::standard_profile(),
        }
    }

    pub fn evaluator(self) -> Arc<dyn Evaluator> {
        evaluator_with_profile(Condition::Anaemia, self.profile())
    }

    pub const fn name(self) -> &'static str {
        match self {
            AnaemiaModel::Screening => "screening",
            AnaemiaModel::Tracker => "tracker",
        }
    }
}

impl fmt::Display for AnaemiaModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown anaemia model '{0}' (expected screening or tracker)")]
pub struct UnknownAnaemiaModel(pub String);

impl FromStr for AnaemiaModel {
    type Err = UnknownAnaemiaModel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "screening" | "capped" => Ok(AnaemiaModel::Screening),
            "tracker" | "daily" => Ok(AnaemiaModel::Tracker),
            other => Err(UnknownAnaemiaModel(other.to_string())),
        }
    }
}

/// Default scoring profile for a condition.
pub fn standard_profile(condition: Condition) -> ScoringProfile {
    match condition {
        Condition::Anaemia => AnaemiaEvaluator::standard_profile(),
        Condition::Thyroid => ThyroidEvaluator::standard_profile(),
        Condition::Miscarriage => MiscarriageEvaluator::standard_profile(),
        Condition::Uti => UtiEvaluator::standard_profile(),
        Condition::Gdm => GdmEvaluator::standard_profile(),
        Condition::Preeclampsia => PreeclampsiaEvaluator::standard_profile(),
        Condition::MentalHealth => MentalHealthEvaluator::standard_profile(),
    }
}

/// Build the evaluator for `condition` around the given profile. Anaemia has
/// two rule sets; the profile's strategy picks between them.
pub fn evaluator_with_profile(condition: Condition, profile: ScoringProfile) -> Arc<dyn Evaluator> {
    match condition {
        Condition::Anaemia => match profile.strategy {
            ScoringStrategy::CappedSum { .. } => Arc::new(AnaemiaEvaluator::with_profile(profile)),
            ScoringStrategy::WeightedNormalized => {
                Arc::new(AnaemiaTrackerEvaluator::with_profile(profile))
            }
        },
        Condition::Thyroid => Arc::new(ThyroidEvaluator::with_profile(profile)),
        Condition::Miscarriage => Arc::new(MiscarriageEvaluator::with_profile(profile)),
        Condition::Uti => Arc::new(UtiEvaluator::with_profile(profile)),
        Condition::Gdm => Arc::new(GdmEvaluator::with_profile(profile)),
        Condition::Preeclampsia => Arc::new(PreeclampsiaEvaluator::with_profile(profile)),
        Condition::MentalHealth => Arc::new(MentalHealthEvaluator::with_profile(profile)),
    }
}

pub fn standard_evaluator(condition: Condition) -> Arc<dyn Evaluator> {
    evaluator_with_profile(condition, standard_profile(condition))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::domain::{EvaluationInput, RiskTier};

    #[test]
    fn weighted_anaemia_profile_builds_the_tracker_rule_set() {
        let evaluator = evaluator_with_profile(Condition::Anaemia, AnaemiaModel::Tracker.profile());
        let input = EvaluationInput::new()
            .with_flag("cravings", true)
            .with_ordinal("iron_diet", 1)
            .with_measure("heart_rate", 110.0)
            .with_flag("pale_skin", true);

        let result = evaluator.evaluate(&input).expect("tracker keys are known");

        assert_eq!(result.probability, 57);
        assert_eq!(result.risk_tier, RiskTier::Moderate);
    }

    #[test]
    fn anaemia_model_names_round_trip() {
        for model in [AnaemiaModel::Screening, AnaemiaModel::Tracker] {
            assert_eq!(model.name().parse::<AnaemiaModel>(), Ok(model));
        }
        assert_eq!("Daily".parse::<AnaemiaModel>(), Ok(AnaemiaModel::Tracker));
        assert!("weighted".parse::<AnaemiaModel>().is_err());
        assert_eq!(
            standard_profile(Condition::Anaemia),
            AnaemiaModel::default().profile()
        );
    }
}
