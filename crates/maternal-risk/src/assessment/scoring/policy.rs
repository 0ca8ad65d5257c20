use super::super::domain::RiskTier;
use super::config::{ScoringStrategy, TierThresholds};

/// Convert an accumulated score into a 0-100 probability.
///
/// The normalized family rounds half to even and clamps, since a scaled rule
/// (TSH) or a rule applied twice (glucose) can push the score past the table total.
pub(crate) fn probability(score: f64, total_weight: f64, strategy: ScoringStrategy) -> u8 {
    let raw = match strategy {
        ScoringStrategy::CappedSum { cap } => score.min(cap),
        ScoringStrategy::WeightedNormalized => {
            if total_weight <= 0.0 {
                return 0;
            }
            (score / total_weight * 100.0).round_ties_even()
        }
    };

    raw.round().clamp(0.0, 100.0) as u8
}

pub(crate) fn classify(probability: u8, thresholds: TierThresholds) -> RiskTier {
    let value = f64::from(probability);
    if value >= thresholds.high {
        RiskTier::High
    } else if value >= thresholds.moderate {
        RiskTier::Moderate
    } else {
        RiskTier::Low
    }
}
