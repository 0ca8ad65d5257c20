use super::super::domain::{Condition, Contribution, EvaluationResult, RiskTier};
use super::config::ScoringProfile;
use super::policy::{classify, probability};
use super::EvaluationError;

/// Running tally for a single evaluation. Every awarded factor appends a
/// reason and a contribution in lock step.
pub(crate) struct ScoreCard<'a> {
    profile: &'a ScoringProfile,
    score: f64,
    reasons: Vec<String>,
    advice: Vec<String>,
    contributions: Vec<Contribution>,
    finding: Option<String>,
}

impl<'a> ScoreCard<'a> {
    pub(crate) fn new(profile: &'a ScoringProfile) -> Self {
        Self {
            profile,
            score: 0.0,
            reasons: Vec::new(),
            advice: Vec::new(),
            contributions: Vec::new(),
            finding: None,
        }
    }

    /// Award the factor's full table weight.
    pub(crate) fn award(
        &mut self,
        key: &str,
        reason: impl Into<String>,
        advice: Option<&str>,
    ) -> Result<(), EvaluationError> {
        self.award_with_label(key, None, 1.0, reason, advice)
    }

    /// Award the factor's weight multiplied by `factor`, under the given label.
    pub(crate) fn award_scaled(
        &mut self,
        key: &str,
        label: &str,
        factor: f64,
        reason: impl Into<String>,
        advice: Option<&str>,
    ) -> Result<(), EvaluationError> {
        self.award_with_label(key, Some(label), factor, reason, advice)
    }

    /// Award the full weight under a label other than the table's default.
    pub(crate) fn award_labeled(
        &mut self,
        key: &str,
        label: &str,
        reason: impl Into<String>,
        advice: Option<&str>,
    ) -> Result<(), EvaluationError> {
        self.award_with_label(key, Some(label), 1.0, reason, advice)
    }

    fn award_with_label(
        &mut self,
        key: &str,
        label: Option<&str>,
        factor: f64,
        reason: impl Into<String>,
        advice: Option<&str>,
    ) -> Result<(), EvaluationError> {
        let entry = self.profile.table.entry(key)?;
        let weight = entry.weight * factor;

        self.score += weight;
        self.reasons.push(reason.into());
        if let Some(advice) = advice {
            self.advice.push(advice.to_string());
        }
        self.contributions.push(Contribution {
            key: entry.key.to_string(),
            weight,
            label: label.unwrap_or(entry.label).to_string(),
            color: entry.color.to_string(),
        });
        Ok(())
    }

    pub(crate) fn advise(&mut self, advice: impl Into<String>) {
        self.advice.push(advice.into());
    }

    pub(crate) fn note_finding(&mut self, finding: impl Into<String>) {
        self.finding = Some(finding.into());
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }

    /// Current probability and tier, for evaluators that tailor advice to the tier.
    pub(crate) fn standing(&self) -> (u8, RiskTier) {
        if self.contributions.is_empty() {
            return (0, RiskTier::Low);
        }
        let probability = probability(
            self.score,
            self.profile.table.total(),
            self.profile.strategy,
        );
        (probability, classify(probability, self.profile.thresholds))
    }

    pub(crate) fn finish(self, condition: Condition) -> EvaluationResult {
        let (probability, risk_tier) = self.standing();
        EvaluationResult {
            condition,
            risk_tier,
            probability,
            reasons: self.reasons,
            advice: self.advice,
            contributions: self.contributions,
            finding: self.finding,
        }
    }

    /// Close out an evaluation in which nothing fired.
    pub(crate) fn finish_quiet(
        self,
        condition: Condition,
        reasons: &[&str],
        advice: &[&str],
    ) -> EvaluationResult {
        debug_assert!(self.contributions.is_empty());
        EvaluationResult {
            condition,
            risk_tier: RiskTier::Low,
            probability: 0,
            reasons: reasons.iter().map(|reason| reason.to_string()).collect(),
            advice: advice.iter().map(|line| line.to_string()).collect(),
            contributions: Vec::new(),
            finding: self.finding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::config::{ScoringStrategy, SymptomWeight, TierThresholds, WeightTable};
    use super::*;

    fn profile() -> ScoringProfile {
        ScoringProfile::new(
            WeightTable::new(&[
                SymptomWeight::new("tsh", 3.0, "High TSH", "#8B0000"),
                SymptomWeight::new("fatigue", 2.0, "Fatigue", "#B22222"),
                SymptomWeight::new("bmi", 1.0, "High BMI", "#D2B48C"),
            ]),
            ScoringStrategy::WeightedNormalized,
            TierThresholds::SCREENING,
        )
    }

    #[test]
    fn awards_keep_reasons_and_contributions_parallel() {
        let profile = profile();
        let mut card = ScoreCard::new(&profile);
        card.award("fatigue", "Fatigue", Some("rest")).expect("known");
        card.award_scaled("tsh", "High TSH", 0.5, "TSH", None).expect("known");

        let result = card.finish(Condition::Thyroid);

        assert_eq!(result.reasons.len(), result.contributions.len());
        assert_eq!(result.contributions[0].key, "fatigue");
        assert_eq!(result.contributions[1].weight, 1.5);
        assert_eq!(result.advice, vec!["rest".to_string()]);
        // 3.5 / 6.0
        assert_eq!(result.probability, 58);
        assert_eq!(result.risk_tier, RiskTier::Moderate);
    }

    #[test]
    fn unknown_factor_is_reported() {
        let profile = profile();
        let mut card = ScoreCard::new(&profile);
        let error = card
            .award("sneezing", "Sneezing", None)
            .expect_err("unknown factor");
        assert!(matches!(error, EvaluationError::UnknownFactor { .. }));
        assert!(card.is_empty());
    }

    #[test]
    fn empty_card_is_low_with_zero_probability() {
        let profile = profile();
        let card = ScoreCard::new(&profile);
        let result = card.finish_quiet(Condition::Thyroid, &["nothing"], &["keep tracking"]);
        assert_eq!(result.probability, 0);
        assert_eq!(result.risk_tier, RiskTier::Low);
        assert!(result.contributions.is_empty());
    }
}
