use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{AggregateReport, Condition, Contribution, EvaluationResult, ReportId};
use super::repository::AssessmentRecord;

/// Shown in place of a score when a condition could not be evaluated.
pub const UNAVAILABLE_SUMMARY: &str = "assessment unavailable for this condition";

#[derive(Debug, Clone, Serialize)]
pub struct ConditionView {
    pub condition: Condition,
    pub condition_label: &'static str,
    pub risk_tier: &'static str,
    /// `None` for degraded conditions so a failure never reads as 0%.
    pub probability: Option<u8>,
    pub summary: String,
    pub reasons: Vec<String>,
    pub advice: Vec<String>,
    pub contributions: Vec<Contribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finding: Option<String>,
}

impl ConditionView {
    pub fn from_result(result: &EvaluationResult) -> Self {
        let (probability, summary) = if result.is_degraded() {
            (None, UNAVAILABLE_SUMMARY.to_string())
        } else {
            (
                Some(result.probability),
                format!("{} risk ({}%)", result.risk_tier.label(), result.probability),
            )
        };

        Self {
            condition: result.condition,
            condition_label: result.condition.label(),
            risk_tier: result.risk_tier.label(),
            probability,
            summary,
            reasons: result.reasons.clone(),
            advice: result.advice.clone(),
            contributions: result.contributions.clone(),
            finding: result.finding.clone(),
        }
    }
}

/// API-facing projection of a stored assessment.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentView {
    pub report_id: ReportId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub conditions: Vec<ConditionView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unavailable: Vec<Condition>,
}

impl AssessmentView {
    pub fn from_record(record: &AssessmentRecord) -> Self {
        Self {
            report_id: record.report_id.clone(),
            user_id: record.user_id.clone(),
            generated_at: record.report.generated_at,
            conditions: record
                .report
                .results
                .iter()
                .map(ConditionView::from_result)
                .collect(),
            unavailable: record
                .report
                .degraded()
                .map(|result| result.condition)
                .collect(),
        }
    }
}

/// Plain-text rendering used by the CLI.
pub fn render_report(report: &AggregateReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Assessment generated {}",
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    );

    for result in &report.results {
        let view = ConditionView::from_result(result);
        let _ = writeln!(out, "\n{}: {}", view.condition_label, view.summary);
        if let Some(finding) = &view.finding {
            let _ = writeln!(out, "  Finding: {finding}");
        }
        for reason in &view.reasons {
            let _ = writeln!(out, "  - {reason}");
        }
        if !view.advice.is_empty() {
            let _ = writeln!(out, "  Advice:");
            for line in &view.advice {
                let _ = writeln!(out, "    * {line}");
            }
        }
    }

    out
}
