use crate::infra::{InMemoryReportRepository, LogExporter};
use chrono::Local;
use clap::Args;
use maternal_risk::assessment::{
    render_report, Aggregator, AssessmentService, AssessmentSubmission, AssessmentView,
    BatchAssessment, BatchImporter, Condition, EvaluatorRegistry, InputNormalizer,
    RawAssessmentRequest, RiskTier, UserProfile,
};
use maternal_risk::config::{AppConfig, AssessmentConfig};
use maternal_risk::error::AppError;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// JSON file holding a flat answer sheet (field name to value)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Comma separated conditions to score (defaults to APP_DEFAULT_CONDITIONS)
    #[arg(long, value_delimiter = ',')]
    pub(crate) conditions: Vec<Condition>,
    /// Print the aggregate report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// Symptom tracker CSV export; column names follow the answer sheet fields
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Comma separated conditions to score (defaults to APP_DEFAULT_CONDITIONS)
    #[arg(long, value_delimiter = ',')]
    pub(crate) conditions: Vec<Condition>,
    /// Only print the summary table
    #[arg(long)]
    pub(crate) summary_only: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Comma separated conditions to score (defaults to APP_DEFAULT_CONDITIONS)
    #[arg(long, value_delimiter = ',')]
    pub(crate) conditions: Vec<Condition>,
}

type DemoService = AssessmentService<InMemoryReportRepository, LogExporter>;

fn in_memory_service(config: &AssessmentConfig) -> DemoService {
    AssessmentService::new(
        Arc::new(InMemoryReportRepository::default()),
        Arc::new(LogExporter),
        config,
    )
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        input,
        conditions,
        json,
    } = args;

    let config = AppConfig::load()?;
    let raw = std::fs::read_to_string(&input)?;
    let answers: RawAssessmentRequest = serde_json::from_str(&raw)?;

    let service = in_memory_service(&config.assessment);
    let report = service.score(&AssessmentSubmission {
        conditions,
        answers,
        ..AssessmentSubmission::default()
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let BatchArgs {
        csv,
        conditions,
        summary_only,
    } = args;

    let config = AppConfig::load()?;
    let aggregator = Aggregator::new(EvaluatorRegistry::with_anaemia_model(
        config.assessment.anaemia_model,
    ));
    let conditions = if conditions.is_empty() {
        config.assessment.default_conditions
    } else {
        conditions
    };

    let records = BatchImporter::from_path(&csv)?;
    let assessed = BatchImporter::assess(
        records,
        &InputNormalizer::new(),
        &aggregator,
        &conditions,
    )?;

    if !summary_only {
        for row in &assessed {
            println!(
                "=== Row {} ({}) ===",
                row.row,
                row.subject.as_deref().unwrap_or("unnamed")
            );
            print!("{}", render_report(&row.report));
            println!();
        }
    }

    render_batch_summary(&assessed, &conditions);
    Ok(())
}

fn render_batch_summary(assessed: &[BatchAssessment], conditions: &[Condition]) {
    let mut tally: BTreeMap<Condition, [usize; 4]> = BTreeMap::new();
    for row in assessed {
        for result in &row.report.results {
            let slot = match result.risk_tier {
                RiskTier::Low => 0,
                RiskTier::Moderate => 1,
                RiskTier::High => 2,
                RiskTier::Error => 3,
            };
            tally.entry(result.condition).or_default()[slot] += 1;
        }
    }

    println!("Batch summary ({} rows)", assessed.len());
    println!(
        "  {:<26} {:>5} {:>9} {:>5} {:>12}",
        "Condition", "Low", "Moderate", "High", "Unavailable"
    );
    for condition in conditions {
        let [low, moderate, high, unavailable] = tally.get(condition).copied().unwrap_or_default();
        println!(
            "  {:<26} {:>5} {:>9} {:>5} {:>12}",
            condition.label(),
            low,
            moderate,
            high,
            unavailable
        );
    }
}

/// Synthetic check-ins covering a quiet day, a urinary complaint and a
/// hypertensive third-trimester visit.
fn demo_submissions(conditions: &[Condition]) -> Vec<AssessmentSubmission> {
    let checkin = |user: &str, name: &str, answers: serde_json::Value| {
        let answers = match answers {
            serde_json::Value::Object(fields) => RawAssessmentRequest::from(fields),
            _ => RawAssessmentRequest::new(),
        };
        AssessmentSubmission {
            user_id: Some(user.to_string()),
            profile: Some(UserProfile {
                name: name.to_string(),
                age: None,
                email: None,
            }),
            conditions: conditions.to_vec(),
            answers,
            weight_overrides: Default::default(),
        }
    };

    vec![
        checkin(
            "demo-asha",
            "Asha",
            json!({ "Age": 27, "Trimester": "First", "Mood": "4 - Good" }),
        ),
        checkin(
            "demo-meera",
            "Meera",
            json!({
                "Age": 31,
                "Trimester": "Second",
                "symptoms": ["Frequent urination", "Burning sensation", "Fever"],
                "history_of_uti": "Yes"
            }),
        ),
        checkin(
            "demo-asha",
            "Asha",
            json!({
                "Age": 27,
                "Trimester": "Third",
                "bp": 148,
                "Headache": "4 - Severe",
                "Swelling": "Yes",
                "symptoms": "Fatigue, Pale skin, Dizziness",
                "Urine_Output": "1 - Very low"
            }),
        ),
    ]
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = in_memory_service(&config.assessment);
    let today = Local::now().date_naive();

    println!("Maternal risk demo ({today})");
    for submission in demo_submissions(&args.conditions) {
        let record = service.submit(submission)?;
        let view = record.view();
        render_view(&view);
    }

    let history = service.history("demo-asha")?;
    println!("\nHistory for demo-asha: {} check-ins", history.len());
    for record in history {
        let highest = record
            .report
            .results
            .iter()
            .filter(|result| !result.is_degraded())
            .max_by_key(|result| result.probability);
        match highest {
            Some(result) => println!(
                "  {} -> highest {} at {}% ({})",
                record.report_id,
                result.condition.label(),
                result.probability,
                result.risk_tier
            ),
            None => println!("  {} -> no conditions scored", record.report_id),
        }
    }

    Ok(())
}

fn render_view(view: &AssessmentView) {
    println!(
        "\nReport {} for {}",
        view.report_id,
        view.user_id.as_deref().unwrap_or("anonymous")
    );
    for condition in &view.conditions {
        println!("  {:<26} {}", condition.condition_label, condition.summary);
        if let Some(reason) = condition.reasons.first() {
            println!("      {reason}");
        }
    }
}
