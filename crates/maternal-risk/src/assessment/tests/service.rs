use std::collections::BTreeMap;
use std::sync::Arc;

use super::common::*;
use crate::assessment::domain::{AssessmentSubmission, Condition, ReportId, RiskTier};
use crate::assessment::normalizer::{NormalizationError, RawAssessmentRequest};
use crate::assessment::repository::{ExportError, ReportRepository, RepositoryError};
use crate::assessment::scoring::EvaluationError;
use crate::assessment::{AnaemiaModel, AssessmentService, AssessmentServiceError};
use crate::config::AssessmentConfig;

#[test]
fn submit_scores_default_conditions_and_stores_the_report() {
    let (service, repository, exporter) = build_service();

    let record = service.submit(submission()).expect("submission succeeds");

    assert!(record.report_id.0.starts_with("rpt-"));
    let order: Vec<_> = record.report.conditions().collect();
    assert_eq!(order, vec![Condition::Uti, Condition::Anaemia]);

    // 4.5 / 14.0
    let uti = record.report.get(Condition::Uti).expect("uti scored");
    assert_eq!(uti.probability, 32);
    assert_eq!(uti.risk_tier, RiskTier::Low);

    // third trimester 15 + fatigue 20 + pale skin 22
    let anaemia = record.report.get(Condition::Anaemia).expect("anaemia scored");
    assert_eq!(anaemia.probability, 57);
    assert_eq!(anaemia.risk_tier, RiskTier::Moderate);

    let stored = repository
        .fetch(&record.report_id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.report, record.report);
    assert!(
        exporter.exported().is_empty(),
        "reports without a profile are not exported"
    );
}

#[test]
fn submit_honours_requested_conditions() {
    let (service, _, _) = build_service();
    let mut request = submission();
    request.conditions = vec![Condition::Gdm, Condition::Gdm, Condition::Thyroid];

    let record = service.submit(request).expect("submission succeeds");

    let order: Vec<_> = record.report.conditions().collect();
    assert_eq!(order, vec![Condition::Gdm, Condition::Thyroid]);
}

#[test]
fn submit_exports_profiled_reports() {
    let (service, _, exporter) = build_service();

    let record = service
        .submit(profiled_submission())
        .expect("submission succeeds");

    assert_eq!(exporter.exported(), vec![record.report_id]);
}

#[test]
fn submit_propagates_normalization_errors() {
    let (service, repository, _) = build_service();

    match service.submit(invalid_submission()) {
        Err(AssessmentServiceError::Normalization(NormalizationError::InvalidCategory {
            field,
            ..
        })) => assert_eq!(field, "trimester"),
        other => panic!("expected normalization error, got {other:?}"),
    }
    assert!(repository.records.lock().expect("lock").is_empty());
}

#[test]
fn weight_overrides_apply_to_one_request_only() {
    let (service, _, _) = build_service();
    let mut request = submission();
    let mut weights = BTreeMap::new();
    weights.insert("frequent_urination".to_string(), 9.5);
    request.weight_overrides.insert(Condition::Uti, weights);

    let overridden = service.submit(request).expect("override accepted");
    // (9.5 + 2.5) / 21.5
    let uti = overridden.report.get(Condition::Uti).expect("uti scored");
    assert_eq!(uti.probability, 56);
    assert_eq!(uti.risk_tier, RiskTier::Moderate);

    let plain = service.submit(submission()).expect("submission succeeds");
    assert_eq!(
        plain.report.get(Condition::Uti).expect("uti scored").probability,
        32
    );
}

#[test]
fn unknown_override_key_is_rejected() {
    let (service, _, _) = build_service();
    let mut request = submission();
    let mut weights = BTreeMap::new();
    weights.insert("sneezing".to_string(), 1.0);
    request.weight_overrides.insert(Condition::Uti, weights);

    match service.submit(request) {
        Err(AssessmentServiceError::Evaluation(EvaluationError::UnknownFactor { key })) => {
            assert_eq!(key, "sneezing")
        }
        other => panic!("expected unknown factor error, got {other:?}"),
    }
}

#[test]
fn get_propagates_not_found() {
    let (service, _, _) = build_service();

    match service.get(&ReportId("missing".to_string())) {
        Err(AssessmentServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found error, got {other:?}"),
    }
}

#[test]
fn history_lists_a_users_reports_oldest_first() {
    let (service, _, _) = build_service();

    let first = service.submit(submission()).expect("first succeeds");
    let mut other_user = submission();
    other_user.user_id = Some("mother-8".to_string());
    service.submit(other_user).expect("other user succeeds");
    let second = service.submit(submission()).expect("second succeeds");

    let history = service.history("mother-7").expect("history loads");
    let ids: Vec<_> = history.into_iter().map(|record| record.report_id).collect();
    assert_eq!(ids, vec![first.report_id, second.report_id]);
}

#[test]
fn failed_export_leaves_nothing_stored() {
    let repository = Arc::new(MemoryRepository::default());
    let service = AssessmentService::new(
        repository.clone(),
        Arc::new(OfflineExporter),
        &assessment_config(),
    );

    for _ in 0..2 {
        match service.submit(profiled_submission()) {
            Err(AssessmentServiceError::Export(ExportError::Transport(reason))) => {
                assert!(reason.contains("offline"))
            }
            other => panic!("expected export error, got {other:?}"),
        }
    }

    assert!(repository
        .records
        .lock()
        .expect("repository mutex poisoned")
        .is_empty());
    assert!(service.history("mother-7").expect("history loads").is_empty());
}

#[test]
fn repository_failures_surface_to_the_caller() {
    let service = AssessmentService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryExporter::default()),
        &assessment_config(),
    );

    match service.submit(submission()) {
        Err(AssessmentServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected unavailable error, got {other:?}"),
    }
}

#[test]
fn tracker_model_scores_anaemia_from_daily_answers() {
    let config = AssessmentConfig {
        anaemia_model: AnaemiaModel::Tracker,
        ..assessment_config()
    };
    let service = AssessmentService::new(
        Arc::new(MemoryRepository::default()),
        Arc::new(MemoryExporter::default()),
        &config,
    );
    let daily = AssessmentSubmission {
        conditions: vec![Condition::Anaemia],
        answers: RawAssessmentRequest::new()
            .with("cravings", "Yes")
            .with("iron_diet", 1)
            .with("heart_rate", 110)
            .with("pale_skin", "Yes"),
        ..submission()
    };

    // (1.0 + 1.5 + 2.0 + 1.5) / 10.5
    let report = service.score(&daily).expect("scores");
    let anaemia = report.get(Condition::Anaemia).expect("anaemia scored");
    assert_eq!(anaemia.probability, 57);
    assert_eq!(anaemia.risk_tier, RiskTier::Moderate);

    // Overrides keep the tracker rule set: 5.0 / 9.5
    let mut weights = BTreeMap::new();
    weights.insert("cravings".to_string(), 0.0);
    let overridden = AssessmentSubmission {
        weight_overrides: [(Condition::Anaemia, weights)].into_iter().collect(),
        ..daily
    };
    let report = service.score(&overridden).expect("override applies");
    assert_eq!(
        report.get(Condition::Anaemia).expect("anaemia scored").probability,
        53
    );
}
