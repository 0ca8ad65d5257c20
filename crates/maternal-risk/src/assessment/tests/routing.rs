use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::assessment::domain::Condition;
use crate::assessment::router::{history_handler, report_handler, submit_handler};
use crate::assessment::views::UNAVAILABLE_SUMMARY;
use crate::assessment::{Aggregator, AssessmentService, EvaluatorRegistry};

#[tokio::test]
async fn submit_handler_returns_conflict_on_duplicate() {
    let service = Arc::new(AssessmentService::new(
        Arc::new(ConflictRepository),
        Arc::new(MemoryExporter::default()),
        &assessment_config(),
    ));

    let response = submit_handler::<ConflictRepository, MemoryExporter>(
        State(service),
        axum::Json(submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn submit_handler_returns_unprocessable_for_malformed_answers() {
    let (service, _, _) = build_service();

    let response = submit_handler::<MemoryRepository, MemoryExporter>(
        State(Arc::new(service)),
        axum::Json(invalid_submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("trimester"));
}

#[tokio::test]
async fn submit_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(AssessmentService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryExporter::default()),
        &assessment_config(),
    ));

    let response = submit_handler::<UnavailableRepository, MemoryExporter>(
        State(service),
        axum::Json(submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn submit_route_accepts_raw_answers() {
    let (service, _, _) = build_service();
    let router = assessment_router_with_service(service);

    let body = json!({
        "user_id": "mother-7",
        "conditions": ["uti", "anaemia"],
        "answers": {
            "Frequent_Urination": "Yes",
            "burning_sensation": 1,
            "trimester": "Third",
            "symptoms": ["Pale skin", "Fatigue"]
        }
    });

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/assessments")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let payload = read_json_body(response).await;
    assert!(payload["report_id"]
        .as_str()
        .unwrap_or_default()
        .starts_with("rpt-"));
    assert_eq!(payload["conditions"][0]["condition"], "uti");
    assert_eq!(payload["conditions"][0]["probability"], 32);
    assert_eq!(payload["conditions"][1]["risk_tier"], "Moderate");
    assert_eq!(payload["conditions"][1]["summary"], "Moderate risk (57%)");
}

#[tokio::test]
async fn report_handler_returns_stored_reports() {
    let (service, _, exporter) = build_service();
    let service = Arc::new(service);
    let record = service.submit(submission()).expect("submission succeeds");

    let response = report_handler::<MemoryRepository, MemoryExporter>(
        State(service.clone()),
        Path(record.report_id.0.clone()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["report_id"], record.report_id.0.as_str());
    assert_eq!(payload["user_id"], "mother-7");
    assert_eq!(payload["conditions"].as_array().map(Vec::len), Some(2));
    assert!(exporter.exported().is_empty());
}

#[tokio::test]
async fn report_handler_returns_not_found_for_unknown_ids() {
    let (service, _, _) = build_service();

    let response = report_handler::<MemoryRepository, MemoryExporter>(
        State(Arc::new(service)),
        Path("rpt-999999".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["report_id"], "rpt-999999");
}

#[tokio::test]
async fn history_handler_lists_user_reports() {
    let (service, _, _) = build_service();
    let service = Arc::new(service);
    service.submit(submission()).expect("first succeeds");
    service.submit(submission()).expect("second succeeds");

    let response = history_handler::<MemoryRepository, MemoryExporter>(
        State(service),
        Path("mother-7".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["assessments"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn degraded_conditions_render_without_a_probability() {
    let mut registry = EvaluatorRegistry::standard();
    registry.register(Arc::new(BrokenEvaluator::new(Condition::Anaemia)));
    let service = Arc::new(AssessmentService::with_aggregator(
        Arc::new(MemoryRepository::default()),
        Arc::new(MemoryExporter::default()),
        Aggregator::new(registry),
        &assessment_config(),
    ));

    let response = submit_handler::<MemoryRepository, MemoryExporter>(
        State(service),
        axum::Json(submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let payload = read_json_body(response).await;
    let anaemia = &payload["conditions"][1];
    assert_eq!(anaemia["risk_tier"], "Error");
    assert_eq!(anaemia["probability"], Value::Null);
    assert_eq!(anaemia["summary"], UNAVAILABLE_SUMMARY);
    assert_eq!(payload["unavailable"], json!(["anaemia"]));
}
