use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{AssessmentSubmission, ReportId};
use super::repository::{ReportExporter, ReportRepository, RepositoryError};
use super::service::{AssessmentService, AssessmentServiceError};
use super::views::AssessmentView;

/// Router builder exposing HTTP endpoints for submission and retrieval.
pub fn assessment_router<R, E>(service: Arc<AssessmentService<R, E>>) -> Router
where
    R: ReportRepository + 'static,
    E: ReportExporter + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(submit_handler::<R, E>))
        .route(
            "/api/v1/assessments/:report_id",
            get(report_handler::<R, E>),
        )
        .route(
            "/api/v1/users/:user_id/assessments",
            get(history_handler::<R, E>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R, E>(
    State(service): State<Arc<AssessmentService<R, E>>>,
    axum::Json(submission): axum::Json<AssessmentSubmission>,
) -> Response
where
    R: ReportRepository + 'static,
    E: ReportExporter + 'static,
{
    match service.submit(submission) {
        Ok(record) => (StatusCode::ACCEPTED, axum::Json(record.view())).into_response(),
        Err(
            error @ (AssessmentServiceError::Normalization(_)
            | AssessmentServiceError::Evaluation(_)),
        ) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(AssessmentServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "report already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn report_handler<R, E>(
    State(service): State<Arc<AssessmentService<R, E>>>,
    Path(report_id): Path<String>,
) -> Response
where
    R: ReportRepository + 'static,
    E: ReportExporter + 'static,
{
    let id = ReportId(report_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(AssessmentServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "report_id": id.0,
                "error": "report not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn history_handler<R, E>(
    State(service): State<Arc<AssessmentService<R, E>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ReportRepository + 'static,
    E: ReportExporter + 'static,
{
    match service.history(&user_id) {
        Ok(records) => {
            let views: Vec<AssessmentView> = records.iter().map(|record| record.view()).collect();
            let payload = json!({
                "user_id": user_id,
                "assessments": views,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

fn internal_error(error: AssessmentServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
