use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use maternal_risk::assessment::{
    assessment_router, AssessmentService, Condition, EvaluatorRegistry, ReportExporter,
    ReportRepository, ScoringProfile,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Catalogue entry describing how one condition is scored.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ConditionCatalogEntry {
    pub(crate) condition: Condition,
    pub(crate) label: &'static str,
    pub(crate) total_weight: f64,
    pub(crate) profile: ScoringProfile,
}

pub(crate) fn with_assessment_routes<R, E>(service: Arc<AssessmentService<R, E>>) -> axum::Router
where
    R: ReportRepository + 'static,
    E: ReportExporter + 'static,
{
    let catalog = Arc::new(condition_catalog(service.registry()));
    assessment_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/conditions",
            axum::routing::get(move || conditions_endpoint(catalog.clone())),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Weight tables, strategies and tier thresholds of the evaluators the service runs.
pub(crate) fn condition_catalog(registry: &EvaluatorRegistry) -> Vec<ConditionCatalogEntry> {
    Condition::ALL
        .into_iter()
        .filter_map(|condition| {
            let profile = registry.get(condition)?.profile().clone();
            Some(ConditionCatalogEntry {
                condition,
                label: condition.label(),
                total_weight: profile.table.total(),
                profile,
            })
        })
        .collect()
}

pub(crate) async fn conditions_endpoint(
    catalog: Arc<Vec<ConditionCatalogEntry>>,
) -> Json<Vec<ConditionCatalogEntry>> {
    Json(catalog.as_ref().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryReportRepository, LogExporter};
    use maternal_risk::assessment::{AnaemiaModel, ScoringStrategy};
    use maternal_risk::config::AssessmentConfig;
    use tower::ServiceExt;

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn conditions_endpoint_lists_every_profile() {
        let catalog = Arc::new(condition_catalog(&EvaluatorRegistry::standard()));
        let Json(catalog) = conditions_endpoint(catalog).await;

        assert_eq!(catalog.len(), Condition::ALL.len());
        let uti = catalog
            .iter()
            .find(|entry| entry.condition == Condition::Uti)
            .expect("uti listed");
        assert!((uti.total_weight - 14.0).abs() < f64::EPSILON);
        assert_eq!(uti.label, "Urinary Tract Infection");
    }

    #[test]
    fn catalog_follows_the_configured_anaemia_model() {
        let catalog = condition_catalog(&EvaluatorRegistry::with_anaemia_model(
            AnaemiaModel::Tracker,
        ));

        let anaemia = catalog
            .iter()
            .find(|entry| entry.condition == Condition::Anaemia)
            .expect("anaemia listed");
        assert_eq!(anaemia.profile.strategy, ScoringStrategy::WeightedNormalized);
        assert!((anaemia.total_weight - 10.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn assessment_routes_are_mounted_beside_health() {
        let service = Arc::new(AssessmentService::new(
            Arc::new(InMemoryReportRepository::default()),
            Arc::new(LogExporter),
            &AssessmentConfig::default(),
        ));
        let router = with_assessment_routes(service);

        let response = router
            .clone()
            .oneshot(
                axum::http::Request::get("/health")
                    .body(axum::body::Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(
                axum::http::Request::get("/api/v1/assessments/rpt-424242")
                    .body(axum::body::Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
