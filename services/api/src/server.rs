use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryReportRepository, LogExporter};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use maternal_risk::assessment::AssessmentService;
use maternal_risk::config::AppConfig;
use maternal_risk::error::AppError;
use maternal_risk::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryReportRepository::default());
    let exporter = Arc::new(LogExporter);
    let assessment_service = Arc::new(AssessmentService::new(
        repository,
        exporter,
        &config.assessment,
    ));

    let app = with_assessment_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        default_conditions = config.assessment.default_conditions.len(),
        "maternal risk service ready"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(readiness_flag))
        .await?;
    info!("maternal risk service stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM. Readiness drops first so load balancers stop
/// routing new check-ins while in-flight requests drain.
async fn shutdown_signal(readiness: Arc<AtomicBool>) {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "unable to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                warn!(%error, "unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, draining requests"),
        _ = terminate => info!("received SIGTERM, draining requests"),
    }
    readiness.store(false, Ordering::Release);
}
