use crate::cli::ServeArgs;
use crate::infra::{in_memory_journal, AppState};
use crate::routes::with_care_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use postpartum_care::config::AppConfig;
use postpartum_care::error::AppError;
use postpartum_care::screening::ScreeningEngine;
use postpartum_care::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = Arc::new(ScreeningEngine::new(&config.scoring));
    let journal = in_memory_journal(engine.clone());

    let app = with_care_routes(engine, journal)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "postpartum care service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
