use crate::cli::ServeArgs;
use crate::infra::{AppState, LendingServices};
use crate::routes::with_lending_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use prestabanco::config::AppConfig;
use prestabanco::error::AppError;
use prestabanco::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let services = LendingServices::in_memory(&config.lending);
    info!(
        transitions = ?config.lending.lifecycle.transitions,
        single_active_per_type = config.lending.lifecycle.single_active_per_type,
        requirements = ?config.lending.requirements_source,
        "lending services configured"
    );

    let app = with_lending_routes(services.documents, services.applications)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "loan document service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
