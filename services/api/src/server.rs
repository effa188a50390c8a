use crate::cli::ServeArgs;
use crate::infra::{build_site_service, AppState};
use crate::routes::with_site_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use site_analyzer::config::AppConfig;
use site_analyzer::error::AppError;
use site_analyzer::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
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

    let site_service = Arc::new(build_site_service(&config.providers)?);

    let app = with_site_routes(site_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer)
        .layer(CorsLayer::permissive());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        region = config.providers.geocoder.region_qualifier.as_deref().unwrap_or("none"),
        "site analyzer ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
