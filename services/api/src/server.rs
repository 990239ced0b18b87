use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState, InMemoryAssessmentRepository, InMemoryGoalRepository};
use crate::routes::with_dignometro_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use decolagem::config::AppConfig;
use decolagem::dignometro::{DignometroService, RecommendationPolicy};
use decolagem::error::AppError;
use decolagem::telemetry;
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

    let catalog = load_catalog(&config.dignometro);
    info!(
        source = ?catalog.source,
        templates = catalog.catalog.len(),
        "goal catalog resolved"
    );

    let service = Arc::new(DignometroService::new(
        Arc::new(InMemoryAssessmentRepository::default()),
        Arc::new(InMemoryGoalRepository::default()),
        catalog,
        RecommendationPolicy::from(&config.dignometro),
    ));

    let app = with_dignometro_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "dignometro service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
