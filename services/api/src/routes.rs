use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json};
use decolagem::dignometro::{
    dignometro_router, AssessmentRepository, DignometroService, GoalAssignmentRepository,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_dignometro_routes<A, G>(service: Arc<DignometroService<A, G>>) -> axum::Router
where
    A: AssessmentRepository + 'static,
    G: GoalAssignmentRepository + 'static,
{
    // The catalog is resolved once at startup, so the listing never changes.
    let catalog = json!({
        "source": service.catalog_source(),
        "templates": service.catalog().templates().collect::<Vec<_>>(),
    });

    dignometro_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/dignometro/catalog",
            get(move || {
                let catalog = catalog.clone();
                async move { Json(catalog) }
            }),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    if ready {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "initializing" })),
        )
    }
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
