use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use super::assignment::GoalAssignmentId;
use super::repository::{AssessmentRepository, GoalAssignmentRepository};
use super::service::{AcceptRecommendation, DignometroService, DignometroServiceError};

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) answers: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssessmentRequest {
    pub(crate) answers: Value,
    #[serde(default)]
    pub(crate) submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecommendationQuery {
    #[serde(default)]
    pub(crate) cap: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressRequest {
    pub(crate) progress: u8,
}

/// Router exposing scoring, assessment intake, recommendations, and goals.
pub fn dignometro_router<A, G>(service: Arc<DignometroService<A, G>>) -> Router
where
    A: AssessmentRepository + 'static,
    G: GoalAssignmentRepository + 'static,
{
    Router::new()
        .route("/api/v1/dignometro/score", post(score_handler::<A, G>))
        .route(
            "/api/v1/families/:family_id/assessments",
            post(submit_assessment_handler::<A, G>),
        )
        .route(
            "/api/v1/families/:family_id/recommendations",
            get(recommendations_handler::<A, G>),
        )
        .route(
            "/api/v1/families/:family_id/goals",
            post(accept_handler::<A, G>).get(goals_handler::<A, G>),
        )
        .route(
            "/api/v1/families/:family_id/goals/:goal_id",
            patch(progress_handler::<A, G>),
        )
        .route(
            "/api/v1/families/:family_id/score-history",
            get(score_history_handler::<A, G>),
        )
        .with_state(service)
}

pub(crate) async fn score_handler<A, G>(
    State(service): State<Arc<DignometroService<A, G>>>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response
where
    A: AssessmentRepository + 'static,
    G: GoalAssignmentRepository + 'static,
{
    match service.score_answers(&request.answers) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_assessment_handler<A, G>(
    State(service): State<Arc<DignometroService<A, G>>>,
    Path(family_id): Path<String>,
    axum::Json(request): axum::Json<AssessmentRequest>,
) -> Response
where
    A: AssessmentRepository + 'static,
    G: GoalAssignmentRepository + 'static,
{
    let submitted_at = request.submitted_at.unwrap_or_else(Utc::now);
    match service.submit_assessment(&family_id, &request.answers, submitted_at) {
        Ok(outcome) => (StatusCode::CREATED, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn recommendations_handler<A, G>(
    State(service): State<Arc<DignometroService<A, G>>>,
    Path(family_id): Path<String>,
    Query(query): Query<RecommendationQuery>,
) -> Response
where
    A: AssessmentRepository + 'static,
    G: GoalAssignmentRepository + 'static,
{
    match service.current_recommendations(&family_id, query.cap) {
        Ok(recommendations) => (StatusCode::OK, axum::Json(recommendations)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn accept_handler<A, G>(
    State(service): State<Arc<DignometroService<A, G>>>,
    Path(family_id): Path<String>,
    axum::Json(request): axum::Json<AcceptRecommendation>,
) -> Response
where
    A: AssessmentRepository + 'static,
    G: GoalAssignmentRepository + 'static,
{
    match service.accept_recommendation(&family_id, request) {
        Ok(assignment) => (StatusCode::CREATED, axum::Json(assignment)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn goals_handler<A, G>(
    State(service): State<Arc<DignometroService<A, G>>>,
    Path(family_id): Path<String>,
) -> Response
where
    A: AssessmentRepository + 'static,
    G: GoalAssignmentRepository + 'static,
{
    match service.goal_assignments(&family_id) {
        Ok(goals) => (StatusCode::OK, axum::Json(goals)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn progress_handler<A, G>(
    State(service): State<Arc<DignometroService<A, G>>>,
    Path((family_id, goal_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<ProgressRequest>,
) -> Response
where
    A: AssessmentRepository + 'static,
    G: GoalAssignmentRepository + 'static,
{
    let goal_id = GoalAssignmentId(goal_id);
    match service.update_goal_progress(&family_id, &goal_id, request.progress) {
        Ok(assignment) => (StatusCode::OK, axum::Json(assignment)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn score_history_handler<A, G>(
    State(service): State<Arc<DignometroService<A, G>>>,
    Path(family_id): Path<String>,
) -> Response
where
    A: AssessmentRepository + 'static,
    G: GoalAssignmentRepository + 'static,
{
    match service.score_history(&family_id) {
        Ok(history) => (StatusCode::OK, axum::Json(history)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn status_for(error: &DignometroServiceError) -> StatusCode {
    match error {
        DignometroServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DignometroServiceError::NoAssessment(_)
        | DignometroServiceError::UnknownTemplate(_)
        | DignometroServiceError::GoalNotFound(_) => StatusCode::NOT_FOUND,
        DignometroServiceError::AlreadyAssigned(_) | DignometroServiceError::Lifecycle(_) => {
            StatusCode::CONFLICT
        }
        DignometroServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: DignometroServiceError) -> Response {
    let status = status_for(&error);
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
