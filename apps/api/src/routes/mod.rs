pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assessment::handlers as assessment;
use crate::question_bank::handlers as question_bank;
use crate::readiness::handlers as readiness;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Question bank
        .route(
            "/api/v1/roles/:role_id/question-bank",
            post(question_bank::handle_build_question_bank),
        )
        .route(
            "/api/v1/roles/:role_id/question-bank/stats",
            get(question_bank::handle_question_bank_stats),
        )
        // Assessments
        .route(
            "/api/v1/roles/:role_id/assessments",
            post(assessment::handle_start_assessment),
        )
        .route(
            "/api/v1/roles/:role_id/assessments/assemble",
            post(assessment::handle_assemble),
        )
        .route(
            "/api/v1/assessments/:id/history",
            post(assessment::handle_record_history),
        )
        // Readiness
        .route(
            "/api/v1/assessments/:id/score",
            post(readiness::handle_score_assessment),
        )
        .route(
            "/api/v1/readiness/preview",
            post(readiness::handle_readiness_preview),
        )
        .with_state(state)
}
