//! Axum route handlers for readiness scoring.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::readiness::scorer::{score_readiness, validate_results, ReadinessVerdict, SkillResult};
use crate::readiness::service::score_assessment;
use crate::readiness::skill_scores::QuestionResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScoreAssessmentRequest {
    pub responses: Vec<QuestionResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ReadinessPreviewRequest {
    pub results: Vec<SkillResult>,
    #[serde(default)]
    pub role_threshold: Option<f64>,
}

/// POST /api/v1/assessments/:id/score
///
/// Scores submitted answers and stores the verdict. An assessment is scored once.
pub async fn handle_score_assessment(
    State(state): State<AppState>,
    Path(assessment_id): Path<Uuid>,
    Json(request): Json<ScoreAssessmentRequest>,
) -> Result<Json<ReadinessVerdict>, AppError> {
    let verdict = score_assessment(
        state.store.as_ref(),
        assessment_id,
        &request.responses,
        &state.readiness,
    )
    .await?;
    Ok(Json(verdict))
}

/// POST /api/v1/readiness/preview
///
/// Scores precomputed per-skill percentages without touching the database.
pub async fn handle_readiness_preview(
    State(state): State<AppState>,
    Json(request): Json<ReadinessPreviewRequest>,
) -> Result<Json<ReadinessVerdict>, AppError> {
    validate_results(&request.results)?;
    Ok(Json(score_readiness(
        &request.results,
        request.role_threshold,
        &state.readiness,
    )))
}
