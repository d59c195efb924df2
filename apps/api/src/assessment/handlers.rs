//! Axum route handlers for the Assessment API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assessment::assembler::{
    assemble_dynamic_assessment, record_question_history, start_assessment, AssembledAssessment,
};
use crate::assessment::selection::AssemblyOptions;
use crate::errors::AppError;
use crate::models::assessment::AssessmentRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StartAssessmentRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct AssembleRequest {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(flatten)]
    pub options: AssemblyOptions,
}

#[derive(Debug, Deserialize)]
pub struct RecordHistoryRequest {
    pub user_id: Uuid,
    pub question_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct RecordHistoryResponse {
    pub recorded: usize,
}

/// POST /api/v1/roles/:role_id/assessments
pub async fn handle_start_assessment(
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
    Json(request): Json<StartAssessmentRequest>,
) -> Result<(StatusCode, Json<AssessmentRow>), AppError> {
    let assessment = start_assessment(state.store.as_ref(), request.user_id, role_id).await?;
    Ok((StatusCode::CREATED, Json(assessment)))
}

/// POST /api/v1/roles/:role_id/assessments/assemble
///
/// Draws a fresh question set. Does not record history; call the history
/// endpoint once the user has actually been shown the questions.
pub async fn handle_assemble(
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
    Json(request): Json<AssembleRequest>,
) -> Result<Json<AssembledAssessment>, AppError> {
    let mut rng = StdRng::from_entropy();
    let assembled = assemble_dynamic_assessment(
        state.store.as_ref(),
        role_id,
        request.user_id,
        &request.options,
        &mut rng,
    )
    .await?;
    Ok(Json(assembled))
}

/// POST /api/v1/assessments/:id/history
pub async fn handle_record_history(
    State(state): State<AppState>,
    Path(assessment_id): Path<Uuid>,
    Json(request): Json<RecordHistoryRequest>,
) -> Result<Json<RecordHistoryResponse>, AppError> {
    let recorded = record_question_history(
        state.store.as_ref(),
        request.user_id,
        assessment_id,
        &request.question_ids,
    )
    .await?;
    Ok(Json(RecordHistoryResponse { recorded }))
}
