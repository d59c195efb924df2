//! Axum route handlers for the Question Bank API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::question_bank::builder::{build_question_bank, BankBuildOptions, BankBuildReport};
use crate::question_bank::stats::{question_bank_stats, QuestionBankStats};
use crate::state::AppState;

const MAX_QUESTIONS_PER_SKILL: usize = 50;

#[derive(Debug, Default, Deserialize)]
pub struct BuildBankRequest {
    /// Overrides `BANK_QUESTIONS_PER_SKILL` for this build.
    #[serde(default)]
    pub questions_per_skill: Option<usize>,
}

/// POST /api/v1/roles/:role_id/question-bank
///
/// Runs the whole build before responding. Per-skill failures are reported
/// in the body, not as an error status.
pub async fn handle_build_question_bank(
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
    Json(request): Json<BuildBankRequest>,
) -> Result<Json<BankBuildReport>, AppError> {
    let questions_per_skill = request
        .questions_per_skill
        .unwrap_or(state.config.bank_questions_per_skill);
    if !(1..=MAX_QUESTIONS_PER_SKILL).contains(&questions_per_skill) {
        return Err(AppError::Validation(format!(
            "questions_per_skill must be between 1 and {MAX_QUESTIONS_PER_SKILL}"
        )));
    }

    let report = build_question_bank(
        state.store.as_ref(),
        state.generator.as_ref(),
        role_id,
        &BankBuildOptions {
            questions_per_skill,
        },
    )
    .await?;
    Ok(Json(report))
}

/// GET /api/v1/roles/:role_id/question-bank/stats
pub async fn handle_question_bank_stats(
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
) -> Result<Json<QuestionBankStats>, AppError> {
    let stats = question_bank_stats(state.store.as_ref(), role_id).await?;
    Ok(Json(stats))
}
