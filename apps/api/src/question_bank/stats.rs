use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::store::AssessmentStore;

/// Bank coverage for one role.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionBankStats {
    pub role_id: Uuid,
    pub total_questions: i64,
    /// Skill name → bank questions for that skill.
    pub by_skill: BTreeMap<String, i64>,
    pub avg_questions_per_skill: f64,
}

pub async fn question_bank_stats(
    store: &dyn AssessmentStore,
    role_id: Uuid,
) -> Result<QuestionBankStats, AppError> {
    if store.role(role_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Role {role_id} not found")));
    }

    let skills = store.role_skills(role_id).await?;
    let mut by_skill = BTreeMap::new();
    let mut total_questions = 0;
    for skill in &skills {
        let count = store.count_bank_questions(skill.skill_id).await?;
        total_questions += count;
        *by_skill.entry(skill.name.clone()).or_insert(0) += count;
    }

    Ok(QuestionBankStats {
        role_id,
        total_questions,
        by_skill,
        avg_questions_per_skill: total_questions as f64 / skills.len().max(1) as f64,
    })
}
