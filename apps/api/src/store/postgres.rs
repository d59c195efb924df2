use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::assessment::{AssessmentRow, STATUS_COMPLETED, STATUS_IN_PROGRESS};
use crate::models::question::{NewBankQuestion, QuestionRow};
use crate::models::skill::{RoleRow, RoleSkill, RoleSkillRow};
use crate::store::AssessmentStore;

/// `AssessmentStore` over the shared Postgres pool.
#[derive(Clone)]
pub struct PgAssessmentStore {
    pool: PgPool,
}

impl PgAssessmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssessmentStore for PgAssessmentStore {
    async fn role(&self, role_id: Uuid) -> Result<Option<RoleRow>, AppError> {
        Ok(
            sqlx::query_as::<_, RoleRow>("SELECT * FROM roles WHERE id = $1")
                .bind(role_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn role_skills(&self, role_id: Uuid) -> Result<Vec<RoleSkill>, AppError> {
        let rows = sqlx::query_as::<_, RoleSkillRow>(
            r#"
            SELECT rs.role_id, rs.skill_id, s.name, s.category,
                   rs.importance_level, rs.weight, rs.proficiency_threshold
            FROM role_skills rs
            JOIN skills s ON s.id = rs.skill_id
            WHERE rs.role_id = $1
            "#,
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let skill_id = row.skill_id;
                RoleSkill::try_from(row).map_err(|e| {
                    AppError::Internal(anyhow::anyhow!(
                        "role {role_id} skill {skill_id} has invalid data: {e}"
                    ))
                })
            })
            .collect()
    }

    async fn bank_questions(&self, skill_id: Uuid) -> Result<Vec<QuestionRow>, AppError> {
        Ok(sqlx::query_as::<_, QuestionRow>(
            "SELECT * FROM quiz_questions WHERE skill_id = $1 AND is_bank_question = TRUE",
        )
        .bind(skill_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn count_bank_questions(&self, skill_id: Uuid) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar(
            "SELECT COUNT(*) FROM quiz_questions WHERE skill_id = $1 AND is_bank_question = TRUE",
        )
        .bind(skill_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn questions_by_ids(&self, question_ids: &[Uuid]) -> Result<Vec<QuestionRow>, AppError> {
        Ok(
            sqlx::query_as::<_, QuestionRow>("SELECT * FROM quiz_questions WHERE id = ANY($1)")
                .bind(question_ids)
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn seen_question_ids(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<HashSet<Uuid>, AppError> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT question_id FROM user_question_history WHERE user_id = $1 AND seen_at >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids.into_iter().collect())
    }

    async fn insert_bank_question(&self, question: &NewBankQuestion) -> Result<Uuid, AppError> {
        let choices = serde_json::to_value(&question.choices)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize choices: {e}")))?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO quiz_questions
                (skill_id, stem, choices, answer_key, difficulty, explanation,
                 is_bank_question, times_used)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, 0)
            RETURNING id
            "#,
        )
        .bind(question.skill_id)
        .bind(&question.stem)
        .bind(&choices)
        .bind(&question.answer_key)
        .bind(question.difficulty.as_str())
        .bind(&question.explanation)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn record_question_history(
        &self,
        user_id: Uuid,
        assessment_id: Uuid,
        question_ids: &[Uuid],
        seen_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO user_question_history (user_id, question_id, assessment_id, seen_at)
            SELECT $1, question_id, $2, $3
            FROM UNNEST($4::uuid[]) AS question_id
            "#,
        )
        .bind(user_id)
        .bind(assessment_id)
        .bind(seen_at)
        .bind(question_ids)
        .execute(&mut *tx)
        .await?;

        let updated = sqlx::query(
            "UPDATE quiz_questions SET times_used = times_used + 1 WHERE id = ANY($1)",
        )
        .bind(question_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            "Recorded {} history rows for assessment {assessment_id}, {} usage counters bumped",
            question_ids.len(),
            updated.rows_affected()
        );
        Ok(())
    }

    async fn create_assessment(
        &self,
        user_id: Uuid,
        role_id: Uuid,
    ) -> Result<AssessmentRow, AppError> {
        Ok(sqlx::query_as::<_, AssessmentRow>(
            r#"
            INSERT INTO assessments (user_id, role_id, status)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(role_id)
        .bind(STATUS_IN_PROGRESS)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn assessment(&self, assessment_id: Uuid) -> Result<Option<AssessmentRow>, AppError> {
        Ok(
            sqlx::query_as::<_, AssessmentRow>("SELECT * FROM assessments WHERE id = $1")
                .bind(assessment_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn complete_assessment(
        &self,
        assessment_id: Uuid,
        overall_proficiency: f64,
        readiness: &str,
    ) -> Result<bool, AppError> {
        // Guarded on status so a scored assessment is never overwritten.
        let result = sqlx::query(
            r#"
            UPDATE assessments
            SET overall_proficiency = $1, readiness = $2, status = $3, completed_at = NOW()
            WHERE id = $4 AND status = $5
            "#,
        )
        .bind(overall_proficiency)
        .bind(readiness)
        .bind(STATUS_COMPLETED)
        .bind(assessment_id)
        .bind(STATUS_IN_PROGRESS)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
