//! Persistence seam for the assessment core.
//!
//! Services take `&dyn AssessmentStore` rather than a pool so they can run
//! against Postgres in production and an in-memory fake in tests.
//! `AppState` holds an `Arc<dyn AssessmentStore>`, built once at startup.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::assessment::AssessmentRow;
use crate::models::question::{NewBankQuestion, QuestionRow};
use crate::models::skill::{RoleRow, RoleSkill};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgAssessmentStore;

#[async_trait]
pub trait AssessmentStore: Send + Sync {
    async fn role(&self, role_id: Uuid) -> Result<Option<RoleRow>, AppError>;

    /// All skills attached to a role, in no particular order.
    async fn role_skills(&self, role_id: Uuid) -> Result<Vec<RoleSkill>, AppError>;

    /// Bank questions tagged for one skill.
    async fn bank_questions(&self, skill_id: Uuid) -> Result<Vec<QuestionRow>, AppError>;

    async fn count_bank_questions(&self, skill_id: Uuid) -> Result<i64, AppError>;

    /// Questions with the given ids. Unknown ids are simply absent from the result.
    async fn questions_by_ids(&self, question_ids: &[Uuid]) -> Result<Vec<QuestionRow>, AppError>;

    /// Ids of questions the user was shown at or after `since`.
    async fn seen_question_ids(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<HashSet<Uuid>, AppError>;

    /// Persists a bank question with a zero usage counter. Returns its id.
    async fn insert_bank_question(&self, question: &NewBankQuestion) -> Result<Uuid, AppError>;

    /// Appends one history row per question and bumps each question's usage counter.
    async fn record_question_history(
        &self,
        user_id: Uuid,
        assessment_id: Uuid,
        question_ids: &[Uuid],
        seen_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    async fn create_assessment(&self, user_id: Uuid, role_id: Uuid)
        -> Result<AssessmentRow, AppError>;

    async fn assessment(&self, assessment_id: Uuid) -> Result<Option<AssessmentRow>, AppError>;

    /// Stores the final verdict on an in-progress assessment.
    /// Returns `false` if the assessment was already completed.
    async fn complete_assessment(
        &self,
        assessment_id: Uuid,
        overall_proficiency: f64,
        readiness: &str,
    ) -> Result<bool, AppError>;
}
