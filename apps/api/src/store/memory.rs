//! In-memory `AssessmentStore` used by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::assessment::{AssessmentRow, STATUS_COMPLETED, STATUS_IN_PROGRESS};
use crate::models::question::{NewBankQuestion, QuestionRow};
use crate::models::skill::{ImportanceLevel, RoleRow, RoleSkill};
use crate::store::AssessmentStore;

/// One `user_question_history` row.
#[derive(Debug, Clone)]
pub struct QuestionHistoryRow {
    pub user_id: Uuid,
    pub question_id: Uuid,
    pub assessment_id: Uuid,
    pub seen_at: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    roles: HashMap<Uuid, RoleRow>,
    role_skills: HashMap<Uuid, Vec<RoleSkill>>,
    questions: Vec<QuestionRow>,
    history: Vec<QuestionHistoryRow>,
    assessments: HashMap<Uuid, AssessmentRow>,
    /// Skill ids whose inserts fail, to exercise persistence error paths.
    failing_inserts: HashSet<Uuid>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_role(&self, title: &str, required_proficiency: Option<f64>) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.lock().unwrap().roles.insert(
            id,
            RoleRow {
                id,
                title: title.to_string(),
                occupation_code: "15-1252.00".to_string(),
                description: Some(format!("{title} building production systems")),
                required_proficiency,
                created_at: Utc::now(),
            },
        );
        id
    }

    pub fn add_skill(
        &self,
        role_id: Uuid,
        name: &str,
        importance: ImportanceLevel,
        weight: f64,
    ) -> RoleSkill {
        let skill = RoleSkill {
            skill_id: Uuid::new_v4(),
            name: name.to_string(),
            category: "Technical".to_string(),
            importance,
            weight,
            proficiency_threshold: None,
        };
        self.inner
            .lock()
            .unwrap()
            .role_skills
            .entry(role_id)
            .or_default()
            .push(skill.clone());
        skill
    }

    /// Seeds `count` bank questions for a skill and returns their ids.
    pub fn add_questions(&self, skill_id: Uuid, count: usize) -> Vec<Uuid> {
        let mut inner = self.inner.lock().unwrap();
        (0..count)
            .map(|i| {
                let id = Uuid::new_v4();
                inner.questions.push(QuestionRow {
                    id,
                    skill_id,
                    stem: format!("Seeded question {i}?"),
                    choices: serde_json::json!({"A": "one", "B": "two", "C": "three", "D": "four"}),
                    answer_key: "A".to_string(),
                    difficulty: "intermediate".to_string(),
                    explanation: None,
                    is_bank_question: true,
                    times_used: 0,
                    created_at: Utc::now(),
                });
                id
            })
            .collect()
    }

    pub fn add_history(&self, user_id: Uuid, question_id: Uuid, seen_at: DateTime<Utc>) {
        self.inner.lock().unwrap().history.push(QuestionHistoryRow {
            user_id,
            question_id,
            assessment_id: Uuid::new_v4(),
            seen_at,
        });
    }

    pub fn fail_inserts_for(&self, skill_id: Uuid) {
        self.inner.lock().unwrap().failing_inserts.insert(skill_id);
    }

    pub fn history(&self) -> Vec<QuestionHistoryRow> {
        self.inner.lock().unwrap().history.clone()
    }

    pub fn questions_for(&self, skill_id: Uuid) -> Vec<QuestionRow> {
        self.inner
            .lock()
            .unwrap()
            .questions
            .iter()
            .filter(|q| q.skill_id == skill_id)
            .cloned()
            .collect()
    }

    pub fn times_used(&self, question_id: Uuid) -> i32 {
        self.inner
            .lock()
            .unwrap()
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .map(|q| q.times_used)
            .unwrap_or(0)
    }
}

#[async_trait]
impl AssessmentStore for MemoryStore {
    async fn role(&self, role_id: Uuid) -> Result<Option<RoleRow>, AppError> {
        Ok(self.inner.lock().unwrap().roles.get(&role_id).cloned())
    }

    async fn role_skills(&self, role_id: Uuid) -> Result<Vec<RoleSkill>, AppError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .role_skills
            .get(&role_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn bank_questions(&self, skill_id: Uuid) -> Result<Vec<QuestionRow>, AppError> {
        Ok(self
            .questions_for(skill_id)
            .into_iter()
            .filter(|q| q.is_bank_question)
            .collect())
    }

    async fn count_bank_questions(&self, skill_id: Uuid) -> Result<i64, AppError> {
        Ok(self.bank_questions(skill_id).await?.len() as i64)
    }

    async fn questions_by_ids(&self, question_ids: &[Uuid]) -> Result<Vec<QuestionRow>, AppError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .questions
            .iter()
            .filter(|q| question_ids.contains(&q.id))
            .cloned()
            .collect())
    }

    async fn seen_question_ids(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<HashSet<Uuid>, AppError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .history
            .iter()
            .filter(|h| h.user_id == user_id && h.seen_at >= since)
            .map(|h| h.question_id)
            .collect())
    }

    async fn insert_bank_question(&self, question: &NewBankQuestion) -> Result<Uuid, AppError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.failing_inserts.contains(&question.skill_id) {
            return Err(AppError::Internal(anyhow::anyhow!("insert rejected")));
        }
        let id = Uuid::new_v4();
        inner.questions.push(QuestionRow {
            id,
            skill_id: question.skill_id,
            stem: question.stem.clone(),
            choices: serde_json::to_value(&question.choices).unwrap(),
            answer_key: question.answer_key.clone(),
            difficulty: question.difficulty.as_str().to_string(),
            explanation: question.explanation.clone(),
            is_bank_question: true,
            times_used: 0,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn record_question_history(
        &self,
        user_id: Uuid,
        assessment_id: Uuid,
        question_ids: &[Uuid],
        seen_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        for &question_id in question_ids {
            inner.history.push(QuestionHistoryRow {
                user_id,
                question_id,
                assessment_id,
                seen_at,
            });
            if let Some(q) = inner.questions.iter_mut().find(|q| q.id == question_id) {
                q.times_used += 1;
            }
        }
        Ok(())
    }

    async fn create_assessment(
        &self,
        user_id: Uuid,
        role_id: Uuid,
    ) -> Result<AssessmentRow, AppError> {
        let row = AssessmentRow {
            id: Uuid::new_v4(),
            user_id,
            role_id,
            status: STATUS_IN_PROGRESS.to_string(),
            overall_proficiency: None,
            readiness: None,
            started_at: Utc::now(),
            completed_at: None,
        };
        self.inner
            .lock()
            .unwrap()
            .assessments
            .insert(row.id, row.clone());
        Ok(row)
    }

    async fn assessment(&self, assessment_id: Uuid) -> Result<Option<AssessmentRow>, AppError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .assessments
            .get(&assessment_id)
            .cloned())
    }

    async fn complete_assessment(
        &self,
        assessment_id: Uuid,
        overall_proficiency: f64,
        readiness: &str,
    ) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.assessments.get_mut(&assessment_id) {
            Some(row) if row.status == STATUS_IN_PROGRESS => {
                row.status = STATUS_COMPLETED.to_string();
                row.overall_proficiency = Some(overall_proficiency);
                row.readiness = Some(readiness.to_string());
                row.completed_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
