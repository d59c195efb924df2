//! Dynamic Assessment Assembler: builds one concrete question list per attempt.
//!
//! Flow: load role → select top skills → read user's recent history →
//!       sample each skill's bank → concatenate + truncate.
//!
//! Assembly never writes. History is recorded separately, by
//! `record_question_history`, once the user actually takes the questions, so
//! previews leave no trace.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::assessment::selection::{
    assemble, sample_questions, select_top_skills, AssembledQuestion, AssemblyOptions,
};
use crate::errors::AppError;
use crate::models::assessment::AssessmentRow;
use crate::models::skill::RoleSkill;
use crate::store::AssessmentStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembledAssessment {
    pub role_id: Uuid,
    /// Skills used, in selection order.
    pub skills: Vec<RoleSkill>,
    pub questions: Vec<AssembledQuestion>,
    pub total_questions: usize,
}

/// Creates an in-progress assessment for a user attempting a role.
pub async fn start_assessment(
    store: &dyn AssessmentStore,
    user_id: Uuid,
    role_id: Uuid,
) -> Result<AssessmentRow, AppError> {
    store
        .role(role_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Role {role_id} not found")))?;

    let assessment = store.create_assessment(user_id, role_id).await?;
    info!(
        "Started assessment {} for user {user_id} on role {role_id}",
        assessment.id
    );
    Ok(assessment)
}

/// Assembles one assessment attempt for a role.
///
/// Fails with `InsufficientData` when the role has no critical/important
/// skills or when any selected skill has an empty bank. No partial
/// assessment is returned.
pub async fn assemble_dynamic_assessment<R: Rng + Send>(
    store: &dyn AssessmentStore,
    role_id: Uuid,
    user_id: Option<Uuid>,
    options: &AssemblyOptions,
    rng: &mut R,
) -> Result<AssembledAssessment, AppError> {
    options.validate()?;

    let role = store
        .role(role_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Role {role_id} not found")))?;

    let role_skills = store.role_skills(role_id).await?;
    let skills = select_top_skills(&role_skills, options.max_skills);
    if skills.is_empty() {
        return Err(AppError::InsufficientData(format!(
            "Role '{}' ({role_id}) has no critical or important skills to assess",
            role.title
        )));
    }
    info!(
        "Assembling assessment for role {role_id}: {} of {} skills selected",
        skills.len(),
        role_skills.len()
    );

    let recently_seen = match user_id {
        Some(user_id) => {
            let since = Duration::try_days(options.exclude_days)
                .and_then(|window| Utc::now().checked_sub_signed(window))
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "exclude_days {} is out of range",
                        options.exclude_days
                    ))
                })?;
            store.seen_question_ids(user_id, since).await?
        }
        None => HashSet::new(),
    };

    let mut selections = Vec::with_capacity(skills.len());
    for skill in &skills {
        let pool = store.bank_questions(skill.skill_id).await?;
        if pool.is_empty() {
            return Err(AppError::InsufficientData(format!(
                "Skill '{}' has no bank questions for role '{}' ({role_id}). \
                Build the question bank before assembling assessments.",
                skill.name, role.title
            )));
        }

        let pool_size = pool.len();
        let drawn = sample_questions(pool, &recently_seen, options.questions_per_skill, rng);
        debug!(
            "{}: drew {} of {} bank questions",
            skill.name,
            drawn.len(),
            pool_size
        );
        selections.push((skill.clone(), drawn));
    }

    let questions = assemble(selections, options.target_total);
    info!(
        "Assessment assembled for role {role_id}: {} questions from {} skills",
        questions.len(),
        skills.len()
    );

    Ok(AssembledAssessment {
        role_id,
        total_questions: questions.len(),
        skills,
        questions,
    })
}

/// Records that a user was shown these questions during an assessment.
/// Appends one history row per distinct question and bumps its usage counter.
/// Returns the number of questions recorded.
pub async fn record_question_history(
    store: &dyn AssessmentStore,
    user_id: Uuid,
    assessment_id: Uuid,
    question_ids: &[Uuid],
) -> Result<usize, AppError> {
    if question_ids.is_empty() {
        return Err(AppError::Validation(
            "question_ids cannot be empty".to_string(),
        ));
    }

    let assessment = store
        .assessment(assessment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Assessment {assessment_id} not found")))?;
    if assessment.user_id != user_id {
        return Err(AppError::Validation(format!(
            "Assessment {assessment_id} does not belong to user {user_id}"
        )));
    }

    let mut seen = HashSet::new();
    let distinct: Vec<Uuid> = question_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect();

    let role_skills: HashSet<Uuid> = store
        .role_skills(assessment.role_id)
        .await?
        .into_iter()
        .map(|s| s.skill_id)
        .collect();
    let question_skills: HashMap<Uuid, Uuid> = store
        .questions_by_ids(&distinct)
        .await?
        .into_iter()
        .map(|q| (q.id, q.skill_id))
        .collect();
    for id in &distinct {
        match question_skills.get(id) {
            None => {
                return Err(AppError::Validation(format!("Question {id} does not exist")));
            }
            Some(skill_id) if !role_skills.contains(skill_id) => {
                return Err(AppError::Validation(format!(
                    "Question {id} belongs to skill {skill_id}, which the assessed role does not require"
                )));
            }
            Some(_) => {}
        }
    }

    store
        .record_question_history(user_id, assessment_id, &distinct, Utc::now())
        .await?;

    info!(
        "Recorded {} shown questions for user {user_id} on assessment {assessment_id}",
        distinct.len()
    );
    Ok(distinct.len())
}
