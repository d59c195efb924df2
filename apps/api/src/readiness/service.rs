//! Scores a submitted assessment and stores the verdict.
//!
//! Flow: load assessment → reject if already scored → load role + skills →
//!       dedupe responses → check them against stored questions →
//!       aggregate per skill → score_readiness → persist once.

use std::collections::{HashMap, HashSet};

use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::readiness::scorer::{score_readiness, ReadinessConfig, ReadinessVerdict, SkillResult};
use crate::readiness::skill_scores::{score_responses, QuestionResponse};
use crate::store::AssessmentStore;

pub async fn score_assessment(
    store: &dyn AssessmentStore,
    assessment_id: Uuid,
    responses: &[QuestionResponse],
    config: &ReadinessConfig,
) -> Result<ReadinessVerdict, AppError> {
    if responses.is_empty() {
        return Err(AppError::Validation(
            "Cannot score an assessment without responses".to_string(),
        ));
    }

    let assessment = store
        .assessment(assessment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Assessment {assessment_id} not found")))?;

    if assessment.is_scored() {
        return Err(AppError::Conflict(format!(
            "Assessment {assessment_id} has already been scored"
        )));
    }

    let role = store
        .role(assessment.role_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Role {} not found", assessment.role_id)))?;

    let role_skills: HashMap<Uuid, _> = store
        .role_skills(role.id)
        .await?
        .into_iter()
        .map(|s| (s.skill_id, s))
        .collect();

    // A question answered more than once counts once; the first answer wins.
    let mut seen = HashSet::new();
    let responses: Vec<QuestionResponse> = responses
        .iter()
        .filter(|r| seen.insert(r.question_id))
        .cloned()
        .collect();

    let question_ids: Vec<Uuid> = responses.iter().map(|r| r.question_id).collect();
    let question_skills: HashMap<Uuid, Uuid> = store
        .questions_by_ids(&question_ids)
        .await?
        .into_iter()
        .map(|q| (q.id, q.skill_id))
        .collect();

    for r in &responses {
        match question_skills.get(&r.question_id) {
            None => {
                return Err(AppError::Validation(format!(
                    "Question {} does not exist",
                    r.question_id
                )));
            }
            Some(skill_id) if *skill_id != r.skill_id => {
                return Err(AppError::Validation(format!(
                    "Question {} belongs to skill {skill_id}, not {}",
                    r.question_id, r.skill_id
                )));
            }
            Some(_) => {}
        }
        if !role_skills.contains_key(&r.skill_id) {
            return Err(AppError::Validation(format!(
                "Question {} belongs to skill {}, which role '{}' does not require",
                r.question_id, r.skill_id, role.title
            )));
        }
    }

    let results: Vec<SkillResult> = score_responses(&responses)
        .into_iter()
        .filter_map(|score| {
            role_skills.get(&score.skill_id).map(|skill| SkillResult {
                skill_id: skill.skill_id,
                skill_name: skill.name.clone(),
                importance: skill.importance,
                achieved: score.raw_score,
                required: skill.proficiency_threshold,
            })
        })
        .collect();

    let verdict = score_readiness(&results, role.required_proficiency, config);

    let stored = store
        .complete_assessment(
            assessment_id,
            verdict.overall_proficiency,
            verdict.readiness.label(),
        )
        .await?;
    if !stored {
        // Lost a race with a concurrent submission.
        return Err(AppError::Conflict(format!(
            "Assessment {assessment_id} has already been scored"
        )));
    }

    info!(
        "Scored assessment {} for user {}: {:.1}% ({})",
        assessment_id, assessment.user_id, verdict.overall_proficiency, verdict.readiness
    );

    Ok(verdict)
}
