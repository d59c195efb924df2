//! Question Bank Builder: fills each of a role's skills with reusable bank questions.
//!
//! Flow: load role + skills → order by priority → per skill: batched generation →
//!       validate → rotate answer keys → persist → per-skill outcome.
//!
//! Skills are processed one after another. A failing skill is reported in the
//! build report and the loop moves on; nothing is retried.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::assessment::selection::sort_by_priority;
use crate::errors::AppError;
use crate::models::question::{Difficulty, NewBankQuestion};
use crate::models::skill::{ImportanceLevel, RoleRow, RoleSkill};
use crate::question_bank::generator::{QuestionBatchRequest, QuestionGenerator};
use crate::question_bank::validation::{rotate_answer_keys, validate_batch};
use crate::store::AssessmentStore;

/// Questions requested per generator call.
pub const BATCH_SIZE: usize = 3;
/// Characters of role description passed to the generator as job context.
const JOB_CONTEXT_CHARS: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankBuildOptions {
    pub questions_per_skill: usize,
}

impl Default for BankBuildOptions {
    fn default() -> Self {
        Self {
            questions_per_skill: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SkillOutcomeStatus {
    Generated {
        questions: usize,
        failed_batches: usize,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillOutcome {
    pub skill_id: Uuid,
    pub skill_name: String,
    #[serde(flatten)]
    pub status: SkillOutcomeStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankBuildReport {
    pub role_id: Uuid,
    pub skills_attempted: usize,
    /// Skills with at least one persisted question. Failed skills are not counted.
    pub skills_processed: usize,
    pub total_questions: usize,
    pub outcomes: Vec<SkillOutcome>,
}

/// What one skill's generation produced.
#[derive(Debug)]
struct SkillYield {
    persisted: usize,
    failed_batches: usize,
}

/// Higher-stakes skills get harder questions.
pub fn target_difficulty(importance: ImportanceLevel) -> Difficulty {
    match importance {
        ImportanceLevel::Critical => Difficulty::Expert,
        ImportanceLevel::Important => Difficulty::Intermediate,
        ImportanceLevel::Helpful => Difficulty::Beginner,
    }
}

/// Builds the question bank for every skill attached to a role.
pub async fn build_question_bank(
    store: &dyn AssessmentStore,
    generator: &dyn QuestionGenerator,
    role_id: Uuid,
    options: &BankBuildOptions,
) -> Result<BankBuildReport, AppError> {
    if options.questions_per_skill == 0 {
        return Err(AppError::Validation(
            "questions_per_skill must be positive".to_string(),
        ));
    }

    let role = store
        .role(role_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Role {role_id} not found")))?;

    let mut skills = store.role_skills(role_id).await?;
    if skills.is_empty() {
        return Err(AppError::InsufficientData(format!(
            "Role '{}' ({role_id}) has no skills to build questions for",
            role.title
        )));
    }
    sort_by_priority(&mut skills);

    info!(
        "Building question bank for role {role_id}: {} skills, {} questions each",
        skills.len(),
        options.questions_per_skill
    );

    let job_context = job_context(&role);
    let mut results: Vec<(RoleSkill, Result<SkillYield, AppError>)> = Vec::with_capacity(skills.len());
    for skill in skills {
        let result = build_skill_pool(
            store,
            generator,
            &skill,
            &job_context,
            options.questions_per_skill,
        )
        .await;
        if let Err(e) = &result {
            warn!(
                "Question generation failed for skill '{}' on role {role_id}: {e}",
                skill.name
            );
        }
        results.push((skill, result));
    }

    let report = summarize(role_id, results);
    info!(
        "Question bank for role {role_id} complete: {} questions across {}/{} skills",
        report.total_questions, report.skills_processed, report.skills_attempted
    );
    Ok(report)
}

/// Generates and persists up to `questions_per_skill` questions for one skill.
/// Fails only when nothing at all could be persisted.
async fn build_skill_pool(
    store: &dyn AssessmentStore,
    generator: &dyn QuestionGenerator,
    skill: &RoleSkill,
    job_context: &str,
    questions_per_skill: usize,
) -> Result<SkillYield, AppError> {
    let difficulty = target_difficulty(skill.importance);
    let mut accepted_stems: Vec<String> = Vec::new();
    let mut persisted = 0usize;
    let mut failed_batches = 0usize;
    let mut last_error: Option<String> = None;

    let mut requested = 0usize;
    while requested < questions_per_skill {
        let count = BATCH_SIZE.min(questions_per_skill - requested);
        requested += count;

        let request = QuestionBatchRequest {
            skill_name: skill.name.clone(),
            category: skill.category.clone(),
            difficulty,
            job_context: job_context.to_string(),
            count,
            avoid_stems: accepted_stems.clone(),
        };

        let batch = generator
            .generate_batch(&request)
            .await
            .and_then(|batch| validate_batch(batch, count));
        let mut batch = match batch {
            Ok(batch) => batch,
            Err(e) => {
                warn!("Skipping batch for skill '{}': {e}", skill.name);
                failed_batches += 1;
                last_error = Some(e.to_string());
                continue;
            }
        };

        rotate_answer_keys(&mut batch, accepted_stems.len());

        for generated in batch {
            let question = NewBankQuestion {
                skill_id: skill.skill_id,
                stem: generated.stem.trim().to_string(),
                choices: generated.choices,
                answer_key: generated.correct_answer,
                difficulty: Difficulty::parse(&generated.difficulty).unwrap_or(difficulty),
                explanation: generated.explanation,
            };
            accepted_stems.push(question.stem.clone());
            match store.insert_bank_question(&question).await {
                Ok(_) => persisted += 1,
                Err(e) => {
                    warn!("Failed to persist question for skill '{}': {e}", skill.name);
                    last_error = Some(e.to_string());
                }
            }
        }
    }

    if persisted == 0 {
        return Err(AppError::Llm(format!(
            "no questions persisted for skill '{}' ({} of {} batches failed): {}",
            skill.name,
            failed_batches,
            questions_per_skill.div_ceil(BATCH_SIZE),
            last_error.unwrap_or_else(|| "unknown error".to_string())
        )));
    }

    Ok(SkillYield {
        persisted,
        failed_batches,
    })
}

fn summarize(
    role_id: Uuid,
    results: Vec<(RoleSkill, Result<SkillYield, AppError>)>,
) -> BankBuildReport {
    let skills_attempted = results.len();
    let mut skills_processed = 0;
    let mut total_questions = 0;

    let outcomes = results
        .into_iter()
        .map(|(skill, result)| {
            let status = match result {
                Ok(y) => {
                    skills_processed += 1;
                    total_questions += y.persisted;
                    SkillOutcomeStatus::Generated {
                        questions: y.persisted,
                        failed_batches: y.failed_batches,
                    }
                }
                Err(e) => SkillOutcomeStatus::Failed {
                    error: e.to_string(),
                },
            };
            SkillOutcome {
                skill_id: skill.skill_id,
                skill_name: skill.name,
                status,
            }
        })
        .collect();

    BankBuildReport {
        role_id,
        skills_attempted,
        skills_processed,
        total_questions,
        outcomes,
    }
}

fn job_context(role: &RoleRow) -> String {
    let excerpt: String = role
        .description
        .as_deref()
        .unwrap_or_default()
        .chars()
        .take(JOB_CONTEXT_CHARS)
        .collect();
    if excerpt.is_empty() {
        format!("{} ({})", role.title, role.occupation_code)
    } else {
        format!("{} ({}): {excerpt}", role.title, role.occupation_code)
    }
}
