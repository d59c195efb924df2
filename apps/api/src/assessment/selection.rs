//! Skill selection and question sampling for one assessment attempt.
//!
//! No I/O here. The random source is passed in so sampling is reproducible
//! under a seeded RNG.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::question::QuestionRow;
use crate::models::skill::{ImportanceLevel, RoleSkill};

/// Longest history window an assembly may look back over, about ten years.
pub const MAX_EXCLUDE_DAYS: i64 = 3650;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyOptions {
    pub max_skills: usize,
    pub questions_per_skill: usize,
    /// Hard cap on the assembled question count.
    pub target_total: usize,
    /// Questions the user saw within this many days are avoided when possible.
    pub exclude_days: i64,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            max_skills: 7,
            questions_per_skill: 3,
            target_total: 25,
            exclude_days: 30,
        }
    }
}

impl AssemblyOptions {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_skills == 0 || self.questions_per_skill == 0 || self.target_total == 0 {
            return Err(AppError::Validation(
                "max_skills, questions_per_skill and target_total must be positive".to_string(),
            ));
        }
        if !(0..=MAX_EXCLUDE_DAYS).contains(&self.exclude_days) {
            return Err(AppError::Validation(format!(
                "exclude_days must be between 0 and {MAX_EXCLUDE_DAYS}"
            )));
        }
        Ok(())
    }
}

/// A sampled question annotated with the skill it was drawn for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembledQuestion {
    #[serde(flatten)]
    pub question: QuestionRow,
    pub skill_name: String,
    pub skill_importance: ImportanceLevel,
}

/// Priority order for role skills: importance tier first, then weight descending.
pub fn sort_by_priority(skills: &mut [RoleSkill]) {
    skills.sort_by(|a, b| {
        a.importance
            .cmp(&b.importance)
            .then_with(|| b.weight.total_cmp(&a.weight))
    });
}

/// Picks the top `max_skills` critical/important skills in priority order.
pub fn select_top_skills(skills: &[RoleSkill], max_skills: usize) -> Vec<RoleSkill> {
    let mut qualifying: Vec<RoleSkill> = skills
        .iter()
        .filter(|s| s.importance.is_assessed())
        .cloned()
        .collect();
    sort_by_priority(&mut qualifying);
    qualifying.truncate(max_skills);
    qualifying
}

/// Draws up to `count` questions from one skill's bank.
///
/// Questions in `recently_seen` are only used to top up the draw when the
/// unseen supply is smaller than `count`.
pub fn sample_questions<R: Rng + ?Sized>(
    pool: Vec<QuestionRow>,
    recently_seen: &HashSet<Uuid>,
    count: usize,
    rng: &mut R,
) -> Vec<QuestionRow> {
    let (mut unseen, mut seen): (Vec<QuestionRow>, Vec<QuestionRow>) = pool
        .into_iter()
        .partition(|q| !recently_seen.contains(&q.id));

    unseen.shuffle(rng);
    if unseen.len() >= count {
        unseen.truncate(count);
        return unseen;
    }

    seen.shuffle(rng);
    let missing = count - unseen.len();
    unseen.extend(seen.into_iter().take(missing));
    unseen
}

/// Concatenates per-skill draws in skill order and truncates to `target_total`.
/// Later skills lose questions first.
pub fn assemble(
    selections: Vec<(RoleSkill, Vec<QuestionRow>)>,
    target_total: usize,
) -> Vec<AssembledQuestion> {
    selections
        .into_iter()
        .flat_map(|(skill, questions)| {
            questions.into_iter().map(move |question| AssembledQuestion {
                question,
                skill_name: skill.name.clone(),
                skill_importance: skill.importance,
            })
        })
        .take(target_total)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn skill(name: &str, importance: ImportanceLevel, weight: f64) -> RoleSkill {
        RoleSkill {
            skill_id: Uuid::new_v4(),
            name: name.to_string(),
            category: "Technical".to_string(),
            importance,
            weight,
            proficiency_threshold: None,
        }
    }

    fn questions(skill_id: Uuid, n: usize) -> Vec<QuestionRow> {
        (0..n)
            .map(|i| QuestionRow {
                id: Uuid::new_v4(),
                skill_id,
                stem: format!("Question {i}?"),
                choices: serde_json::json!({"A": "x", "B": "y"}),
                answer_key: "A".to_string(),
                difficulty: "intermediate".to_string(),
                explanation: None,
                is_bank_question: true,
                times_used: 0,
                created_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn test_select_top_skills_orders_by_tier_then_weight() {
        let skills = vec![
            skill("Excel", ImportanceLevel::Important, 0.9),
            skill("Teamwork", ImportanceLevel::Helpful, 1.0),
            skill("SQL", ImportanceLevel::Critical, 0.4),
            skill("Python", ImportanceLevel::Critical, 0.8),
            skill("Tableau", ImportanceLevel::Important, 0.2),
        ];
        let top: Vec<String> = select_top_skills(&skills, 3)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(top, vec!["Python", "SQL", "Excel"]);
    }

    #[test]
    fn test_select_top_skills_drops_helpful() {
        let skills = vec![
            skill("Teamwork", ImportanceLevel::Helpful, 1.0),
            skill("Typing", ImportanceLevel::Helpful, 0.5),
        ];
        assert!(select_top_skills(&skills, 7).is_empty());
    }

    #[test]
    fn test_sample_prefers_unseen_questions() {
        let skill_id = Uuid::new_v4();
        let pool = questions(skill_id, 6);
        let unseen_id = pool[3].id;
        let seen: HashSet<Uuid> = pool
            .iter()
            .map(|q| q.id)
            .filter(|id| *id != unseen_id)
            .collect();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let drawn = sample_questions(pool.clone(), &seen, 1, &mut rng);
            assert_eq!(drawn.len(), 1);
            assert_eq!(drawn[0].id, unseen_id);
        }
    }

    #[test]
    fn test_sample_tops_up_from_seen_when_short() {
        let skill_id = Uuid::new_v4();
        let pool = questions(skill_id, 4);
        let seen: HashSet<Uuid> = pool.iter().skip(1).map(|q| q.id).collect();
        let mut rng = StdRng::seed_from_u64(7);

        let drawn = sample_questions(pool.clone(), &seen, 3, &mut rng);
        assert_eq!(drawn.len(), 3);
        // The one unseen question always leads.
        assert_eq!(drawn[0].id, pool[0].id);
    }

    #[test]
    fn test_sample_returns_whole_pool_when_smaller_than_count() {
        let pool = questions(Uuid::new_v4(), 2);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample_questions(pool, &HashSet::new(), 5, &mut rng).len(), 2);
    }

    #[test]
    fn test_sample_is_reproducible_for_a_seed() {
        let pool = questions(Uuid::new_v4(), 12);
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            sample_questions(pool.clone(), &HashSet::new(), 3, &mut rng)
                .into_iter()
                .map(|q| q.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(42), draw(42));
    }

    #[test]
    fn test_assemble_truncates_later_skills_first() {
        let first = skill("SQL", ImportanceLevel::Critical, 1.0);
        let second = skill("Excel", ImportanceLevel::Important, 1.0);
        let selections = vec![
            (first.clone(), questions(first.skill_id, 3)),
            (second.clone(), questions(second.skill_id, 3)),
        ];
        let assembled = assemble(selections, 4);
        assert_eq!(assembled.len(), 4);
        assert!(assembled[..3].iter().all(|q| q.skill_name == "SQL"));
        assert_eq!(assembled[3].skill_name, "Excel");
        assert_eq!(assembled[3].skill_importance, ImportanceLevel::Important);
    }

    #[test]
    fn test_options_reject_zero_counts() {
        let options = AssemblyOptions {
            questions_per_skill: 0,
            ..AssemblyOptions::default()
        };
        assert!(options.validate().is_err());
        assert!(AssemblyOptions::default().validate().is_ok());
    }

    #[test]
    fn test_options_bound_history_window() {
        for exclude_days in [-1, MAX_EXCLUDE_DAYS + 1, 1_000_000_000_000_000] {
            let options = AssemblyOptions {
                exclude_days,
                ..AssemblyOptions::default()
            };
            assert!(
                matches!(options.validate(), Err(AppError::Validation(_))),
                "exclude_days {exclude_days} accepted"
            );
        }
        let longest = AssemblyOptions {
            exclude_days: MAX_EXCLUDE_DAYS,
            ..AssemblyOptions::default()
        };
        assert!(longest.validate().is_ok());
    }

    #[test]
    fn test_options_fill_missing_fields_with_defaults() {
        let options: AssemblyOptions =
            serde_json::from_str(r#"{"questions_per_skill": 2}"#).unwrap();
        assert_eq!(options.questions_per_skill, 2);
        assert_eq!(options.max_skills, 7);
        assert_eq!(options.target_total, 25);
        assert_eq!(options.exclude_days, 30);
    }
}
