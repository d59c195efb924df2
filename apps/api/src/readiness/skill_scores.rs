//! Per-skill aggregation of answered questions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One answered question as captured by the assessment UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub question_id: Uuid,
    pub skill_id: Uuid,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillScore {
    pub skill_id: Uuid,
    pub answered: usize,
    pub correct: usize,
    /// Percent correct.
    pub raw_score: f64,
}

/// Groups responses by skill and scores each group. Output is ordered by skill id.
pub fn score_responses(responses: &[QuestionResponse]) -> Vec<SkillScore> {
    let mut groups: BTreeMap<Uuid, (usize, usize)> = BTreeMap::new();
    for response in responses {
        let (answered, correct) = groups.entry(response.skill_id).or_default();
        *answered += 1;
        if response.is_correct {
            *correct += 1;
        }
    }

    groups
        .into_iter()
        .map(|(skill_id, (answered, correct))| SkillScore {
            skill_id,
            answered,
            correct,
            raw_score: correct as f64 / answered as f64 * 100.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(skill_id: Uuid, is_correct: bool) -> QuestionResponse {
        QuestionResponse {
            question_id: Uuid::new_v4(),
            skill_id,
            is_correct,
        }
    }

    #[test]
    fn test_raw_score_is_percent_correct() {
        let skill = Uuid::new_v4();
        let scores = score_responses(&[
            response(skill, true),
            response(skill, true),
            response(skill, false),
            response(skill, true),
        ]);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].raw_score, 75.0);
        assert_eq!(scores[0].answered, 4);
        assert_eq!(scores[0].correct, 3);
    }

    #[test]
    fn test_responses_grouped_per_skill() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let scores = score_responses(&[response(a, true), response(b, false), response(a, false)]);
        assert_eq!(scores.len(), 2);
        let a_score = scores.iter().find(|s| s.skill_id == a).unwrap();
        assert_eq!(a_score.answered, 2);
        assert_eq!(a_score.raw_score, 50.0);
        let b_score = scores.iter().find(|s| s.skill_id == b).unwrap();
        assert_eq!(b_score.raw_score, 0.0);
    }
}
