//! Acceptance checks for generated batches, plus answer-key rotation.

use crate::llm_client::LlmError;
use crate::question_bank::generator::GeneratedQuestion;

const ANSWER_LABELS: [&str; 4] = ["A", "B", "C", "D"];

/// Checks a generated batch. Any malformed question rejects the whole batch.
/// Extra questions beyond `requested` are dropped.
pub fn validate_batch(
    mut batch: Vec<GeneratedQuestion>,
    requested: usize,
) -> Result<Vec<GeneratedQuestion>, LlmError> {
    if batch.is_empty() {
        return Err(LlmError::Malformed("generator returned no questions".to_string()));
    }

    for (i, q) in batch.iter_mut().enumerate() {
        q.correct_answer = normalize_answer_label(q);
        if q.stem.trim().is_empty() {
            return Err(LlmError::Malformed(format!("question {i} has an empty stem")));
        }
        if q.choices.len() < 2 {
            return Err(LlmError::Malformed(format!(
                "question {i} has {} choice(s), need at least 2",
                q.choices.len()
            )));
        }
        if !q.choices.contains_key(&q.correct_answer) {
            return Err(LlmError::Malformed(format!(
                "question {i} marks '{}' correct, which is not one of its choices",
                q.correct_answer
            )));
        }
    }

    batch.truncate(requested);
    Ok(batch)
}

/// Matches the answer label against the choice keys, tolerating stray
/// whitespace and lowercase letters. Unmatched labels come back trimmed.
fn normalize_answer_label(q: &GeneratedQuestion) -> String {
    let trimmed = q.correct_answer.trim();
    if q.choices.contains_key(trimmed) {
        return trimmed.to_string();
    }
    let upper = trimmed.to_uppercase();
    if q.choices.contains_key(&upper) {
        upper
    } else {
        trimmed.to_string()
    }
}

/// Spreads correct answers across A–D. Question `offset + i` gets label
/// `A,B,C,D[(offset + i) % 4]`, with choice texts swapped to match.
/// Questions whose choices do not carry the target label are left alone.
pub fn rotate_answer_keys(questions: &mut [GeneratedQuestion], offset: usize) {
    for (i, q) in questions.iter_mut().enumerate() {
        let target = ANSWER_LABELS[(offset + i) % ANSWER_LABELS.len()];
        if q.correct_answer == target {
            continue;
        }
        let correct_text = q.choices.get(&q.correct_answer).cloned();
        let target_text = q.choices.get(target).cloned();
        if let (Some(correct_text), Some(target_text)) = (correct_text, target_text) {
            q.choices.insert(q.correct_answer.clone(), target_text);
            q.choices.insert(target.to_string(), correct_text);
            q.correct_answer = target.to_string();
        }
    }
}
