//! Question generation: pluggable, trait-based source of candidate bank questions.
//!
//! Default: `LlmQuestionGenerator`, backed by the shared chat-completion client.
//! `AppState` holds an `Arc<dyn QuestionGenerator>`, so tests can script the
//! generator without a network.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::llm_client::prompts::AUDIENCE_INSTRUCTION;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::question::Difficulty;
use crate::question_bank::prompts::{QUESTION_BANK_SYSTEM, QUESTION_BATCH_PROMPT_TEMPLATE};

/// Sampling temperature for question writing. Higher than scoring-style calls
/// so re-generated banks do not converge on the same stems.
const GENERATION_TEMPERATURE: f32 = 0.7;

/// One batch request for a single skill.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionBatchRequest {
    pub skill_name: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub job_context: String,
    pub count: usize,
    /// Stems already accepted for this skill. A hint to the generator only;
    /// nothing downstream enforces uniqueness.
    pub avoid_stems: Vec<String>,
}

/// A candidate question exactly as the generator returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub stem: String,
    pub choices: BTreeMap<String, String>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub difficulty: String,
}

#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate_batch(
        &self,
        request: &QuestionBatchRequest,
    ) -> Result<Vec<GeneratedQuestion>, LlmError>;
}

pub struct LlmQuestionGenerator(pub LlmClient);

#[async_trait]
impl QuestionGenerator for LlmQuestionGenerator {
    async fn generate_batch(
        &self,
        request: &QuestionBatchRequest,
    ) -> Result<Vec<GeneratedQuestion>, LlmError> {
        let prompt = build_batch_prompt(request);
        self.0
            .call_json(&prompt, QUESTION_BANK_SYSTEM, GENERATION_TEMPERATURE)
            .await
    }
}

/// Fills the batch template for one request.
fn build_batch_prompt(request: &QuestionBatchRequest) -> String {
    let avoid_stems = if request.avoid_stems.is_empty() {
        "(none yet)".to_string()
    } else {
        request
            .avoid_stems
            .iter()
            .map(|s| format!("- {s}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    QUESTION_BATCH_PROMPT_TEMPLATE
        .replace("{count}", &request.count.to_string())
        .replace("{skill_name}", &request.skill_name)
        .replace("{category}", &request.category)
        .replace("{difficulty}", request.difficulty.as_str())
        .replace("{job_context}", &request.job_context)
        .replace("{audience_instruction}", AUDIENCE_INSTRUCTION)
        .replace("{avoid_stems}", &avoid_stems)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(avoid: Vec<String>) -> QuestionBatchRequest {
        QuestionBatchRequest {
            skill_name: "Electrical Wiring".to_string(),
            category: "Technical".to_string(),
            difficulty: Difficulty::Expert,
            job_context: "Electrician (47-2111.00): installs and maintains wiring".to_string(),
            count: 3,
            avoid_stems: avoid,
        }
    }

    #[test]
    fn test_prompt_has_no_unfilled_placeholders() {
        let prompt = build_batch_prompt(&request(vec![]));
        for placeholder in [
            "{count}",
            "{skill_name}",
            "{category}",
            "{difficulty}",
            "{job_context}",
            "{audience_instruction}",
            "{avoid_stems}",
        ] {
            assert!(!prompt.contains(placeholder), "{placeholder} left in prompt");
        }
        assert!(prompt.contains("Generate 3 multiple-choice questions"));
        assert!(prompt.contains("\"difficulty\": \"expert\""));
    }

    #[test]
    fn test_prompt_lists_stems_to_avoid() {
        let prompt = build_batch_prompt(&request(vec![
            "What gauge wire suits a 20A circuit?".to_string(),
        ]));
        assert!(prompt.contains("- What gauge wire suits a 20A circuit?"));
        assert!(!prompt.contains("(none yet)"));
    }

    #[test]
    fn test_generated_question_deserializes_without_optional_fields() {
        let json = r#"[{
            "stem": "Which breaker protects a kitchen circuit?",
            "choices": {"A": "GFCI", "B": "AFCI", "C": "Standard", "D": "None"},
            "correct_answer": "A"
        }]"#;
        let parsed: Vec<GeneratedQuestion> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed[0].choices.len(), 4);
        assert!(parsed[0].explanation.is_none());
        assert!(parsed[0].difficulty.is_empty());
    }

    #[test]
    fn test_generated_question_requires_answer() {
        let json = r#"[{"stem": "Q?", "choices": {"A": "x"}}]"#;
        let parsed: Result<Vec<GeneratedQuestion>, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }
}
