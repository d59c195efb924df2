use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Difficulty tag of a bank question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Expert => "expert",
        }
    }

    /// Accepts the easy/medium/hard vocabulary as well as our own tags.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "beginner" | "easy" => Some(Difficulty::Beginner),
            "intermediate" | "medium" => Some(Difficulty::Intermediate),
            "expert" | "hard" | "advanced" => Some(Difficulty::Expert),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionRow {
    pub id: Uuid,
    pub skill_id: Uuid,
    pub stem: String,
    /// JSON object of choice label → choice text.
    pub choices: Value,
    pub answer_key: String,
    pub difficulty: String,
    pub explanation: Option<String>,
    pub is_bank_question: bool,
    pub times_used: i32,
    pub created_at: DateTime<Utc>,
}

/// A question accepted by the bank builder, not yet persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBankQuestion {
    pub skill_id: Uuid,
    pub stem: String,
    pub choices: BTreeMap<String, String>,
    pub answer_key: String,
    pub difficulty: Difficulty,
    pub explanation: Option<String>,
}
