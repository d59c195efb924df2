use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Role-specific importance of a skill. Ordering is priority order:
/// `Critical < Important < Helpful`, so an ascending sort puts critical first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportanceLevel {
    Critical,
    Important,
    Helpful,
}

impl ImportanceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportanceLevel::Critical => "critical",
            ImportanceLevel::Important => "important",
            ImportanceLevel::Helpful => "helpful",
        }
    }

    /// Only critical and important skills are sampled into assessments.
    pub fn is_assessed(&self) -> bool {
        matches!(self, ImportanceLevel::Critical | ImportanceLevel::Important)
    }
}

impl fmt::Display for ImportanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportanceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Ok(ImportanceLevel::Critical),
            "important" => Ok(ImportanceLevel::Important),
            "helpful" => Ok(ImportanceLevel::Helpful),
            other => Err(format!("unknown importance level '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoleRow {
    pub id: Uuid,
    pub title: String,
    pub occupation_code: String,
    pub description: Option<String>,
    /// Role-wide required proficiency percent. Falls back to the configured default.
    pub required_proficiency: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Raw join row of `role_skills` and `skills`. Converted into [`RoleSkill`]
/// once the importance text is parsed.
#[derive(Debug, Clone, FromRow)]
pub struct RoleSkillRow {
    pub role_id: Uuid,
    pub skill_id: Uuid,
    pub name: String,
    pub category: String,
    pub importance_level: String,
    pub weight: f64,
    pub proficiency_threshold: Option<f64>,
}

/// A skill in the context of one role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleSkill {
    pub skill_id: Uuid,
    pub name: String,
    pub category: String,
    pub importance: ImportanceLevel,
    pub weight: f64,
    pub proficiency_threshold: Option<f64>,
}

impl TryFrom<RoleSkillRow> for RoleSkill {
    type Error = String;

    fn try_from(row: RoleSkillRow) -> Result<Self, Self::Error> {
        Ok(RoleSkill {
            skill_id: row.skill_id,
            name: row.name,
            category: row.category,
            importance: row.importance_level.parse()?,
            weight: row.weight,
            proficiency_threshold: row.proficiency_threshold,
        })
    }
}
