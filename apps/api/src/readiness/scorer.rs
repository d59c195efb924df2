//! Readiness Scorer: turns per-skill results into a role-readiness verdict.
//!
//! Pure: no I/O, no clock, no randomness. The same input always yields the
//! same verdict, so callers may score previews as often as they like.
//!
//! Overall proficiency is the unweighted mean of achieved percentages.
//! Importance only decides how a gap is reported (critical gap vs development
//! area), never how much a skill counts toward the overall number.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::skill::ImportanceLevel;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessConfig {
    /// Threshold used when neither the skill nor the role sets one.
    pub default_required: f64,
    /// Points above required needed for `Exceeds` / `Highly Qualified`.
    pub exceeds_margin: f64,
    /// Width of the band below required that still counts as `Developing`.
    pub developing_band: f64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            default_required: 90.0,
            exceeds_margin: 5.0,
            developing_band: 15.0,
        }
    }
}

/// One assessed skill as input to the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillResult {
    pub skill_id: Uuid,
    pub skill_name: String,
    pub importance: ImportanceLevel,
    /// Achieved percent, 0–100.
    pub achieved: f64,
    /// Required percent for this skill; the role threshold applies when unset.
    #[serde(default)]
    pub required: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillStatus {
    Exceeds,
    Meets,
    Developing,
    Gap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessLevel {
    #[serde(rename = "Not Ready")]
    NotReady,
    Developing,
    Ready,
    #[serde(rename = "Highly Qualified")]
    HighlyQualified,
}

impl ReadinessLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ReadinessLevel::NotReady => "Not Ready",
            ReadinessLevel::Developing => "Developing",
            ReadinessLevel::Ready => "Ready",
            ReadinessLevel::HighlyQualified => "Highly Qualified",
        }
    }
}

impl fmt::Display for ReadinessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillProficiency {
    pub skill_id: Uuid,
    pub skill_name: String,
    pub importance: ImportanceLevel,
    pub current_level: f64,
    pub required_level: f64,
    /// `max(0, required - current)`
    pub gap: f64,
    pub status: SkillStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessVerdict {
    pub overall_proficiency: f64,
    pub role_threshold: f64,
    pub readiness: ReadinessLevel,
    pub skill_proficiencies: Vec<SkillProficiency>,
    /// Exceeds/Meets skills, highest achieved first.
    pub strength_areas: Vec<String>,
    /// Developing skills, plus gaps in non-critical skills.
    pub development_areas: Vec<String>,
    /// Gaps in critical skills.
    pub critical_gaps: Vec<String>,
    pub next_steps: Vec<String>,
    pub estimated_time_to_ready: String,
}

/// Classifies one skill against its required level.
pub fn skill_status(achieved: f64, required: f64, config: &ReadinessConfig) -> SkillStatus {
    if achieved >= required + config.exceeds_margin {
        SkillStatus::Exceeds
    } else if achieved >= required {
        SkillStatus::Meets
    } else if achieved >= required - config.developing_band {
        SkillStatus::Developing
    } else {
        SkillStatus::Gap
    }
}

/// Maps overall proficiency to a readiness label against the role threshold.
pub fn readiness_level(overall: f64, threshold: f64, config: &ReadinessConfig) -> ReadinessLevel {
    if overall >= threshold + config.exceeds_margin {
        ReadinessLevel::HighlyQualified
    } else if overall >= threshold {
        ReadinessLevel::Ready
    } else if overall >= threshold - config.developing_band {
        ReadinessLevel::Developing
    } else {
        ReadinessLevel::NotReady
    }
}

/// Rejects results a verdict cannot be computed from.
pub fn validate_results(results: &[SkillResult]) -> Result<(), AppError> {
    if results.is_empty() {
        return Err(AppError::Validation(
            "At least one skill result is required".to_string(),
        ));
    }
    for r in results {
        let in_range = |v: f64| v.is_finite() && (0.0..=100.0).contains(&v);
        if !in_range(r.achieved) {
            return Err(AppError::Validation(format!(
                "Achieved percent for '{}' must be within 0-100, got {}",
                r.skill_name, r.achieved
            )));
        }
        if let Some(required) = r.required {
            if !in_range(required) {
                return Err(AppError::Validation(format!(
                    "Required percent for '{}' must be within 0-100, got {required}",
                    r.skill_name
                )));
            }
        }
    }
    Ok(())
}

/// Scores a completed assessment.
///
/// `role_threshold` is the role's required proficiency; `config.default_required`
/// applies when it is `None`. An empty result set scores 0 and `Not Ready`.
pub fn score_readiness(
    results: &[SkillResult],
    role_threshold: Option<f64>,
    config: &ReadinessConfig,
) -> ReadinessVerdict {
    let threshold = role_threshold.unwrap_or(config.default_required);

    let skill_proficiencies: Vec<SkillProficiency> = results
        .iter()
        .map(|r| {
            let required = r.required.unwrap_or(threshold);
            SkillProficiency {
                skill_id: r.skill_id,
                skill_name: r.skill_name.clone(),
                importance: r.importance,
                current_level: r.achieved,
                required_level: required,
                gap: (required - r.achieved).max(0.0),
                status: skill_status(r.achieved, required, config),
            }
        })
        .collect();

    let overall_proficiency = if results.is_empty() {
        0.0
    } else {
        results.iter().map(|r| r.achieved).sum::<f64>() / results.len() as f64
    };

    let mut strengths: Vec<&SkillProficiency> = skill_proficiencies
        .iter()
        .filter(|s| matches!(s.status, SkillStatus::Exceeds | SkillStatus::Meets))
        .collect();
    strengths.sort_by(|a, b| b.current_level.total_cmp(&a.current_level));
    let strength_areas = strengths.iter().map(|s| s.skill_name.clone()).collect();

    let critical: Vec<&SkillProficiency> = skill_proficiencies
        .iter()
        .filter(|s| s.status == SkillStatus::Gap && s.importance == ImportanceLevel::Critical)
        .collect();
    let critical_gaps: Vec<String> = critical.iter().map(|s| s.skill_name.clone()).collect();

    let development_areas = skill_proficiencies
        .iter()
        .filter(|s| match s.status {
            SkillStatus::Developing => true,
            SkillStatus::Gap => s.importance != ImportanceLevel::Critical,
            _ => false,
        })
        .map(|s| s.skill_name.clone())
        .collect();

    let mut next_steps: Vec<String> = critical
        .iter()
        .map(|s| {
            format!(
                "Focus your study on {}: you scored {:.0}% against a required {:.0}%.",
                s.skill_name, s.current_level, s.required_level
            )
        })
        .collect();
    if overall_proficiency < threshold {
        next_steps.push(format!(
            "Retake the assessment once your overall proficiency ({overall_proficiency:.0}%) \
            can reach the {threshold:.0}% role threshold."
        ));
    }

    let estimated_time_to_ready =
        estimate_time_to_ready(overall_proficiency, threshold, critical.len(), config);

    ReadinessVerdict {
        overall_proficiency,
        role_threshold: threshold,
        readiness: readiness_level(overall_proficiency, threshold, config),
        skill_proficiencies,
        strength_areas,
        development_areas,
        critical_gaps,
        next_steps,
        estimated_time_to_ready,
    }
}

fn estimate_time_to_ready(
    overall: f64,
    threshold: f64,
    critical_gap_count: usize,
    config: &ReadinessConfig,
) -> String {
    let band = config.developing_band;
    if overall >= threshold {
        "Role-ready now".to_string()
    } else if overall >= threshold - band && critical_gap_count == 0 {
        "1-3 months with focused learning".to_string()
    } else if overall >= threshold - 2.0 * band {
        "3-6 months with structured training".to_string()
    } else {
        "6-12 months with comprehensive education program".to_string()
    }
}
