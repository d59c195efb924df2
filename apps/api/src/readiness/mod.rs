// Readiness scoring: per-skill aggregation, the pure verdict scorer, and the
// service that persists a verdict onto an assessment.

pub mod handlers;
pub mod scorer;
pub mod service;
pub mod skill_scores;
