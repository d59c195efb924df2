// Question bank: batched generation of reusable per-skill questions,
// batch validation, and coverage stats.

pub mod builder;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod stats;
pub mod validation;
