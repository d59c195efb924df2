// Shared prompt fragments. Each service that needs LLM calls defines its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// Audience and tone rules appended to every assessment-content prompt.
pub const AUDIENCE_INSTRUCTION: &str = "\
    Questions will be taken by jobseekers, career changers, and upskilling employees. \
    Keep the reading level appropriate for a postsecondary audience (10th-12th grade). \
    Avoid jargon unless it is essential to the skill or occupation. \
    Be inclusive and culturally neutral.";
