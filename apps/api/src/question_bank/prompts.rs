// All LLM prompt constants for the Question Bank module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for bank question generation: enforces JSON-only output.
pub const QUESTION_BANK_SYSTEM: &str =
    "You are an instructional designer and workforce assessment specialist. \
    You write multiple-choice questions that measure whether a learner can perform a job, \
    not whether they memorized definitions. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences.";

/// Batch prompt template. Replace every `{placeholder}` before sending.
pub const QUESTION_BATCH_PROMPT_TEMPLATE: &str = r#"Generate {count} multiple-choice questions for the skill "{skill_name}" (category: {category}) at {difficulty} level.

OCCUPATION CONTEXT:
{job_context}

QUESTION RULES:
- Only assess the skill "{skill_name}". Do not test passive abilities such as reading comprehension or near vision.
- Each question tests applied understanding in the context of the occupation.
- Provide exactly 4 choices labeled A, B, C and D.
- Mark the correct answer by its label and explain it in one sentence.
- Every question must stand on its own so it can be reused in a randomized quiz rotation.
- {audience_instruction}

DO NOT REPEAT THESE EXISTING QUESTIONS:
{avoid_stems}

Return a JSON array with this EXACT schema (no extra fields):
[
  {
    "stem": "Question text here?",
    "choices": {"A": "Option A", "B": "Option B", "C": "Option C", "D": "Option D"},
    "correct_answer": "B",
    "explanation": "Why B is correct.",
    "difficulty": "{difficulty}"
  }
]"#;
