// Shared prompt fragments. Task-specific templates live in generation::prompts.

/// Appended to every generation prompt so the reply can be shown and downloaded as-is.
pub const PLAIN_TEXT_INSTRUCTION: &str = "\
    Respond with the requested text only. \
    Do NOT wrap it in markdown code fences. \
    Do NOT add commentary before or after it.";

/// Keeps generated content tied to what the applicant actually wrote.
pub const GROUNDING_INSTRUCTION: &str = "\
    Only use facts that appear in the resume. \
    Do NOT invent employers, dates, degrees, metrics or skills. \
    If the resume does not support a claim, leave it out.";
