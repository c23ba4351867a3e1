// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it;
// this file holds the cross-cutting pieces.

/// Closing instruction that enforces JSON-only output.
/// Gemini has no separate system prompt on this endpoint, so it is appended to the user prompt.
pub const JSON_ONLY_INSTRUCTION: &str = "Be specific and genuine. \
    Return ONLY the JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences or backticks. \
    Do NOT include explanations or apologies.";
