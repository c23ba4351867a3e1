// Resume analysis: text extraction, prompt construction, LLM analysis with
// heuristic fallback, and the HTTP entry point.
// All LLM calls go through llm_client — no direct Gemini calls here.

pub mod extractor;
pub mod fallback;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod submission;
