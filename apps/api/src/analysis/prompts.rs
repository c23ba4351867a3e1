// Prompt template for resume analysis.
// Truncation budgets are fixed cutoffs, not content-aware; golden outputs depend on them.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::analysis::models::AnalysisRequest;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// Maximum resume characters embedded in the prompt.
pub const RESUME_CHAR_BUDGET: usize = 5000;
/// Maximum job description characters embedded in the prompt.
pub const JOB_DESCRIPTION_CHAR_BUDGET: usize = 3500;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").unwrap());

/// Analysis prompt template.
/// Replace: {job_title}, {company}, {resume_text}, {job_description}, {json_only}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert ATS (Applicant Tracking System) analyst and career coach.
Analyze the following resume against the job description for a "{job_title}" role at "{company}".

RESUME CONTENT:
{resume_text}

JOB DESCRIPTION:
{job_description}

SCORING RULES:
1. Every score MUST reflect the actual resume content above. Do NOT use default, placeholder or generic values.
2. All scores are integers from 0 to 100.
3. "missingKeywords" MUST only contain keywords that appear in the job description but are absent from the resume.
4. "suggestedKeywords" are keywords from the job description worth featuring more prominently.
5. "issueCount" is the total number of concrete problems you found (a non-negative integer).

Return a JSON object with this EXACT schema (no extra fields):
{
  "overallScore": <integer 0-100>,
  "toneScore": <integer 0-100>,
  "contentScore": <integer 0-100>,
  "structureScore": <integer 0-100>,
  "skillsScore": <integer 0-100>,
  "atsScore": <integer 0-100>,
  "issueCount": <integer >= 0>,
  "atsBadgeType": "<good|warn|bad>",
  "atsChecks": [{ "icon": "<✅|⚠️|❌>", "text": "<specific ATS check result>" }],
  "missingKeywords": ["<keyword>"],
  "suggestedKeywords": ["<keyword>"],
  "sections": [
    {
      "name": "Tone & Style",
      "score": <integer 0-100>,
      "badge": "<Excellent|Strong|Good Start|Needs Work|Poor>",
      "badgeType": "<green|blue|orange|red>",
      "subChecks": [{ "icon": "<✅|⚠️|❌>", "label": "<check label>" }],
      "feedbackCards": [
        {
          "type": "<pass|warn|fail>",
          "title": "<title with emoji>",
          "body": "<explanation>",
          "bullets": ["<bullet>"],
          "chips": ["<chip>"]
        }
      ]
    },
    { "name": "Content", ...same fields as above },
    { "name": "Structure", ...same fields as above },
    { "name": "Skills", ...same fields as above }
  ]
}

"sections" MUST contain exactly four entries named "Tone & Style", "Content", "Structure" and "Skills", in that order, each with every field shown above.

{json_only}"#;

/// Builds the analysis prompt. Deterministic: the same request always yields the same text.
pub fn build_prompt(request: &AnalysisRequest) -> String {
    // Single pass, so placeholder-like text inside user input is never expanded.
    PLACEHOLDER
        .replace_all(ANALYSIS_PROMPT_TEMPLATE, |caps: &Captures| match &caps[1] {
            "job_title" => request.job_title.clone(),
            "company" => request.company.clone(),
            "resume_text" => truncate_chars(&request.resume_text, RESUME_CHAR_BUDGET).to_string(),
            "job_description" => {
                truncate_chars(&request.job_description, JOB_DESCRIPTION_CHAR_BUDGET).to_string()
            }
            "json_only" => JSON_ONLY_INSTRUCTION.to_string(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
