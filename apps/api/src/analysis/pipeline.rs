//! Analysis pipeline: the single entry point the HTTP layer calls.
//!
//! Flow: extract text → build prompt → LLM analyze → (on any error) heuristic fallback.
//!
//! Never fails. Extraction problems substitute a sentinel text, model problems
//! substitute the local analysis, and the caller learns which path ran from
//! `AnalysisOutcome`.

use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::extractor::{extract_text, is_sentinel, EXTRACTION_FAILED_PLACEHOLDER};
use crate::analysis::fallback::analyze_locally;
use crate::analysis::models::{AnalysisRequest, AnalysisResult};
use crate::analysis::prompts::build_prompt;
use crate::llm_client::LlmClient;

/// Which path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    External,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// The generative service returned a usable result.
    External(AnalysisResult),
    /// The service failed; `reason` is the error that triggered the fallback.
    Fallback {
        result: AnalysisResult,
        reason: String,
    },
}

impl AnalysisOutcome {
    pub fn result(&self) -> &AnalysisResult {
        match self {
            AnalysisOutcome::External(result) => result,
            AnalysisOutcome::Fallback { result, .. } => result,
        }
    }

    pub fn into_result(self) -> AnalysisResult {
        match self {
            AnalysisOutcome::External(result) => result,
            AnalysisOutcome::Fallback { result, .. } => result,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, AnalysisOutcome::Fallback { .. })
    }

    pub fn source(&self) -> ResultSource {
        match self {
            AnalysisOutcome::External(_) => ResultSource::External,
            AnalysisOutcome::Fallback { .. } => ResultSource::Fallback,
        }
    }
}

/// Runs the full analysis for one submission.
///
/// Steps:
/// 1. extract resume text on the blocking pool (sentinel on warning, placeholder on panic)
/// 2. build_prompt() over the extracted text
/// 3. llm.analyze() → External
/// 4. on any LlmError → analyze_locally() → Fallback
pub async fn run_analysis(
    llm: &LlmClient,
    document: Bytes,
    job_description: &str,
    job_title: &str,
    company: &str,
) -> AnalysisOutcome {
    let resume_text = extract_resume_text(document).await;

    let request = AnalysisRequest {
        resume_text,
        job_description: job_description.to_string(),
        job_title: job_title.to_string(),
        company: company.to_string(),
    };

    analyze_request(llm, &request).await
}

/// Steps 2–4 of [`run_analysis`] over already-extracted text.
pub async fn analyze_request(llm: &LlmClient, request: &AnalysisRequest) -> AnalysisOutcome {
    if is_sentinel(&request.resume_text) {
        warn!("Analyzing without resume content: {}", request.resume_text);
    }
    let prompt = build_prompt(request);

    match llm.analyze(&prompt).await {
        Ok(result) => {
            info!(
                "Analysis complete via {}: overall score {}/100",
                llm.model(),
                result.overall_score
            );
            AnalysisOutcome::External(result)
        }
        Err(e) => {
            warn!("AI analysis failed, showing estimated results: {e}");
            AnalysisOutcome::Fallback {
                result: analyze_locally(request),
                reason: e.to_string(),
            }
        }
    }
}

async fn extract_resume_text(document: Bytes) -> String {
    let size = document.len();
    match tokio::task::spawn_blocking(move || extract_text(&document)).await {
        Ok(Ok(text)) => {
            info!("Extracted {} chars from {size}-byte document", text.chars().count());
            text
        }
        Ok(Err(warning)) => {
            warn!("PDF extraction returned limited text: {warning}");
            warning.sentinel().to_string()
        }
        Err(e) => {
            warn!("PDF extraction task failed: {e}");
            EXTRACTION_FAILED_PLACEHOLDER.to_string()
        }
    }
}
