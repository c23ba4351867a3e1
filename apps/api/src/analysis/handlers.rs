//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::analysis::models::{badge_for_score, AnalysisResult, ScoreBadge};
use crate::analysis::pipeline::{run_analysis, ResultSource};
use crate::analysis::submission::{validate_submission, Submission, UploadedFile};
use crate::errors::AppError;
use crate::state::AppState;

/// Shown to the user when the result came from the local fallback.
pub const FALLBACK_NOTICE: &str = "AI connection issue. Showing estimated results.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub source: ResultSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
    pub overall_badge: ScoreBadge,
    pub result: AnalysisResult,
}

/// POST /api/v1/analyses
///
/// Multipart fields: `resume` (PDF file), `job_description`, `job_title`, `company`.
/// Always answers 200 once the submission validates; service degradation is
/// reported through `source` and `notice`, never as an error status.
pub async fn handle_create_analysis(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let submission = read_submission(multipart).await?;
    let resume = validate_submission(&submission, state.config.max_upload_bytes)?;

    let analysis_id = Uuid::new_v4();
    info!(
        "Analysis {analysis_id}: {} ({} bytes) for '{}' at '{}'",
        resume.file_name.as_deref().unwrap_or("<unnamed>"),
        resume.bytes.len(),
        submission.job_title,
        submission.company
    );

    let outcome = run_analysis(
        &state.llm,
        resume.bytes.clone(),
        &submission.job_description,
        &submission.job_title,
        &submission.company,
    )
    .await;

    let source = outcome.source();
    let notice = outcome.is_fallback().then_some(FALLBACK_NOTICE);
    let overall_badge = badge_for_score(outcome.result().overall_score);

    Ok(Json(AnalysisResponse {
        analysis_id,
        analyzed_at: Utc::now(),
        source,
        notice,
        overall_badge,
        result: outcome.into_result(),
    }))
}

/// Collects the known multipart fields; unknown fields are ignored.
async fn read_submission(mut multipart: Multipart) -> Result<Submission, AppError> {
    let mut submission = Submission::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                submission.resume = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            "job_description" => submission.job_description = field.text().await?,
            "job_title" => submission.job_title = field.text().await?.trim().to_string(),
            "company" => submission.company = field.text().await?.trim().to_string(),
            _ => {}
        }
    }

    Ok(submission)
}
