//! Submission validation: the upstream guarantees the pipeline relies on.
//!
//! The pipeline itself never rejects input; everything that should be
//! rejected is rejected here, before any extraction or network work starts.

use bytes::Bytes;

use crate::errors::AppError;

/// Minimum words in a job description.
pub const MIN_JOB_DESCRIPTION_WORDS: usize = 50;
/// Default upload size limit (20 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

const PDF_CONTENT_TYPE: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF";

/// An uploaded resume file.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Raw submission fields as received from the client.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub job_description: String,
    pub job_title: String,
    pub company: String,
    pub resume: Option<UploadedFile>,
}

/// Whitespace-separated, non-empty tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Validates a submission. Returns the resume file on success.
pub fn validate_submission(
    submission: &Submission,
    max_upload_bytes: usize,
) -> Result<&UploadedFile, AppError> {
    if submission.company.trim().is_empty() {
        return Err(AppError::Validation("Company name is required.".to_string()));
    }
    if submission.job_title.trim().is_empty() {
        return Err(AppError::Validation("Job title is required.".to_string()));
    }
    if submission.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description is required.".to_string(),
        ));
    }

    let words = word_count(&submission.job_description);
    if words < MIN_JOB_DESCRIPTION_WORDS {
        return Err(AppError::Validation(format!(
            "Job description too short ({words} words). Please add at least {MIN_JOB_DESCRIPTION_WORDS} words."
        )));
    }

    let resume = submission.resume.as_ref().ok_or_else(|| {
        AppError::Validation("Please upload your resume as a PDF.".to_string())
    })?;

    if !is_pdf(resume) {
        return Err(AppError::Validation(
            "Only PDF files are accepted.".to_string(),
        ));
    }

    if resume.bytes.len() > max_upload_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "File is too large. Maximum size is {} MB.",
            max_upload_bytes / (1024 * 1024)
        )));
    }

    Ok(resume)
}

/// Accepts a declared PDF content type, or PDF magic bytes when the client sent none.
fn is_pdf(file: &UploadedFile) -> bool {
    match file.content_type.as_deref() {
        Some(ct) if ct.eq_ignore_ascii_case(PDF_CONTENT_TYPE) => true,
        Some("application/octet-stream") | None => file.bytes.starts_with(PDF_MAGIC),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn pdf() -> UploadedFile {
        UploadedFile {
            file_name: Some("resume.pdf".to_string()),
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from_static(b"%PDF-1.7\n..."),
        }
    }

    fn submission() -> Submission {
        Submission {
            job_description: words(60),
            job_title: "Data Engineer".to_string(),
            company: "Umbrella".to_string(),
            resume: Some(pdf()),
        }
    }

    fn validation_message(result: Result<&UploadedFile, AppError>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_word_count_ignores_extra_whitespace() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count(" one\ttwo\n\nthree  "), 3);
    }

    #[test]
    fn test_valid_submission_passes() {
        let s = submission();
        let file = validate_submission(&s, DEFAULT_MAX_UPLOAD_BYTES).unwrap();
        assert_eq!(file.file_name.as_deref(), Some("resume.pdf"));
    }

    #[test]
    fn test_required_fields() {
        let mut s = submission();
        s.company = "  ".to_string();
        assert_eq!(
            validation_message(validate_submission(&s, DEFAULT_MAX_UPLOAD_BYTES)),
            "Company name is required."
        );

        let mut s = submission();
        s.job_title.clear();
        assert_eq!(
            validation_message(validate_submission(&s, DEFAULT_MAX_UPLOAD_BYTES)),
            "Job title is required."
        );

        let mut s = submission();
        s.resume = None;
        assert_eq!(
            validation_message(validate_submission(&s, DEFAULT_MAX_UPLOAD_BYTES)),
            "Please upload your resume as a PDF."
        );
    }

    #[test]
    fn test_short_job_description_is_rejected_with_count() {
        let mut s = submission();
        s.job_description = words(49);
        assert_eq!(
            validation_message(validate_submission(&s, DEFAULT_MAX_UPLOAD_BYTES)),
            "Job description too short (49 words). Please add at least 50 words."
        );

        s.job_description = words(50);
        assert!(validate_submission(&s, DEFAULT_MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn test_non_pdf_content_type_is_rejected() {
        let mut s = submission();
        s.resume = Some(UploadedFile {
            content_type: Some("application/msword".to_string()),
            ..pdf()
        });
        assert_eq!(
            validation_message(validate_submission(&s, DEFAULT_MAX_UPLOAD_BYTES)),
            "Only PDF files are accepted."
        );
    }

    #[test]
    fn test_missing_content_type_falls_back_to_magic_bytes() {
        let mut s = submission();
        s.resume = Some(UploadedFile {
            content_type: None,
            ..pdf()
        });
        assert!(validate_submission(&s, DEFAULT_MAX_UPLOAD_BYTES).is_ok());

        s.resume = Some(UploadedFile {
            content_type: Some("application/octet-stream".to_string()),
            bytes: Bytes::from_static(b"PK\x03\x04 zip archive"),
            file_name: None,
        });
        assert!(validate_submission(&s, DEFAULT_MAX_UPLOAD_BYTES).is_err());
    }

    #[test]
    fn test_oversized_file_is_payload_too_large() {
        let s = submission();
        let err = validate_submission(&s, 4).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }
}
