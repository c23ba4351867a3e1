//! Document text extraction.
//!
//! Sparse or unreadable documents are expected (scanned resumes, image-only
//! exports), so they come back as an `ExtractionWarning` carrying a sentinel
//! text instead of aborting the submission.

use std::panic;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Extracted text shorter than this is treated as a failed extraction.
pub const MIN_TEXT_CHARS: usize = 50;

pub const SPARSE_TEXT_SENTINEL: &str = "Resume text extraction limited. Please check file.";
pub const UNREADABLE_SENTINEL: &str = "Could not read file.";
/// Substituted when the extraction task itself dies.
pub const EXTRACTION_FAILED_PLACEHOLDER: &str = "[Could not extract PDF text]";

static WIDE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{3,}").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionWarning {
    #[error("extracted only {chars} characters (minimum {MIN_TEXT_CHARS})")]
    TooSparse { chars: usize },

    #[error("document could not be parsed: {0}")]
    Unreadable(String),
}

impl ExtractionWarning {
    /// The diagnostic text that stands in for the resume.
    pub fn sentinel(&self) -> &'static str {
        match self {
            ExtractionWarning::TooSparse { .. } => SPARSE_TEXT_SENTINEL,
            ExtractionWarning::Unreadable(_) => UNREADABLE_SENTINEL,
        }
    }
}

/// True if `text` is one of the diagnostic stand-ins rather than resume content.
pub fn is_sentinel(text: &str) -> bool {
    [
        SPARSE_TEXT_SENTINEL,
        UNREADABLE_SENTINEL,
        EXTRACTION_FAILED_PLACEHOLDER,
    ]
    .iter()
    .any(|s| text.starts_with(s))
}

/// Extracts plain text from PDF bytes, page by page.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionWarning> {
    // pdf-extract panics on some malformed font and stream tables.
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| ExtractionWarning::Unreadable("PDF parser panicked".to_string()))?
        .map_err(|e| ExtractionWarning::Unreadable(e.to_string()))?;
    normalize_pages(&pages)
}

/// Joins text runs with single spaces and pages with newlines, collapses wide
/// whitespace and applies the minimum-length check.
fn normalize_pages(pages: &[String]) -> Result<String, ExtractionWarning> {
    let joined = pages
        .iter()
        .map(|page| {
            page.lines()
                .map(str::trim)
                .filter(|run| !run.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n");

    let text = WIDE_WHITESPACE.replace_all(&joined, " ").trim().to_string();

    let chars = text.chars().count();
    if chars < MIN_TEXT_CHARS {
        return Err(ExtractionWarning::TooSparse { chars });
    }
    Ok(text)
}
