//! Analysis data model shared by the external model path and the local fallback.
//!
//! Field names serialize in camelCase: the same document is requested from the
//! model and handed to the UI.

use serde::{Deserialize, Serialize};

/// Section names, in the only order a result may carry them.
pub const SECTION_NAMES: [&str; 4] = ["Tone & Style", "Content", "Structure", "Skills"];

/// One submission's input to the pipeline. Consumed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub resume_text: String,
    pub job_description: String,
    pub job_title: String,
    pub company: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AtsBadgeType {
    Good,
    Warn,
    Bad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeType {
    Green,
    Blue,
    Orange,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtsCheck {
    pub icon: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCheck {
    pub icon: String,
    pub label: String,
}

/// One feedback card. The only fields allowed to be absent in model output
/// are `body` and the `bullets`/`chips` lists, which default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackCard {
    #[serde(rename = "type")]
    pub card_type: CardType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub chips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub name: String,
    pub score: u8,
    pub badge: String,
    pub badge_type: BadgeType,
    pub sub_checks: Vec<SubCheck>,
    pub feedback_cards: Vec<FeedbackCard>,
}

/// The scored critique. Structurally identical whichever path produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_score: u8,
    pub tone_score: u8,
    pub content_score: u8,
    pub structure_score: u8,
    pub skills_score: u8,
    pub ats_score: u8,
    pub issue_count: u32,
    pub ats_badge_type: AtsBadgeType,
    pub ats_checks: Vec<AtsCheck>,
    pub missing_keywords: Vec<String>,
    pub suggested_keywords: Vec<String>,
    pub sections: Vec<Section>,
}

impl AnalysisResult {
    /// Checks the structural invariants serde cannot express: score ranges and
    /// the fixed four-section layout. Empty lists are accepted.
    pub fn validate_structure(&self) -> Result<(), String> {
        let scores = [
            ("overallScore", self.overall_score),
            ("toneScore", self.tone_score),
            ("contentScore", self.content_score),
            ("structureScore", self.structure_score),
            ("skillsScore", self.skills_score),
            ("atsScore", self.ats_score),
        ];
        for (field, score) in scores {
            if score > 100 {
                return Err(format!("{field} out of range: {score}"));
            }
        }

        if self.sections.len() != SECTION_NAMES.len() {
            return Err(format!(
                "expected {} sections, got {}",
                SECTION_NAMES.len(),
                self.sections.len()
            ));
        }

        for (section, expected) in self.sections.iter().zip(SECTION_NAMES) {
            if section.name != expected {
                return Err(format!(
                    "expected section '{expected}', got '{}'",
                    section.name
                ));
            }
            if section.score > 100 {
                return Err(format!(
                    "section '{}' score out of range: {}",
                    section.name, section.score
                ));
            }
        }

        Ok(())
    }
}

/// Display label for a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBadge {
    pub label: &'static str,
    pub badge_type: BadgeType,
}

pub fn badge_for_score(score: u8) -> ScoreBadge {
    let (label, badge_type) = match score {
        80.. => ("Excellent", BadgeType::Green),
        65..=79 => ("Strong", BadgeType::Green),
        50..=64 => ("Good Start", BadgeType::Blue),
        35..=49 => ("Needs Work", BadgeType::Orange),
        _ => ("Poor", BadgeType::Red),
    };
    ScoreBadge { label, badge_type }
}
