//! Heuristic analyzer: deterministic, network-free critique used whenever the
//! generative service cannot produce a usable result.
//!
//! Scores are a fixed conservative baseline, not an estimate. Only the keyword
//! lists and a few feedback lines depend on the input.

use crate::analysis::models::{
    AnalysisRequest, AnalysisResult, AtsBadgeType, AtsCheck, BadgeType, CardType, FeedbackCard,
    Section, SubCheck,
};

/// Reference vocabulary matched against the job description and resume.
pub const REFERENCE_KEYWORDS: &[&str] = &[
    "JavaScript",
    "Python",
    "React",
    "Node.js",
    "SQL",
    "AWS",
    "Docker",
    "TypeScript",
    "API",
    "Git",
    "Agile",
    "Communication",
    "Leadership",
    "Problem-solving",
    "Teamwork",
    "Project management",
    "Analytics",
];

/// Appended to every fallback `missing_keywords` list.
pub const ALWAYS_MISSING: [&str; 2] = ["Stakeholder management", "Cross-functional"];

const MAX_KEYWORDS: usize = 8;
const MAX_VOCABULARY_MISSES: usize = MAX_KEYWORDS - ALWAYS_MISSING.len();

const OVERALL_SCORE: u8 = 72;
const TONE_SCORE: u8 = 65;
const CONTENT_SCORE: u8 = 58;
const STRUCTURE_SCORE: u8 = 78;
const SKILLS_SCORE: u8 = 60;
const ATS_SCORE: u8 = 72;
const ISSUE_COUNT: u32 = 14;

const PASS: &str = "✅";
const WARN: &str = "⚠️";
const FAIL: &str = "❌";

/// Keyword matches for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatches {
    /// Vocabulary terms in the job text but not the resume, in vocabulary order.
    pub missing: Vec<&'static str>,
    /// Vocabulary terms in the job text, in vocabulary order.
    pub present_in_job: Vec<&'static str>,
}

/// Case-insensitive substring matching of the reference vocabulary.
pub fn match_keywords(job_description: &str, resume_text: &str) -> KeywordMatches {
    let jd_lower = job_description.to_lowercase();
    let resume_lower = resume_text.to_lowercase();

    let present_in_job: Vec<&'static str> = REFERENCE_KEYWORDS
        .iter()
        .copied()
        .filter(|kw| jd_lower.contains(&kw.to_lowercase()))
        .collect();

    let missing = present_in_job
        .iter()
        .copied()
        .filter(|kw| !resume_lower.contains(&kw.to_lowercase()))
        .collect();

    KeywordMatches {
        missing,
        present_in_job,
    }
}

/// Produces the fallback critique. Pure: identical requests yield identical results.
pub fn analyze_locally(request: &AnalysisRequest) -> AnalysisResult {
    let matches = match_keywords(&request.job_description, &request.resume_text);

    let missing_keywords: Vec<String> = matches
        .missing
        .iter()
        .take(MAX_VOCABULARY_MISSES)
        .chain(ALWAYS_MISSING.iter())
        .map(|kw| kw.to_string())
        .collect();

    let suggested_keywords: Vec<String> = matches
        .present_in_job
        .iter()
        .take(MAX_KEYWORDS)
        .map(|kw| kw.to_string())
        .collect();

    AnalysisResult {
        overall_score: OVERALL_SCORE,
        tone_score: TONE_SCORE,
        content_score: CONTENT_SCORE,
        structure_score: STRUCTURE_SCORE,
        skills_score: SKILLS_SCORE,
        ats_score: ATS_SCORE,
        issue_count: ISSUE_COUNT,
        ats_badge_type: AtsBadgeType::Warn,
        ats_checks: ats_checks(),
        missing_keywords,
        suggested_keywords,
        sections: vec![
            tone_section(),
            content_section(&request.job_title, &request.company),
            structure_section(),
            skills_section(&matches.missing),
        ],
    }
}

fn ats_checks() -> Vec<AtsCheck> {
    [
        (PASS, "Readable formatting detected — no tables or complex layouts blocking ATS"),
        (WARN, "Some keywords from the job description are missing from your resume"),
        (WARN, "Skills section needs to be more prominent and specific"),
        (PASS, "Contact information appears to be present"),
        (FAIL, "No quantifiable achievements detected — add metrics and numbers"),
    ]
    .into_iter()
    .map(|(icon, text)| AtsCheck {
        icon: icon.to_string(),
        text: text.to_string(),
    })
    .collect()
}

fn sub_checks(checks: &[(&str, &str)]) -> Vec<SubCheck> {
    checks
        .iter()
        .map(|(icon, label)| SubCheck {
            icon: icon.to_string(),
            label: label.to_string(),
        })
        .collect()
}

fn card(card_type: CardType, title: &str, body: &str) -> FeedbackCard {
    FeedbackCard {
        card_type,
        title: title.to_string(),
        body: Some(body.to_string()),
        bullets: vec![],
        chips: vec![],
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn tone_section() -> Section {
    Section {
        name: "Tone & Style".to_string(),
        score: TONE_SCORE,
        badge: "Good Start".to_string(),
        badge_type: BadgeType::Blue,
        sub_checks: sub_checks(&[
            (PASS, "Professional Tone"),
            (WARN, "Consistent Voice"),
            (WARN, "Active Language"),
            (PASS, "Concise Writing"),
        ]),
        feedback_cards: vec![
            card(
                CardType::Pass,
                "✅ Professional Tone — Good overall",
                "Your resume maintains a professional tone. Recruiters will find it readable and appropriate for the role.",
            ),
            FeedbackCard {
                bullets: strings(&[
                    "Instead of: \"Was responsible for managing...\"",
                    "Try: \"Led and managed a team of...\"",
                ]),
                chips: strings(&["Led", "Built", "Delivered", "Achieved", "Drove"]),
                ..card(
                    CardType::Warn,
                    "⚠️ Use Active Language — Replace passive phrases",
                    "Switch from passive to active voice to sound more impactful:",
                )
            },
        ],
    }
}

fn content_section(job_title: &str, company: &str) -> Section {
    Section {
        name: "Content".to_string(),
        score: CONTENT_SCORE,
        badge: "Needs Work".to_string(),
        badge_type: BadgeType::Orange,
        sub_checks: sub_checks(&[
            (WARN, "Quantify Impact"),
            (WARN, "Tailor to Role"),
            (PASS, "Avoid Fluff"),
            (WARN, "Action Verbs"),
        ]),
        feedback_cards: vec![
            FeedbackCard {
                bullets: strings(&[
                    "Instead of: \"Managed a team of developers\"",
                    "Try: \"Led a team of 5 developers to ship 3 features, reducing load time by 40%\"",
                ]),
                ..card(
                    CardType::Warn,
                    "⚠️ Quantify Your Impact — Add numbers & metrics",
                    "Vague statements are the #1 weakness ATS and recruiters flag:",
                )
            },
            FeedbackCard {
                bullets: strings(&[
                    "Add responsibilities that match the JD",
                    "Include specific tools/technologies mentioned",
                ]),
                ..card(
                    CardType::Warn,
                    "⚠️ Tailor to Role — Add job-specific content",
                    &format!(
                        "Your resume needs to speak more directly to the {job_title} role at {company}."
                    ),
                )
            },
        ],
    }
}

fn structure_section() -> Section {
    Section {
        name: "Structure".to_string(),
        score: STRUCTURE_SCORE,
        badge: "Strong".to_string(),
        badge_type: BadgeType::Green,
        sub_checks: sub_checks(&[
            (PASS, "Clear Sections"),
            (PASS, "Reverse Chronological"),
            (WARN, "Complete Contact Info"),
            (PASS, "Consistent Formatting"),
        ]),
        feedback_cards: vec![
            card(
                CardType::Pass,
                "✅ Well Structured — Clear section hierarchy",
                "Your resume has clear, logical sections. This is exactly what ATS systems and human recruiters look for.",
            ),
            card(
                CardType::Warn,
                "⚠️ Complete Contact Info — Add LinkedIn & GitHub",
                "For tech roles, recruiters almost always check LinkedIn and GitHub. Add these to your header.",
            ),
        ],
    }
}

fn skills_section(missing: &[&str]) -> Section {
    Section {
        name: "Skills".to_string(),
        score: SKILLS_SCORE,
        badge: "Needs Work".to_string(),
        badge_type: BadgeType::Orange,
        sub_checks: sub_checks(&[
            (WARN, "Job-Matching Keywords"),
            (WARN, "Specific Technologies"),
            (PASS, "Relevant Skills Listed"),
            (WARN, "No Outdated Technologies"),
        ]),
        feedback_cards: vec![
            FeedbackCard {
                bullets: missing.iter().take(4).map(|kw| format!("Add: {kw}")).collect(),
                chips: missing.iter().take(5).map(|kw| kw.to_string()).collect(),
                ..card(
                    CardType::Warn,
                    "⚠️ Missing Job Keywords — Add role-specific skills",
                    "The following skills appear in the job description but are absent from your resume:",
                )
            },
            FeedbackCard {
                bullets: strings(&[
                    "Instead of: \"Good communication\"",
                    "Try: \"Client communication via Slack, Zoom, and Jira in Agile teams\"",
                ]),
                ..card(
                    CardType::Warn,
                    "⚠️ Be Specific — Replace vague skill descriptions",
                    "Vague skills hurt your ATS score:",
                )
            },
        ],
    }
}
