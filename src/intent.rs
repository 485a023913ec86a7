//! Keyword-based classification of free text into a search kind.

use serde::Serialize;

use crate::models::SearchKind;

/// Terms suggesting the user wants partner organisations.
const PARTNER_KEYWORDS: &[&str] = &[
    "partner",
    "organization",
    "ngo",
    "collaborator",
    "suitable",
    "who can help",
    "organizations in",
    "experience with",
];

/// Terms suggesting the user wants project postings.
const PROJECT_KEYWORDS: &[&str] = &[
    "project",
    "opportunity",
    "call",
    "deadline",
    "join",
    "participate",
    "ka152",
    "ka153",
    "ka210",
    "ka220",
    "looking for partners",
];

#[derive(Debug, Clone, Serialize)]
pub struct IntentAnalysis {
    pub intent: SearchKind,

    /// Smoothed ratio in [0, 1); fixed at 0.5 on a tie.
    pub confidence: f64,

    pub partner_score: usize,

    pub project_score: usize,

    pub explanation: String,
}

/// Scores `query` against both keyword lists and picks the winning kind.
///
/// Matching is substring-based on the lower-cased input, not tokenized, so
/// "partnership" counts as a "partner" hit. Ties (including empty input)
/// default to organisations at confidence 0.5. Never fails.
#[must_use]
pub fn analyze_intent(query: &str) -> IntentAnalysis {
    let lower = query.to_lowercase();

    let partner_score = count_hits(&lower, PARTNER_KEYWORDS);
    let project_score = count_hits(&lower, PROJECT_KEYWORDS);

    let (intent, confidence) = if project_score > partner_score {
        (SearchKind::Projects, smoothed(project_score, partner_score))
    } else if partner_score > project_score {
        (
            SearchKind::Organizations,
            smoothed(partner_score, project_score),
        )
    } else {
        (SearchKind::Organizations, 0.5)
    };

    IntentAnalysis {
        intent,
        confidence,
        partner_score,
        project_score,
        explanation: format!("Detected '{intent}' search based on keyword analysis"),
    }
}

fn count_hits(lower: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| lower.contains(*kw)).count()
}

#[allow(clippy::cast_precision_loss)]
fn smoothed(winner: usize, loser: usize) -> f64 {
    winner as f64 / (winner + loser + 1) as f64
}
