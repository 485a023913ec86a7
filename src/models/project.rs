use serde::{Deserialize, Serialize};

/// A project posting looking for partners.
///
/// `title` and `project_type` are guaranteed non-empty after validation.
/// `description` is already capped at 500 characters by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectOpportunity {
    pub title: String,

    /// Erasmus+ action code (KA152, KA210, ...).
    pub project_type: String,

    #[serde(default)]
    pub countries_involved: Vec<String>,

    /// Application deadline as displayed on the page; format not enforced.
    pub deadline: Option<String>,

    #[serde(default)]
    pub target_groups: Vec<String>,

    #[serde(default)]
    pub themes: Vec<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub contact_organization: String,

    #[serde(default)]
    pub project_url: String,

    #[serde(default)]
    pub created_date: String,
}
