use serde::{Deserialize, Serialize};

/// A partner organisation profile from the Otlas partner-finding tool.
///
/// Only constructed by the validator; the four required fields are
/// guaranteed non-empty and every string is trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerOrganization {
    pub name: String,

    pub country: String,

    /// NGO, school, public body, informal group, ...
    pub organization_type: String,

    /// Self-declared Erasmus+ experience level.
    pub experience_level: String,

    #[serde(default)]
    pub target_groups: Vec<String>,

    #[serde(default)]
    pub activity_types: Vec<String>,

    #[serde(default)]
    pub contact_info: String,

    /// Absolute URL to the organisation profile, empty when not linked.
    #[serde(default)]
    pub profile_url: String,

    pub last_active: Option<String>,
}
