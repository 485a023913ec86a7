use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{PartnerOrganization, ProjectOpportunity};
use crate::constants::platform;

/// Record category of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Organizations,
    Projects,
}

impl SearchKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Organizations => "organizations",
            Self::Projects => "projects",
        }
    }

    /// Marker substring counted in raw markup for the coarse result hint.
    #[must_use]
    pub const fn item_marker(self) -> &'static str {
        match self {
            Self::Organizations => platform::ORG_ITEM_MARKER,
            Self::Projects => platform::PROJECT_ITEM_MARKER,
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied filters for one search. Immutable per request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub query: String,

    pub country: Option<String>,

    /// Organisation searches only.
    pub activity_type: Option<String>,

    /// Project searches only.
    pub project_type: Option<String>,

    pub theme: Option<String>,

    pub target_group: Option<String>,

    /// Result cap; clamped to the platform maximum when building the request.
    pub max_results: Option<usize>,
}

impl SearchFilters {
    #[must_use]
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

/// Validated records of a single kind; the variant always matches the
/// response's `search_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchRecords {
    Organizations(Vec<PartnerOrganization>),
    Projects(Vec<ProjectOpportunity>),
}

impl SearchRecords {
    #[must_use]
    pub const fn empty(kind: SearchKind) -> Self {
        match kind {
            SearchKind::Organizations => Self::Organizations(Vec::new()),
            SearchKind::Projects => Self::Projects(Vec::new()),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> SearchKind {
        match self {
            Self::Organizations(_) => SearchKind::Organizations,
            Self::Projects(_) => SearchKind::Projects,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Organizations(items) => items.len(),
            Self::Projects(items) => items.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Uniform envelope returned by every pipeline invocation.
///
/// When `success` is false the record list is empty and `error_message`
/// carries the cause; the pipeline never surfaces failures any other way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub search_type: SearchKind,

    pub query_parameters: SearchFilters,

    /// Validated record count, i.e. `results.len()`.
    pub total_results: usize,

    /// Coarse upper-bound hint from marker counting on the raw markup.
    /// Independent of, and possibly larger than, `total_results`.
    pub total_found: usize,

    pub results: SearchRecords,

    /// RFC 3339 timestamp taken when the response was assembled.
    pub search_timestamp: String,

    pub success: bool,

    pub error_message: Option<String>,
}

impl SearchResponse {
    #[must_use]
    pub fn success(
        kind: SearchKind,
        filters: SearchFilters,
        total_found: usize,
        results: SearchRecords,
    ) -> Self {
        Self {
            search_type: kind,
            query_parameters: filters,
            total_results: results.len(),
            total_found,
            results,
            search_timestamp: Utc::now().to_rfc3339(),
            success: true,
            error_message: None,
        }
    }

    #[must_use]
    pub fn failure(kind: SearchKind, filters: SearchFilters, error: impl Into<String>) -> Self {
        Self {
            search_type: kind,
            query_parameters: filters,
            total_results: 0,
            total_found: 0,
            results: SearchRecords::empty(kind),
            search_timestamp: Utc::now().to_rfc3339(),
            success: false,
            error_message: Some(error.into()),
        }
    }
}
