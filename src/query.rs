//! Translates free text plus optional filters into the platform's
//! search parameters.

use std::sync::OnceLock;

use regex::Regex;

use crate::constants::limits;
use crate::models::{SearchFilters, SearchKind};

/// Fully resolved parameter set for one outbound search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub kind: SearchKind,

    /// Free text merged with the kind-specific filter hints.
    pub query: String,

    /// Organisation searches only; sent as its own query parameter.
    pub country: Option<String>,

    /// Project searches only; sent as its own query parameter.
    pub project_type: Option<String>,

    pub limit: usize,
}

/// Builds the parameter set for `kind`. Infallible: absent filters simply
/// contribute nothing, and the limit is clamped to the platform maximum.
///
/// Organisation searches fold `activity_type` and `target_group` into the
/// query text; project searches fold in `theme` and `target_group`.
/// Country and project type stay separate because the platform filters on
/// them server-side.
#[must_use]
pub fn build_params(kind: SearchKind, text: &str, filters: &SearchFilters) -> SearchParams {
    let mut terms: Vec<&str> = vec![text];

    match kind {
        SearchKind::Organizations => {
            if let Some(activity) = filters.activity_type.as_deref() {
                terms.push(activity);
            }
            if let Some(group) = filters.target_group.as_deref() {
                terms.push(group);
            }
        }
        SearchKind::Projects => {
            if let Some(theme) = filters.theme.as_deref() {
                terms.push(theme);
            }
            if let Some(group) = filters.target_group.as_deref() {
                terms.push(group);
            }
        }
    }

    let query = terms
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    SearchParams {
        kind,
        query,
        country: match kind {
            SearchKind::Organizations => filters.country.clone(),
            SearchKind::Projects => None,
        },
        project_type: match kind {
            SearchKind::Projects => filters.project_type.clone(),
            SearchKind::Organizations => None,
        },
        limit: filters
            .max_results
            .unwrap_or(limits::DEFAULT_MAX_RESULTS)
            .min(limits::MAX_RESULTS),
    }
}

const EU_COUNTRIES: &[&str] = &[
    "germany",
    "france",
    "spain",
    "italy",
    "poland",
    "netherlands",
    "belgium",
    "greece",
    "portugal",
    "czech",
    "hungary",
    "sweden",
    "austria",
    "denmark",
    "finland",
    "ireland",
    "latvia",
    "lithuania",
    "luxembourg",
    "malta",
    "slovakia",
    "slovenia",
    "estonia",
    "croatia",
    "cyprus",
    "bulgaria",
    "romania",
];

fn ka_code_regex() -> Option<&'static Regex> {
    static INSTANCE: OnceLock<Option<Regex>> = OnceLock::new();
    INSTANCE
        .get_or_init(|| Regex::new(r"\bka\d{3}\b").ok())
        .as_ref()
}

/// Scans free text for filter hints: an EU country name, a KA action code,
/// a theme, and a target group. Returns a `SearchFilters` pre-fill with
/// only the recognised fields set; the caller decides whether to merge it.
#[must_use]
pub fn extract_filter_hints(text: &str) -> SearchFilters {
    let lower = text.to_lowercase();
    let mut filters = SearchFilters::default();

    if let Some(country) = EU_COUNTRIES.iter().find(|c| lower.contains(*c)) {
        filters.country = Some(titlecase(country));
    }

    if let Some(m) = ka_code_regex().and_then(|re| re.find(&lower)) {
        filters.project_type = Some(m.as_str().to_uppercase());
    }

    filters.theme = if contains_any(&lower, &["digital", "technology", "tech"]) {
        Some("Digital skills".to_string())
    } else if contains_any(&lower, &["environment", "green", "climate"]) {
        Some("Environment".to_string())
    } else if contains_any(&lower, &["inclusion", "inclusive", "disability"]) {
        Some("Social inclusion".to_string())
    } else {
        None
    };

    filters.target_group = if contains_any(&lower, &["youth worker", "trainer"]) {
        Some("Youth workers".to_string())
    } else if lower.contains("young people") {
        Some("Young people".to_string())
    } else if lower.contains("teacher") {
        Some("Teachers".to_string())
    } else {
        None
    };

    filters
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn titlecase(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}
