//! Selector-driven extraction of raw records from Otlas search markup.
//!
//! Each kind has a fixed rule table mapping field names to CSS selectors,
//! so adding a field is a data change rather than new control flow.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::constants::{limits, platform};
use crate::models::{RawRecord, SearchKind};

#[derive(Debug, Clone, Copy)]
enum ExtractMode {
    /// Trimmed text of the first matching element, empty when absent.
    Text,

    /// As `Text`, hard-cut to the given number of characters.
    TruncatedText(usize),

    /// Trimmed text of every matching element, blanks dropped.
    List,

    /// `href` of the first matching link, made absolute against the
    /// platform origin when relative.
    Url,
}

struct FieldRule {
    name: &'static str,
    selector: &'static str,
    mode: ExtractMode,
}

const ORG_ITEM_SELECTOR: &str = "div.org-item";

const ORGANIZATION_RULES: &[FieldRule] = &[
    FieldRule { name: "name", selector: ".org-name", mode: ExtractMode::Text },
    FieldRule { name: "country", selector: ".org-country", mode: ExtractMode::Text },
    FieldRule { name: "organization_type", selector: ".org-type", mode: ExtractMode::Text },
    FieldRule { name: "experience_level", selector: ".exp-level", mode: ExtractMode::Text },
    FieldRule { name: "target_groups", selector: ".target-group", mode: ExtractMode::List },
    FieldRule { name: "activity_types", selector: ".activity-type", mode: ExtractMode::List },
    FieldRule { name: "contact_info", selector: ".contact-info", mode: ExtractMode::Text },
    FieldRule { name: "profile_url", selector: ".org-link", mode: ExtractMode::Url },
    FieldRule { name: "last_active", selector: ".last-active", mode: ExtractMode::Text },
];

const PROJECT_ITEM_SELECTOR: &str = "div.project-item";

const PROJECT_RULES: &[FieldRule] = &[
    FieldRule { name: "title", selector: ".project-title", mode: ExtractMode::Text },
    FieldRule { name: "project_type", selector: ".project-type", mode: ExtractMode::Text },
    FieldRule { name: "countries_involved", selector: ".countries", mode: ExtractMode::List },
    FieldRule { name: "deadline", selector: ".deadline", mode: ExtractMode::Text },
    FieldRule { name: "target_groups", selector: ".target-groups", mode: ExtractMode::List },
    FieldRule { name: "themes", selector: ".themes", mode: ExtractMode::List },
    FieldRule {
        name: "description",
        selector: ".description",
        mode: ExtractMode::TruncatedText(limits::DESCRIPTION_MAX_CHARS),
    },
    FieldRule { name: "contact_organization", selector: ".contact-org", mode: ExtractMode::Text },
    FieldRule { name: "project_url", selector: ".project-link", mode: ExtractMode::Url },
    FieldRule { name: "created_date", selector: ".created-date", mode: ExtractMode::Text },
];

/// Result of one extraction pass.
#[derive(Debug, Clone)]
pub struct ExtractOutcome {
    pub success: bool,

    pub data: Vec<RawRecord>,

    pub parsed_count: usize,

    pub error: Option<String>,
}

impl ExtractOutcome {
    fn success(data: Vec<RawRecord>) -> Self {
        Self {
            parsed_count: data.len(),
            success: true,
            data,
            error: None,
        }
    }
}

/// Parses up to `max_items` raw records of `kind` out of the markup.
///
/// Markup that matches zero item containers is not an error; it yields an
/// empty set with `success == true`. Only an absent document fails.
#[must_use]
pub fn extract_structured_data(
    raw_html: Option<&str>,
    kind: SearchKind,
    max_items: usize,
) -> ExtractOutcome {
    let Some(raw_html) = raw_html else {
        return ExtractOutcome {
            success: false,
            data: Vec::new(),
            parsed_count: 0,
            error: Some("no document to parse".to_string()),
        };
    };

    let (item_selector, rules) = match kind {
        SearchKind::Organizations => (ORG_ITEM_SELECTOR, ORGANIZATION_RULES),
        SearchKind::Projects => (PROJECT_ITEM_SELECTOR, PROJECT_RULES),
    };

    let Ok(items) = Selector::parse(item_selector) else {
        return ExtractOutcome::success(Vec::new());
    };

    let document = Html::parse_document(raw_html);
    let records: Vec<RawRecord> = document
        .select(&items)
        .take(max_items)
        .map(|item| extract_item(item, rules))
        .collect();

    debug!("Extracted {} {} item(s)", records.len(), kind);
    ExtractOutcome::success(records)
}

fn extract_item(item: ElementRef<'_>, rules: &[FieldRule]) -> RawRecord {
    let mut record = RawRecord::new();

    for rule in rules {
        let Ok(selector) = Selector::parse(rule.selector) else {
            continue;
        };

        match rule.mode {
            ExtractMode::Text => record.set_text(rule.name, first_text(item, &selector)),
            ExtractMode::TruncatedText(max_chars) => {
                record.set_text(rule.name, truncate_chars(&first_text(item, &selector), max_chars));
            }
            ExtractMode::List => record.set_list(rule.name, all_texts(item, &selector)),
            ExtractMode::Url => record.set_text(rule.name, first_href(item, &selector)),
        }
    }

    record
}

fn first_text(item: ElementRef<'_>, selector: &Selector) -> String {
    item.select(selector)
        .next()
        .map(|el| collapse_text(&el))
        .unwrap_or_default()
}

fn all_texts(item: ElementRef<'_>, selector: &Selector) -> Vec<String> {
    item.select(selector)
        .map(|el| collapse_text(&el))
        .filter(|text| !text.is_empty())
        .collect()
}

fn first_href(item: ElementRef<'_>, selector: &Selector) -> String {
    let Some(href) = item
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("href"))
    else {
        return String::new();
    };

    if href.is_empty() || href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}{href}", platform::ORIGIN)
    }
}

/// Joins an element's text nodes and trims the result.
fn collapse_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
