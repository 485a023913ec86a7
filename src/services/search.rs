//! Pipeline orchestrator: intent → query → fetch → extract → validate.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{SearchCache, cache_key};
use crate::clients::otlas::SearchFetcher;
use crate::config::Config;
use crate::extract::extract_structured_data;
use crate::intent::{IntentAnalysis, analyze_intent};
use crate::models::{
    PartnerOrganization, ProjectOpportunity, RawRecord, SearchFilters, SearchKind, SearchRecords,
    SearchResponse,
};
use crate::query::build_params;
use crate::validate::{validate_organization, validate_project};

/// Fetch+extract result memoized by the cache.
#[derive(Debug, Clone)]
pub struct CachedSearch {
    pub total_found: usize,
    pub records: SearchRecords,
}

/// A raw record dropped during validation, with the reason it failed.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRecord {
    /// Position of the record in extraction order.
    pub index: usize,
    pub reason: String,
}

/// Everything one pipeline run produced, beyond the response envelope
/// itself: the intent analysis (when the kind was not forced), the records
/// dropped by validation, and whether the result came from cache.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub response: SearchResponse,
    pub intent: Option<IntentAnalysis>,
    pub skipped: Vec<SkippedRecord>,
    pub from_cache: bool,
}

/// Composes the whole search pipeline into one call.
///
/// Every failure mode folds into a `SearchResponse` with `success == false`;
/// nothing propagates to the caller as an error. A single record failing
/// validation is not a failure: it is skipped and the rest of the batch
/// goes through.
pub struct SearchService {
    fetcher: Arc<dyn SearchFetcher>,
    cache: Option<SearchCache<CachedSearch>>,
    default_max_results: usize,
}

impl SearchService {
    #[must_use]
    pub fn new(fetcher: Arc<dyn SearchFetcher>, config: &Config) -> Self {
        let cache = config
            .cache
            .enabled
            .then(|| SearchCache::new(config.cache_ttl()));

        Self {
            fetcher,
            cache,
            default_max_results: config.search.max_results,
        }
    }

    /// `search` with the kind resolved automatically from the query text.
    pub async fn search_auto(&self, text: &str, filters: SearchFilters) -> SearchResponse {
        self.search(text, None, filters).await
    }

    pub async fn search_organizations(
        &self,
        text: &str,
        filters: SearchFilters,
    ) -> SearchResponse {
        self.search(text, Some(SearchKind::Organizations), filters)
            .await
    }

    pub async fn search_projects(&self, text: &str, filters: SearchFilters) -> SearchResponse {
        self.search(text, Some(SearchKind::Projects), filters).await
    }

    pub async fn search(
        &self,
        text: &str,
        kind: Option<SearchKind>,
        filters: SearchFilters,
    ) -> SearchResponse {
        self.search_with_details(text, kind, filters).await.response
    }

    /// Runs several queries concurrently. The session's limiter bounds how
    /// many are actually in flight at once; completion order is not
    /// preserved beyond the input order of the returned vec.
    pub async fn search_many(
        &self,
        queries: &[&str],
        kind: Option<SearchKind>,
        filters: SearchFilters,
    ) -> Vec<SearchResponse> {
        join_all(
            queries
                .iter()
                .map(|query| self.search(query, kind, filters.clone())),
        )
        .await
    }

    /// The full pipeline, surfacing skipped records and cache provenance
    /// alongside the response.
    pub async fn search_with_details(
        &self,
        text: &str,
        forced_kind: Option<SearchKind>,
        mut filters: SearchFilters,
    ) -> PipelineOutcome {
        let mut intent = None;
        let kind = forced_kind.unwrap_or_else(|| {
            let analysis = analyze_intent(text);
            debug!(
                "Classified query as {} (confidence {:.2})",
                analysis.intent, analysis.confidence
            );
            let resolved = analysis.intent;
            intent = Some(analysis);
            resolved
        });

        if filters.query.is_empty() {
            filters.query = text.to_string();
        }
        if filters.max_results.is_none() {
            filters.max_results = Some(self.default_max_results);
        }

        let params = build_params(kind, text, &filters);
        info!("Searching {} for '{}'", kind, params.query);

        let key = cache_key(kind, &filters);
        if let Some(cached) = self.cache.as_ref().and_then(|cache| cache.get(&key)) {
            debug!("Cache hit for {} search", kind);
            return PipelineOutcome {
                response: SearchResponse::success(
                    kind,
                    filters,
                    cached.total_found,
                    cached.records,
                ),
                intent,
                skipped: Vec::new(),
                from_cache: true,
            };
        }

        let fetched = self.fetcher.fetch(&params).await;
        if !fetched.success {
            let cause = fetched
                .error
                .unwrap_or_else(|| "search request failed".to_string());
            return PipelineOutcome {
                response: SearchResponse::failure(kind, filters, cause),
                intent,
                skipped: Vec::new(),
                from_cache: false,
            };
        }

        let extracted = extract_structured_data(Some(&fetched.raw_html), kind, params.limit);
        if !extracted.success {
            let cause = extracted
                .error
                .unwrap_or_else(|| "extraction failed".to_string());
            return PipelineOutcome {
                response: SearchResponse::failure(kind, filters, cause),
                intent,
                skipped: Vec::new(),
                from_cache: false,
            };
        }

        let (records, skipped) = validate_batch(kind, &extracted.data);
        if !skipped.is_empty() {
            warn!(
                "Dropped {} of {} extracted record(s) during validation",
                skipped.len(),
                extracted.parsed_count
            );
        }

        if let Some(cache) = self.cache.as_ref() {
            cache.set(
                &key,
                CachedSearch {
                    total_found: fetched.total_found,
                    records: records.clone(),
                },
            );
        }

        PipelineOutcome {
            response: SearchResponse::success(kind, filters, fetched.total_found, records),
            intent,
            skipped,
            from_cache: false,
        }
    }

    /// Drops any memoized results, forcing the next searches to fetch.
    pub fn clear_cache(&self) {
        if let Some(cache) = self.cache.as_ref() {
            cache.clear();
        }
    }
}

/// Validates each raw record of the batch, splitting it into the records
/// that passed and the ones skipped with their failure reason.
fn validate_batch(kind: SearchKind, raw: &[RawRecord]) -> (SearchRecords, Vec<SkippedRecord>) {
    let mut skipped = Vec::new();

    let records = match kind {
        SearchKind::Organizations => {
            let mut valid: Vec<PartnerOrganization> = Vec::new();
            for (index, record) in raw.iter().enumerate() {
                match validate_organization(record) {
                    Ok(org) => valid.push(org),
                    Err(err) => skipped.push(SkippedRecord {
                        index,
                        reason: err.to_string(),
                    }),
                }
            }
            SearchRecords::Organizations(valid)
        }
        SearchKind::Projects => {
            let mut valid: Vec<ProjectOpportunity> = Vec::new();
            for (index, record) in raw.iter().enumerate() {
                match validate_project(record) {
                    Ok(project) => valid.push(project),
                    Err(err) => skipped.push(SkippedRecord {
                        index,
                        reason: err.to_string(),
                    }),
                }
            }
            SearchRecords::Projects(valid)
        }
    };

    (records, skipped)
}
