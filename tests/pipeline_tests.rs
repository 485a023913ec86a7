//! End-to-end pipeline scenarios with a stubbed fetcher.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use otlas_scout::clients::otlas::{FetchOutcome, SearchFetcher};
use otlas_scout::config::Config;
use otlas_scout::models::{SearchFilters, SearchKind, SearchRecords};
use otlas_scout::query::SearchParams;
use otlas_scout::services::SearchService;

const TWO_ORGS_MARKUP: &str = r#"
    <html><body>
    <div class="org-item">
        <span class="org-name">Youth for Europe Foundation</span>
        <span class="org-country">Germany</span>
        <span class="org-type">NGO</span>
        <span class="exp-level">Experienced</span>
    </div>
    <div class="org-item">
        <span class="org-name">Kultur Austausch e.V.</span>
        <span class="org-country">Germany</span>
        <span class="org-type">NGO</span>
        <span class="exp-level">Newcomer</span>
    </div>
    </body></html>"#;

const NAME_ONLY_ORG_MARKUP: &str = r#"
    <div class="org-item"><span class="org-name">Lone Org</span></div>"#;

const ONE_PROJECT_MARKUP: &str = r#"
    <div class="project-item">
        <span class="project-title">Digital Skills for Youth Workers</span>
        <span class="project-type">KA152</span>
    </div>"#;

/// Serves canned markup and records every invocation.
struct StubFetcher {
    markup: String,
    error: Option<String>,
    delay: Duration,
    calls: Mutex<Vec<SearchParams>>,
}

impl StubFetcher {
    fn serving(markup: &str) -> Self {
        Self {
            markup: markup.to_string(),
            error: None,
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing(error: &str) -> Self {
        Self {
            markup: String::new(),
            error: Some(error.to_string()),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn last_params(&self) -> SearchParams {
        self.calls.lock().unwrap().last().unwrap().clone()
    }
}

#[async_trait]
impl SearchFetcher for StubFetcher {
    async fn fetch(&self, params: &SearchParams) -> FetchOutcome {
        self.calls.lock().unwrap().push(params.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.error {
            Some(error) => FetchOutcome::failure(error.clone()),
            None => FetchOutcome {
                success: true,
                raw_html: self.markup.clone(),
                search_url: "https://www.salto-youth.net/tools/otlas-partner-finding/search"
                    .to_string(),
                total_found: self.markup.matches(params.kind.item_marker()).count(),
                error: None,
            },
        }
    }
}

fn service_with(fetcher: Arc<StubFetcher>) -> SearchService {
    SearchService::new(fetcher, &Config::default())
}

fn service_without_cache(fetcher: Arc<StubFetcher>) -> SearchService {
    let mut config = Config::default();
    config.cache.enabled = false;
    SearchService::new(fetcher, &config)
}

#[tokio::test]
async fn forced_organization_search_in_germany() {
    let fetcher = Arc::new(StubFetcher::serving(TWO_ORGS_MARKUP));
    let service = service_with(fetcher.clone());

    let filters = SearchFilters {
        country: Some("Germany".to_string()),
        ..SearchFilters::default()
    };
    let response = service
        .search_organizations(
            "Find partner organizations in Germany for cultural exchange",
            filters,
        )
        .await;

    assert_eq!(fetcher.call_count(), 1);
    let params = fetcher.last_params();
    assert_eq!(params.kind, SearchKind::Organizations);
    assert_eq!(params.country.as_deref(), Some("Germany"));

    assert!(response.success);
    assert_eq!(response.search_type, SearchKind::Organizations);
    assert_eq!(response.total_results, 2);
    assert_eq!(response.total_found, 2);
    match &response.results {
        SearchRecords::Organizations(orgs) => {
            assert_eq!(orgs[0].name, "Youth for Europe Foundation");
            assert_eq!(orgs[1].country, "Germany");
        }
        SearchRecords::Projects(_) => panic!("expected organization records"),
    }
}

#[tokio::test]
async fn auto_kind_resolves_to_projects_for_project_query() {
    let fetcher = Arc::new(StubFetcher::serving(ONE_PROJECT_MARKUP));
    let service = service_with(fetcher.clone());

    let outcome = service
        .search_with_details(
            "KA152 projects looking for partners in digital skills",
            None,
            SearchFilters::default(),
        )
        .await;

    let intent = outcome.intent.expect("auto search must classify intent");
    assert_eq!(intent.intent, SearchKind::Projects);
    assert!(intent.project_score >= 1);
    assert!(intent.project_score > intent.partner_score);

    assert_eq!(outcome.response.search_type, SearchKind::Projects);
    assert_eq!(fetcher.last_params().kind, SearchKind::Projects);
    assert!(outcome.response.success);
    assert_eq!(outcome.response.total_results, 1);
}

#[tokio::test]
async fn fetch_timeout_becomes_failed_response() {
    let fetcher = Arc::new(StubFetcher::failing("request timed out"));
    let service = service_with(fetcher);

    let response = service
        .search_projects("youth exchange", SearchFilters::default())
        .await;

    assert!(!response.success);
    assert!(response.results.is_empty());
    assert_eq!(response.total_results, 0);
    assert!(response.error_message.unwrap().contains("timed out"));
}

#[tokio::test]
async fn invalid_record_is_skipped_not_fatal() {
    let fetcher = Arc::new(StubFetcher::serving(NAME_ONLY_ORG_MARKUP));
    let service = service_with(fetcher);

    let outcome = service
        .search_with_details(
            "partners",
            Some(SearchKind::Organizations),
            SearchFilters::default(),
        )
        .await;

    // The only candidate failed validation: still a successful search,
    // just with zero results and one recorded skip.
    assert!(outcome.response.success);
    assert_eq!(outcome.response.total_results, 0);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].index, 0);
    assert!(outcome.skipped[0].reason.contains("country"));
}

#[tokio::test]
async fn identical_search_hits_cache_second_time() {
    let fetcher = Arc::new(StubFetcher::serving(TWO_ORGS_MARKUP));
    let service = service_with(fetcher.clone());

    let filters = SearchFilters {
        country: Some("Germany".to_string()),
        ..SearchFilters::default()
    };

    let first = service
        .search_with_details("youth", Some(SearchKind::Organizations), filters.clone())
        .await;
    let second = service
        .search_with_details("youth", Some(SearchKind::Organizations), filters)
        .await;

    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert_eq!(fetcher.call_count(), 1);
    assert_eq!(first.response.total_results, second.response.total_results);
}

#[tokio::test]
async fn concurrent_identical_searches_race_the_cache() {
    let fetcher = Arc::new(
        StubFetcher::serving(TWO_ORGS_MARKUP).with_delay(Duration::from_millis(50)),
    );
    let service = service_with(fetcher.clone());

    let (first, second) = tokio::join!(
        service.search_with_details(
            "youth",
            Some(SearchKind::Organizations),
            SearchFilters::default()
        ),
        service.search_with_details(
            "youth",
            Some(SearchKind::Organizations),
            SearchFilters::default()
        ),
    );

    // Both started before either populated the cache, so both fetched;
    // the last writer's entry simply wins.
    assert_eq!(fetcher.call_count(), 2);
    assert!(!first.from_cache);
    assert!(!second.from_cache);
    assert!(first.response.success && second.response.success);

    let third = service
        .search_with_details(
            "youth",
            Some(SearchKind::Organizations),
            SearchFilters::default(),
        )
        .await;
    assert!(third.from_cache);
    assert_eq!(fetcher.call_count(), 2);
}

#[tokio::test]
async fn disabled_cache_always_fetches() {
    let fetcher = Arc::new(StubFetcher::serving(ONE_PROJECT_MARKUP));
    let service = service_without_cache(fetcher.clone());

    let filters = SearchFilters::default();
    service.search_projects("digital", filters.clone()).await;
    service.search_projects("digital", filters).await;

    assert_eq!(fetcher.call_count(), 2);
}

#[tokio::test]
async fn search_many_returns_one_response_per_query() {
    let fetcher = Arc::new(StubFetcher::serving(ONE_PROJECT_MARKUP));
    let service = service_without_cache(fetcher.clone());

    let responses = service
        .search_many(
            &["digital skills", "green youth exchange", "inclusion"],
            Some(SearchKind::Projects),
            SearchFilters::default(),
        )
        .await;

    assert_eq!(responses.len(), 3);
    assert!(responses.iter().all(|r| r.success));
    assert_eq!(fetcher.call_count(), 3);
}

#[tokio::test]
async fn empty_markup_is_success_with_zero_results() {
    let fetcher = Arc::new(StubFetcher::serving("<html><body></body></html>"));
    let service = service_with(fetcher);

    let response = service
        .search_organizations("anything", SearchFilters::default())
        .await;

    assert!(response.success);
    assert_eq!(response.total_results, 0);
    assert_eq!(response.total_found, 0);
    assert!(response.error_message.is_none());
}
