//! Scrape coordination - drives the two-phase search/detail cycle
//!
//! The coordinator owns the per-session HTTP client and rate limiter and
//! implements the batch semantics: a failed search aborts the batch, a
//! failed detail fetch only costs that one record.

use crate::config::{ClientConfig, Registry, TargetConfig};
use crate::models::{CaseRecord, SearchSummary};
use crate::scrape::fetcher::{build_http_client, fetch_page};
use crate::scrape::parser::{parse_detail, parse_summaries};
use crate::scrape::rate_limit::RateLimiter;
use crate::{ConfigError, ScrapeError};
use reqwest::Client;

/// Substitution point for the case identifier in detail path templates
const CASE_ID_MARKER: &str = "{case_id}";

/// Outcome of a batch scrape
///
/// Per-item failures are not surfaced as errors; callers detect
/// degradation by comparing `attempted` against `cases.len()`.
#[derive(Debug)]
pub struct ScrapeReport {
    /// Successfully extracted records, in search-result order
    pub cases: Vec<CaseRecord>,

    /// Number of detail pages actually attempted (after truncation)
    pub attempted: usize,
}

impl ScrapeReport {
    /// Number of attempted detail pages that produced no record
    pub fn failed(&self) -> usize {
        self.attempted - self.cases.len()
    }
}

/// Scraper for one municipal portal target
///
/// Holds no state between batch invocations beyond the rate limiter's
/// last-request timestamp, which deliberately spans invocations so
/// back-to-back batches keep respecting the target's request rate.
pub struct Scraper {
    municipality: String,
    target: TargetConfig,
    client_config: ClientConfig,
    client: Client,
    rate_limiter: RateLimiter,
}

impl Scraper {
    /// Creates a scraper for a target in the built-in registry
    ///
    /// # Errors
    ///
    /// `ConfigError` if the target is unknown or disabled. No network
    /// activity happens before these checks.
    pub fn new(municipality: &str) -> Result<Self, ConfigError> {
        Self::with_registry(municipality, &Registry::builtin())
    }

    /// Creates a scraper for a target in the given registry
    pub fn with_registry(municipality: &str, registry: &Registry) -> Result<Self, ConfigError> {
        let target = registry.lookup(municipality)?.clone();
        let client_config = registry.client().clone();
        let client = build_http_client(&client_config)?;
        let rate_limiter = RateLimiter::new(target.requests_per_minute);

        tracing::info!("Initialized scraper for {}", municipality);

        Ok(Self {
            municipality: municipality.to_string(),
            target,
            client_config,
            client,
            rate_limiter,
        })
    }

    /// Fetches and parses the search result page
    ///
    /// # Arguments
    ///
    /// * `params` - Query parameters to pass to the portal, may be empty
    ///
    /// # Errors
    ///
    /// `NetworkError` if the request fails, `ParsingError` if the response
    /// cannot be parsed. Both propagate unmodified.
    pub async fn search(
        &mut self,
        params: &[(String, String)],
    ) -> Result<Vec<SearchSummary>, ScrapeError> {
        self.rate_limiter.wait().await;

        let url = join_url(&self.target.base_url, &self.target.search_path);
        tracing::info!("Fetching search results from {}", url);

        let response = fetch_page(&self.client, &url, params, self.client_config.max_retries).await?;
        let summaries = parse_summaries(&response.body)?;

        tracing::info!("Found {} search results", summaries.len());
        Ok(summaries)
    }

    /// Fetches and parses one case detail page
    ///
    /// On success the record's `source_url` is stamped with the URL that
    /// was actually fetched.
    pub async fn case_details(
        &mut self,
        case_id: &str,
        case_number: &str,
    ) -> Result<CaseRecord, ScrapeError> {
        self.rate_limiter.wait().await;

        let path = self.target.detail_path_template.replace(CASE_ID_MARKER, case_id);
        let url = join_url(&self.target.base_url, &path);
        tracing::debug!("Fetching case details from {}", url);

        let response = fetch_page(&self.client, &url, &[], self.client_config.max_retries).await?;
        let mut case = parse_detail(&response.body, case_number, &self.municipality)?;
        case.source_url = Some(url);

        tracing::debug!("Scraped case {}", case_number);
        Ok(case)
    }

    /// Runs the full two-phase scrape: one search, then one detail fetch
    /// per candidate
    ///
    /// The candidate list is truncated to `max_cases` before any detail
    /// request is issued, bounding request volume deterministically. Each
    /// candidate is then fetched in order; a failed candidate is logged
    /// and skipped, never aborting the batch.
    ///
    /// # Errors
    ///
    /// Only search-phase failures propagate; see `ScrapeReport` for how
    /// detail-phase failures are reported.
    pub async fn scrape_cases(
        &mut self,
        params: &[(String, String)],
        max_cases: Option<usize>,
    ) -> Result<ScrapeReport, ScrapeError> {
        tracing::info!("Starting batch scrape for {}", self.municipality);

        let mut candidates = self.search(params).await?;

        if let Some(max) = max_cases {
            if candidates.len() > max {
                candidates.truncate(max);
                tracing::info!("Limited to {} cases", max);
            }
        }

        let attempted = candidates.len();
        let mut cases = Vec::with_capacity(attempted);

        for (idx, summary) in candidates.iter().enumerate() {
            tracing::info!(
                "Scraping case {}/{}: {}",
                idx + 1,
                attempted,
                summary.case_number
            );

            match self.case_details(&summary.case_id, &summary.case_number).await {
                Ok(case) => cases.push(case),
                Err(e) => {
                    tracing::error!("Failed to scrape case {}: {}", summary.case_number, e);
                }
            }
        }

        tracing::info!(
            "Scraped {}/{} cases for {}",
            cases.len(),
            attempted,
            self.municipality
        );

        Ok(ScrapeReport { cases, attempted })
    }

    /// The municipality this scraper was constructed for
    pub fn municipality(&self) -> &str {
        &self.municipality
    }
}

/// Joins a base URL and an absolute path without collapsing the base path
///
/// `Url::join` would resolve "/search" against the host root and drop the
/// portal prefix, so plain concatenation with slash dedup is used instead.
/// Paths are validated to start with '/' at config load.
fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
