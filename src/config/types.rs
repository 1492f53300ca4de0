use serde::Deserialize;
use std::collections::BTreeMap;

/// A single municipal portal target
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Portal base URL, e.g. "https://innsyn.oslo.kommune.no/byggesak"
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the search endpoint, relative to the base URL
    #[serde(rename = "search-path")]
    pub search_path: String,

    /// Path of the detail endpoint with a `{case_id}` substitution point
    #[serde(rename = "detail-path-template")]
    pub detail_path_template: String,

    /// Maximum request rate against this portal
    #[serde(rename = "requests-per-minute")]
    pub requests_per_minute: u32,

    /// Whether this target may be scraped at all
    pub enabled: bool,
}

/// Identification and HTTP behaviour of the scraping client
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Name of the scraper, sent in the user-agent string
    #[serde(rename = "scraper-name")]
    pub scraper_name: String,

    /// Version of the scraper
    #[serde(rename = "scraper-version")]
    pub scraper_version: String,

    /// URL with information about the scraper
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for scraper-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-seconds")]
    pub timeout_seconds: u64,

    /// Maximum number of retries for transient failures
    #[serde(rename = "max-retries")]
    pub max_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scraper_name: "ByggesakScraper".to_string(),
            scraper_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.org/byggesak-scraper".to_string(),
            contact_email: "drift@example.org".to_string(),
            timeout_seconds: 30,
            max_retries: 3,
        }
    }
}

/// Root structure of a TOML targets file
///
/// ```toml
/// [client]
/// scraper-name = "ByggesakScraper"
///
/// [target.oslo]
/// base-url = "https://innsyn.oslo.kommune.no/byggesak"
/// search-path = "/search"
/// detail-path-template = "/case/{case_id}"
/// requests-per-minute = 30
/// enabled = true
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TargetsFile {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(rename = "target", default)]
    pub targets: BTreeMap<String, TargetConfig>,
}
