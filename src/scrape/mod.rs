//! Scrape pipeline for portal pages
//!
//! This module contains the core scraping logic, including:
//! - Request pacing against each portal
//! - HTTP fetching with bounded retry
//! - HTML field extraction for search and detail pages
//! - Two-phase batch coordination with per-item failure recovery

mod coordinator;
mod fetcher;
mod parser;
mod rate_limit;

pub use coordinator::{ScrapeReport, Scraper};
pub use fetcher::{build_http_client, fetch_page, RawResponse};
pub use parser::{parse_date, parse_detail, parse_summaries};
pub use rate_limit::RateLimiter;
