//! Typed records produced by the scrape pipeline
//!
//! Both record types serialize to flat key-value JSON with ISO-8601 strings
//! for dates and `null` for absent optional fields. Downstream consumers
//! rely on that shape.

use chrono::NaiveDate;
use serde::Serialize;

/// A single entry from a portal search result page
///
/// Produced only by summary parsing and immutable once constructed. All
/// string fields are required and non-empty; `date` is the only optional
/// field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    /// Opaque site-assigned key used to address the detail page
    pub case_id: String,

    /// Human-facing case identifier (e.g. "2024/1234")
    pub case_number: String,

    /// Case title as shown in the result list
    pub title: String,

    /// Processing status as shown in the result list
    pub status: String,

    /// Registration date, when the portal exposes one
    pub date: Option<NaiveDate>,
}

/// A fully extracted building-permit case
///
/// `case_number`, `municipality`, `case_type` and `status` are required;
/// the rest default to absent. `source_url` is stamped by the coordinator
/// after a successful fetch, never by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseRecord {
    pub case_number: String,
    pub municipality: String,
    pub case_type: String,
    pub status: String,
    pub address: Option<String>,
    /// Combined cadastral identifier (gårdsnummer/bruksnummer)
    pub property_id: Option<String>,
    pub application_date: Option<NaiveDate>,
    pub decision_date: Option<NaiveDate>,
    pub applicant: Option<String>,
    pub description: Option<String>,
    pub source_url: Option<String>,
}
