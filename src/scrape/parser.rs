//! HTML field extraction for portal pages
//!
//! Two independent entry points, both pure functions of their input markup:
//! - `parse_summaries` for the search result page
//! - `parse_detail` for individual case pages
//!
//! Detail fields are extracted with a two-tier strategy: a stable CSS class
//! marker first, then a label-text fallback that walks from a matching
//! `<dt>` node to its next `<dd>` sibling. Missing optional fields become
//! `None`; missing required fields fail the whole record.

use crate::models::{CaseRecord, SearchSummary};
use crate::ParsingError;
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

/// Date formats used by the portals, tried in order
const DATE_FORMATS: [&str; 3] = ["%d.%m.%Y", "%d/%m/%Y", "%Y-%m-%d"];

/// Field markers for detail pages: CSS class first, label text as fallback
const CASE_TYPE_MARKER: (&str, &str) = ("case-type", "Søknadstype");
const STATUS_MARKER: (&str, &str) = ("status", "Status");
const ADDRESS_MARKER: (&str, &str) = ("address", "Adresse");
const PROPERTY_ID_MARKER: (&str, &str) = ("property-id", "Gårdsnr/Bruksnr");
const APPLICATION_DATE_MARKER: (&str, &str) = ("application-date", "Søknadsdato");
const DECISION_DATE_MARKER: (&str, &str) = ("decision-date", "Vedtaksdato");
const APPLICANT_MARKER: (&str, &str) = ("applicant", "Søker");
const DESCRIPTION_MARKER: (&str, &str) = ("description", "Beskrivelse");

/// Parses a search result page into summary records
///
/// Result rows live in `table.search-results tr.result-row`. A row missing
/// any required field is skipped with a warning; a page with zero rows (or
/// no recognizable results container at all) yields an empty list rather
/// than an error. Output preserves document order.
pub fn parse_summaries(html: &str) -> Result<Vec<SearchSummary>, ParsingError> {
    let document = Html::parse_document(html);
    let row_selector = compile_selector("table.search-results tr.result-row")?;

    let mut summaries = Vec::new();
    let mut row_count = 0;

    for row in document.select(&row_selector) {
        row_count += 1;
        if let Some(summary) = parse_summary_row(row) {
            summaries.push(summary);
        }
    }

    if row_count == 0 {
        tracing::warn!("No result rows found in search results");
    } else {
        tracing::info!("Parsed {} of {} search result rows", summaries.len(), row_count);
    }

    Ok(summaries)
}

/// Extracts one summary from a result row, or None if a required field is
/// missing or empty
fn parse_summary_row(row: ElementRef) -> Option<SearchSummary> {
    let case_id = row
        .value()
        .attr("data-case-id")
        .map(str::trim)
        .filter(|id| !id.is_empty());
    let case_number = cell_text(row, "td.case-number");
    let title = cell_text(row, "td.title");
    let status = cell_text(row, "td.status");

    let (case_id, case_number, title, status) = match (case_id, case_number, title, status) {
        (Some(id), Some(number), Some(title), Some(status)) => (id, number, title, status),
        _ => {
            tracing::warn!("Incomplete data in result row, skipping");
            return None;
        }
    };

    let date = cell_text(row, "td.date").and_then(|text| parse_date(&text));

    Some(SearchSummary {
        case_id: case_id.to_string(),
        case_number,
        title,
        status,
        date,
    })
}

/// Parses a case detail page into a full record
///
/// `case_type` and `status` are required: if both extraction tiers fail for
/// either, the whole call fails with a `ParsingError` naming the missing
/// fields. Optional fields simply become `None`. The caller supplies
/// `case_number` and `municipality`, which the detail page does not repeat
/// in a reliable place.
pub fn parse_detail(
    html: &str,
    case_number: &str,
    municipality: &str,
) -> Result<CaseRecord, ParsingError> {
    let document = Html::parse_document(html);

    let case_type = extract_field(&document, CASE_TYPE_MARKER);
    let status = extract_field(&document, STATUS_MARKER);

    let (case_type, status) = match (case_type, status) {
        (Some(case_type), Some(status)) => (case_type, status),
        (case_type, status) => {
            let mut fields = Vec::new();
            if case_type.is_none() {
                fields.push("case_type");
            }
            if status.is_none() {
                fields.push("status");
            }
            return Err(ParsingError::MissingRequiredFields { fields });
        }
    };

    let application_date =
        extract_field(&document, APPLICATION_DATE_MARKER).and_then(|text| parse_date(&text));
    let decision_date =
        extract_field(&document, DECISION_DATE_MARKER).and_then(|text| parse_date(&text));

    let record = CaseRecord {
        case_number: case_number.to_string(),
        municipality: municipality.to_string(),
        case_type,
        status,
        address: extract_field(&document, ADDRESS_MARKER),
        property_id: extract_field(&document, PROPERTY_ID_MARKER),
        application_date,
        decision_date,
        applicant: extract_field(&document, APPLICANT_MARKER),
        description: extract_field(&document, DESCRIPTION_MARKER),
        source_url: None,
    };

    tracing::debug!("Extracted case details for {}", case_number);
    Ok(record)
}

/// Two-tier field lookup
///
/// Tier 1 finds an element carrying the stable CSS class marker. Tier 2
/// falls back to the first `<dt>` whose text matches the label
/// case-insensitively, reading the value from its next `<dd>` sibling.
/// Values that are empty after trimming count as missing.
fn extract_field(document: &Html, (css_class, label): (&str, &str)) -> Option<String> {
    if let Ok(class_selector) = Selector::parse(&format!(".{}", css_class)) {
        if let Some(element) = document.select(&class_selector).next() {
            let text = element_text(element);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }

    let dt_selector = Selector::parse("dt").ok()?;
    let label_lower = label.to_lowercase();
    let dt = document
        .select(&dt_selector)
        .find(|dt| element_text(*dt).to_lowercase().contains(&label_lower))?;

    dt.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == "dd")
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// Parses a date string in the formats used by the portals
///
/// Formats are tried in order and the first match wins, so an ambiguous
/// string is always read by the earliest pattern it satisfies. Empty and
/// unparseable input yield `None`, never an error.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }

    tracing::warn!("Could not parse date: {}", text);
    None
}

/// Text of the first cell matching the selector, or None if absent or
/// empty after trimming
fn cell_text(row: ElementRef, selector_str: &str) -> Option<String> {
    let selector = Selector::parse(selector_str).ok()?;
    row.select(&selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn compile_selector(css: &str) -> Result<Selector, ParsingError> {
    Selector::parse(css)
        .map_err(|e| ParsingError::Structure(format!("invalid selector '{}': {}", css, e)))
}

/// Concatenated text content of an element, trimmed
fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
