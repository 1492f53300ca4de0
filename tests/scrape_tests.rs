//! Integration tests for the scrape pipeline
//!
//! These tests use wiremock to stand in for a municipal portal and drive
//! the full search + detail cycle end-to-end.

use byggesak_scraper::config::{ClientConfig, Registry, TargetConfig};
use byggesak_scraper::{ConfigError, NetworkError, ScrapeError, Scraper};
use std::collections::BTreeMap;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a registry with a single enabled target pointing at the mock
/// server. The rate limit is set high so tests spend no real time pacing.
fn test_registry(base_url: &str, max_retries: u32) -> Registry {
    let mut targets = BTreeMap::new();
    targets.insert(
        "test".to_string(),
        TargetConfig {
            base_url: format!("{}/byggesak", base_url),
            search_path: "/search".to_string(),
            detail_path_template: "/case/{case_id}".to_string(),
            requests_per_minute: 6000,
            enabled: true,
        },
    );

    let client = ClientConfig {
        scraper_name: "TestScraper".to_string(),
        scraper_version: "1.0".to_string(),
        contact_url: "https://example.com/about".to_string(),
        contact_email: "admin@example.com".to_string(),
        timeout_seconds: 10,
        max_retries,
    };

    Registry::new(targets, client)
}

fn search_page(rows: &[(&str, &str)]) -> String {
    let mut body = String::from(
        r#"<html><body><table class="search-results">
        <tr class="header-row"><th>Saksnummer</th><th>Tittel</th><th>Status</th><th>Dato</th></tr>"#,
    );
    for (case_id, case_number) in rows {
        body.push_str(&format!(
            r#"<tr class="result-row" data-case-id="{}">
                <td class="case-number">{}</td>
                <td class="title">Søknad om tilbygg</td>
                <td class="status">Under behandling</td>
                <td class="date">15.11.2024</td>
            </tr>"#,
            case_id, case_number
        ));
    }
    body.push_str("</table></body></html>");
    body
}

fn detail_page(case_type: &str, status: &str) -> String {
    format!(
        r#"<html><body><dl class="case-info">
            <dt>Søknadstype</dt><dd class="case-type">{}</dd>
            <dt>Status</dt><dd class="status">{}</dd>
            <dt>Adresse</dt><dd class="address">Eksempelveien 1</dd>
            <dt>Søknadsdato</dt><dd class="application-date">15.11.2024</dd>
        </dl></body></html>"#,
        case_type, status
    )
}

async fn mount_search(server: &MockServer, rows: &[(&str, &str)]) {
    Mock::given(method("GET"))
        .and(path("/byggesak/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(search_page(rows)))
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, case_id: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/byggesak/case/{}", case_id)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_scrape_two_phases() {
    let server = MockServer::start().await;

    mount_search(&server, &[("101", "2024/1"), ("102", "2024/2"), ("103", "2024/3")]).await;
    mount_detail(&server, "101", detail_page("Tilbygg", "Under behandling")).await;
    mount_detail(&server, "102", detail_page("Garasje", "Godkjent")).await;
    mount_detail(&server, "103", detail_page("Påbygg", "Avslått")).await;

    let registry = test_registry(&server.uri(), 0);
    let mut scraper = Scraper::with_registry("test", &registry).unwrap();

    let report = scraper.scrape_cases(&[], None).await.unwrap();

    assert_eq!(report.attempted, 3);
    assert_eq!(report.cases.len(), 3);
    assert_eq!(report.failed(), 0);

    let first = &report.cases[0];
    assert_eq!(first.case_number, "2024/1");
    assert_eq!(first.municipality, "test");
    assert_eq!(first.case_type, "Tilbygg");
    assert_eq!(first.address.as_deref(), Some("Eksempelveien 1"));
    assert_eq!(
        first.source_url.as_deref(),
        Some(format!("{}/byggesak/case/101", server.uri()).as_str())
    );
    assert!(first.application_date.is_some());

    // Detail order follows search-result order.
    assert_eq!(report.cases[1].case_type, "Garasje");
    assert_eq!(report.cases[2].case_type, "Påbygg");
}

#[tokio::test]
async fn test_detail_failure_skips_case() {
    let server = MockServer::start().await;

    mount_search(&server, &[("101", "2024/1"), ("102", "2024/2"), ("103", "2024/3")]).await;
    mount_detail(&server, "101", detail_page("Tilbygg", "Godkjent")).await;
    // Case 102 is gone; the portal answers 404.
    Mock::given(method("GET"))
        .and(path("/byggesak/case/102"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_detail(&server, "103", detail_page("Påbygg", "Avslått")).await;

    let registry = test_registry(&server.uri(), 0);
    let mut scraper = Scraper::with_registry("test", &registry).unwrap();

    let report = scraper.scrape_cases(&[], None).await.unwrap();

    assert_eq!(report.attempted, 3);
    assert_eq!(report.cases.len(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.cases[0].case_number, "2024/1");
    assert_eq!(report.cases[1].case_number, "2024/3");
}

#[tokio::test]
async fn test_unparseable_detail_skips_case() {
    let server = MockServer::start().await;

    mount_search(&server, &[("101", "2024/1"), ("102", "2024/2")]).await;
    mount_detail(&server, "101", detail_page("Tilbygg", "Godkjent")).await;
    // Detail page without the required fields.
    mount_detail(&server, "102", "<html><body><p>Flyttet</p></body></html>".to_string()).await;

    let registry = test_registry(&server.uri(), 0);
    let mut scraper = Scraper::with_registry("test", &registry).unwrap();

    let report = scraper.scrape_cases(&[], None).await.unwrap();

    assert_eq!(report.attempted, 2);
    assert_eq!(report.cases.len(), 1);
    assert_eq!(report.cases[0].case_number, "2024/1");
}

#[tokio::test]
async fn test_max_cases_bounds_detail_requests() {
    let server = MockServer::start().await;

    mount_search(&server, &[("101", "2024/1"), ("102", "2024/2"), ("103", "2024/3")]).await;

    Mock::given(method("GET"))
        .and(path("/byggesak/case/101"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(detail_page("Tilbygg", "Godkjent")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/byggesak/case/102"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(detail_page("Garasje", "Godkjent")),
        )
        .expect(1)
        .mount(&server)
        .await;
    // The third candidate must never be requested.
    Mock::given(method("GET"))
        .and(path("/byggesak/case/103"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(detail_page("Påbygg", "Godkjent")),
        )
        .expect(0)
        .mount(&server)
        .await;

    let registry = test_registry(&server.uri(), 0);
    let mut scraper = Scraper::with_registry("test", &registry).unwrap();

    let report = scraper.scrape_cases(&[], Some(2)).await.unwrap();

    assert_eq!(report.attempted, 2);
    assert_eq!(report.cases.len(), 2);
}

#[tokio::test]
async fn test_search_failure_aborts_batch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/byggesak/search"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let registry = test_registry(&server.uri(), 0);
    let mut scraper = Scraper::with_registry("test", &registry).unwrap();

    let result = scraper.scrape_cases(&[], None).await;

    match result {
        Err(ScrapeError::Network(NetworkError::Status { status, .. })) => {
            assert_eq!(status, 404);
        }
        other => panic!("Expected network error, got {:?}", other.map(|r| r.attempted)),
    }
}

#[tokio::test]
async fn test_transient_server_error_is_retried() {
    let server = MockServer::start().await;

    // First response is a 500; the retry should then succeed.
    Mock::given(method("GET"))
        .and(path("/byggesak/search"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_search(&server, &[("101", "2024/1")]).await;
    mount_detail(&server, "101", detail_page("Tilbygg", "Godkjent")).await;

    let registry = test_registry(&server.uri(), 2);
    let mut scraper = Scraper::with_registry("test", &registry).unwrap();

    let report = scraper.scrape_cases(&[], None).await.unwrap();
    assert_eq!(report.cases.len(), 1);
}

#[tokio::test]
async fn test_rate_limit_response_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/byggesak/search"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_search(&server, &[("101", "2024/1")]).await;
    mount_detail(&server, "101", detail_page("Tilbygg", "Godkjent")).await;

    let registry = test_registry(&server.uri(), 2);
    let mut scraper = Scraper::with_registry("test", &registry).unwrap();

    let summaries = scraper.search(&[]).await.unwrap();
    assert_eq!(summaries.len(), 1);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/byggesak/search"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let registry = test_registry(&server.uri(), 3);
    let mut scraper = Scraper::with_registry("test", &registry).unwrap();

    let result = scraper.search(&[]).await;
    assert!(matches!(
        result,
        Err(ScrapeError::Network(NetworkError::Status { status: 403, .. }))
    ));
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let server = MockServer::start().await;

    // Persistent failure: initial attempt plus one retry, then give up.
    Mock::given(method("GET"))
        .and(path("/byggesak/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let registry = test_registry(&server.uri(), 1);
    let mut scraper = Scraper::with_registry("test", &registry).unwrap();

    let result = scraper.search(&[]).await;

    match result {
        Err(ScrapeError::Network(NetworkError::RetriesExhausted {
            status, attempts, ..
        })) => {
            assert_eq!(status, 500);
            assert_eq!(attempts, 2);
        }
        other => panic!("Expected RetriesExhausted, got {:?}", other.map(|s| s.len())),
    }
}

#[tokio::test]
async fn test_query_params_are_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/byggesak/search"))
        .and(query_param("query", "garasje"))
        .respond_with(ResponseTemplate::new(200).set_body_string(search_page(&[("101", "2024/1")])))
        .expect(1)
        .mount(&server)
        .await;

    let registry = test_registry(&server.uri(), 0);
    let mut scraper = Scraper::with_registry("test", &registry).unwrap();

    let params = vec![("query".to_string(), "garasje".to_string())];
    let summaries = scraper.search(&params).await.unwrap();

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].case_number, "2024/1");
}

#[tokio::test]
async fn test_requests_carry_identifying_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/byggesak/search"))
        .and(header(
            "user-agent",
            "TestScraper/1.0 (+https://example.com/about; admin@example.com)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(search_page(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let registry = test_registry(&server.uri(), 0);
    let mut scraper = Scraper::with_registry("test", &registry).unwrap();

    let summaries = scraper.search(&[]).await.unwrap();
    assert!(summaries.is_empty());
}

#[tokio::test]
async fn test_disabled_target_fails_before_any_request() {
    let server = MockServer::start().await;

    // Any request at all would be a failure here.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut targets = BTreeMap::new();
    targets.insert(
        "frozen".to_string(),
        TargetConfig {
            base_url: format!("{}/byggesak", server.uri()),
            search_path: "/search".to_string(),
            detail_path_template: "/case/{case_id}".to_string(),
            requests_per_minute: 60,
            enabled: false,
        },
    );
    let registry = Registry::new(targets, ClientConfig::default());

    let result = Scraper::with_registry("frozen", &registry);
    assert!(matches!(result, Err(ConfigError::TargetDisabled(_))));
}

#[tokio::test]
async fn test_unknown_target_lists_available_names() {
    let registry = test_registry("http://localhost:1", 0);

    let result = Scraper::with_registry("nowhere", &registry);

    match result {
        Err(ConfigError::UnknownTarget { name, available }) => {
            assert_eq!(name, "nowhere");
            assert_eq!(available, "test");
        }
        other => panic!("Expected UnknownTarget, got {:?}", other.err()),
    }
}
