//! HTTP client creation and page retrieval with proxy fallback.

use std::sync::Arc;

use anyhow::Result;
use reqwest::cookie::Jar;
use reqwest::{Client, StatusCode};
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::AnalysisError;
use crate::fetch::proxy::PROXY_STRATEGIES;
use crate::normalize;
use crate::TARGET_WEB_REQUEST;

/// Fixed desktop browser identity sent with every request. Several sites
/// serve placeholder pages to unknown agents.
pub const DESKTOP_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";

/// Budget for a single fetch attempt, covering connect through body read.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(12);

/// Bodies at or below this length are treated as placeholder or error pages
/// even when the status is 200.
pub const MIN_BODY_CHARS: usize = 50;

/// Creates the shared HTTP client: cookie store, gzip, default redirect
/// handling, and the fixed desktop User-Agent on every request.
pub fn create_http_client() -> Result<Client> {
    let cookie_store = Jar::default();

    Client::builder()
        .user_agent(DESKTOP_USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .cookie_store(true)
        .cookie_provider(Arc::new(cookie_store))
        .gzip(true)
        .redirect(reqwest::redirect::Policy::default())
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))
}

/// Returns true for absolute http/https URLs, the only schemes worth
/// handing to the fetch chain.
pub fn is_valid_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.scheme() == "http" || parsed.scheme() == "https",
        Err(_) => false,
    }
}

/// The fetch URLs attempted for `url`, in order: the direct request first,
/// then each public relay rewrite.
pub fn fetch_candidates(url: &str) -> Vec<(String, String)> {
    let mut candidates = vec![("direct".to_string(), url.to_string())];
    for strategy in &PROXY_STRATEGIES {
        candidates.push((strategy.name.to_string(), strategy.rewrite(url)));
    }
    candidates
}

/// Retrieves `url` and reduces it to readable page text, trying the direct
/// request and then each proxy relay until one attempt is usable.
pub async fn fetch_page_text(client: &Client, url: &str) -> Result<String, AnalysisError> {
    let candidates = fetch_candidates(url);
    fetch_text_from(client, &candidates, url).await
}

async fn fetch_text_from(
    client: &Client,
    candidates: &[(String, String)],
    url: &str,
) -> Result<String, AnalysisError> {
    match first_usable_body(client, candidates, url).await {
        Some(body) => Ok(normalize::readable_text(&body)),
        None => {
            warn!(target: TARGET_WEB_REQUEST, "All fetch attempts failed for {}", url);
            Err(AnalysisError::FetchFailure {
                url: url.to_string(),
            })
        }
    }
}

/// A usable response is status 200 with a body longer than
/// [`MIN_BODY_CHARS`] characters. Anything else is treated as a failed
/// attempt, including redirect leftovers and relay error stubs.
pub fn is_usable_response(status: StatusCode, body: &str) -> bool {
    status == StatusCode::OK && body.chars().count() > MIN_BODY_CHARS
}

/// Runs the candidates one at a time and returns the first usable body.
/// Every failure is logged and swallowed so the next candidate can run.
async fn first_usable_body(
    client: &Client,
    candidates: &[(String, String)],
    url: &str,
) -> Option<String> {
    for (label, fetch_url) in candidates {
        debug!(target: TARGET_WEB_REQUEST, "Attempting {} fetch of {}", label, url);
        if let Some(body) = attempt_fetch(client, fetch_url, label, url).await {
            info!(
                target: TARGET_WEB_REQUEST,
                "Fetched {} via {} ({} characters)",
                url,
                label,
                body.chars().count()
            );
            return Some(body);
        }
    }
    None
}

async fn attempt_fetch(client: &Client, fetch_url: &str, label: &str, url: &str) -> Option<String> {
    match timeout(REQUEST_TIMEOUT, client.get(fetch_url).send()).await {
        Ok(Ok(response)) => {
            let status = response.status();
            match response.text().await {
                Ok(body) if is_usable_response(status, &body) => Some(body),
                Ok(body) => {
                    debug!(
                        target: TARGET_WEB_REQUEST,
                        "{} fetch of {} unusable: status {}, {} characters",
                        label,
                        url,
                        status,
                        body.chars().count()
                    );
                    None
                }
                Err(e) => {
                    debug!(target: TARGET_WEB_REQUEST, "{} fetch of {} failed reading body: {}", label, url, e);
                    None
                }
            }
        }
        Ok(Err(e)) => {
            debug!(target: TARGET_WEB_REQUEST, "{} fetch of {} failed: {}", label, url, e);
            None
        }
        Err(_) => {
            debug!(
                target: TARGET_WEB_REQUEST,
                "{} fetch of {} timed out after {} seconds",
                label,
                url,
                REQUEST_TIMEOUT.as_secs()
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn page_body(marker: &str) -> String {
        format!(
            "<html><body><p>{} content long enough to clear the placeholder check</p></body></html>",
            marker
        )
    }

    #[test]
    fn test_direct_attempt_comes_first() {
        let candidates = fetch_candidates("https://example.com/pricing");
        assert_eq!(candidates.len(), 4);
        assert_eq!(candidates[0].0, "direct");
        assert_eq!(candidates[0].1, "https://example.com/pricing");
    }

    #[test]
    fn test_relays_follow_in_fixed_order() {
        let candidates = fetch_candidates("https://example.com/");
        let labels: Vec<&str> = candidates.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(labels, vec!["direct", "allorigins", "codetabs", "corsproxy"]);
        assert!(candidates[1].1.starts_with("https://api.allorigins.win/raw?url="));
        assert!(candidates[2].1.starts_with("https://api.codetabs.com/v1/proxy?quest="));
        assert!(candidates[3].1.starts_with("https://corsproxy.io/?"));
    }

    #[test]
    fn test_usable_response_needs_status_200() {
        let body = "x".repeat(MIN_BODY_CHARS + 1);
        assert!(is_usable_response(StatusCode::OK, &body));
        assert!(!is_usable_response(StatusCode::NOT_FOUND, &body));
        assert!(!is_usable_response(StatusCode::MOVED_PERMANENTLY, &body));
        assert!(!is_usable_response(StatusCode::INTERNAL_SERVER_ERROR, &body));
    }

    #[test]
    fn test_usable_response_needs_body_above_minimum() {
        assert!(!is_usable_response(StatusCode::OK, ""));
        assert!(!is_usable_response(StatusCode::OK, &"x".repeat(MIN_BODY_CHARS)));
        assert!(is_usable_response(StatusCode::OK, &"x".repeat(MIN_BODY_CHARS + 1)));
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://example.com/path?q=1"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url(""));
    }

    #[tokio::test]
    async fn test_first_candidate_success_stops_the_chain() {
        let server = MockServer::start();
        let direct = server.mock(|when, then| {
            when.method(GET).path("/page");
            then.status(200).body(page_body("direct"));
        });
        let relay = server.mock(|when, then| {
            when.method(GET).path("/relay");
            then.status(200).body(page_body("relay"));
        });

        let candidates = vec![
            ("direct".to_string(), server.url("/page")),
            ("relay".to_string(), server.url("/relay")),
        ];
        let client = create_http_client().unwrap();
        let body = first_usable_body(&client, &candidates, "https://target.example")
            .await
            .unwrap();

        assert!(body.contains("direct content"));
        direct.assert();
        relay.assert_hits(0);
    }

    #[tokio::test]
    async fn test_failures_fall_through_in_order() {
        let server = MockServer::start();
        let direct = server.mock(|when, then| {
            when.method(GET).path("/direct");
            then.status(404).body(page_body("not found"));
        });
        let first_relay = server.mock(|when, then| {
            when.method(GET).path("/relay-1");
            then.status(500).body(page_body("relay error"));
        });
        let second_relay = server.mock(|when, then| {
            when.method(GET).path("/relay-2");
            then.status(200).body(page_body("second relay"));
        });
        let third_relay = server.mock(|when, then| {
            when.method(GET).path("/relay-3");
            then.status(200).body(page_body("never reached"));
        });

        let candidates = vec![
            ("direct".to_string(), server.url("/direct")),
            ("allorigins".to_string(), server.url("/relay-1")),
            ("codetabs".to_string(), server.url("/relay-2")),
            ("corsproxy".to_string(), server.url("/relay-3")),
        ];
        let client = create_http_client().unwrap();
        let body = first_usable_body(&client, &candidates, "https://target.example")
            .await
            .unwrap();

        assert!(body.contains("second relay"));
        direct.assert();
        first_relay.assert();
        second_relay.assert();
        third_relay.assert_hits(0);
    }

    #[tokio::test]
    async fn test_short_body_with_status_200_is_not_usable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/stub");
            then.status(200).body("tiny");
        });

        let candidates = vec![("direct".to_string(), server.url("/stub"))];
        let client = create_http_client().unwrap();
        let body = first_usable_body(&client, &candidates, "https://target.example").await;

        assert!(body.is_none());
    }

    #[tokio::test]
    async fn test_exhausted_candidates_yield_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/gone");
            then.status(410).body(page_body("gone"));
        });

        let candidates = vec![
            ("direct".to_string(), server.url("/gone")),
            ("allorigins".to_string(), server.url("/gone")),
        ];
        let client = create_http_client().unwrap();
        let body = first_usable_body(&client, &candidates, "https://target.example").await;

        assert!(body.is_none());
    }

    #[tokio::test]
    async fn test_all_attempts_failing_is_a_fetch_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/down");
            then.status(503).body(page_body("maintenance"));
        });

        let candidates: Vec<(String, String)> = ["direct", "allorigins", "codetabs", "corsproxy"]
            .iter()
            .map(|label| (label.to_string(), server.url("/down")))
            .collect();
        let client = create_http_client().unwrap();
        let result = fetch_text_from(&client, &candidates, "https://target.example/page").await;

        match result {
            Err(AnalysisError::FetchFailure { url }) => {
                assert_eq!(url, "https://target.example/page");
            }
            other => panic!("expected FetchFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetched_page_comes_back_as_readable_text() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/article");
            then.status(200).body(
                "<html><head><style>p { margin: 0 }</style></head>\
                 <body><nav>Menu</nav><p>Fetched   article\n\ncopy.</p></body></html>",
            );
        });

        let candidates = vec![("direct".to_string(), server.url("/article"))];
        let client = create_http_client().unwrap();
        let text = fetch_text_from(&client, &candidates, "https://target.example")
            .await
            .unwrap();

        assert_eq!(text, "Fetched article copy.");
    }
}
