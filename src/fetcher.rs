//! Single-shot page downloads with outcome classification.
//!
//! Every site gets exactly one GET per run. The outcome is folded into a
//! [`FetchOutcome`] instead of an error so a bad site never stops the
//! others. After each successful response the fetcher pauses for a fixed
//! courtesy delay before handing the page back, so consecutive sites are
//! never hit back to back.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use tokio::time::sleep;
use tracing::{error, info, instrument};
use url::Url;

use crate::models::FetchOutcome;

/// User agent presented to news sites.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Pause after each successful fetch when none is configured.
pub const DEFAULT_COURTESY_DELAY_SECS: u64 = 2;

/// Anything that can turn a URL into a [`FetchOutcome`].
pub trait PageFetcher {
    /// Fetch `url` once. Must not retry.
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

impl<T: PageFetcher> PageFetcher for &T {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        (**self).fetch(url).await
    }
}

/// Timing knobs for [`HttpFetcher`].
#[derive(Debug, Clone, Copy)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub courtesy_delay: Duration,
}

/// [`PageFetcher`] backed by a `reqwest` client with browser-like headers.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    settings: FetchSettings,
}

impl HttpFetcher {
    /// Build the HTTP client. No request is made here.
    pub fn new(settings: FetchSettings) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE));

        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .timeout(settings.timeout)
            .gzip(true)
            .deflate(true)
            .build()?;

        Ok(Self { client, settings })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> FetchOutcome {
        info!("Fetching page");

        let url = match Url::parse(url) {
            Ok(url) => url,
            Err(e) => {
                error!(error = %e, "Invalid URL");
                return FetchOutcome::TransportError(format!("invalid url: {e}"));
            }
        };

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return classify(e),
        };

        let status = response.status();
        if !status.is_success() {
            error!(status = status.as_u16(), "HTTP error");
            return FetchOutcome::HttpError {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            };
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return classify(e),
        };
        info!(bytes = body.len(), "Fetched page");

        sleep(self.settings.courtesy_delay).await;

        FetchOutcome::Document { body }
    }
}

fn classify(e: reqwest::Error) -> FetchOutcome {
    if e.is_timeout() {
        error!("Timeout while fetching");
        FetchOutcome::TimedOut
    } else {
        error!(error = %e, "Transport error while fetching");
        FetchOutcome::TransportError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn quick() -> FetchSettings {
        FetchSettings {
            timeout: Duration::from_secs(5),
            courtesy_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_fetch_success_returns_document() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/news"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Hello</h1>"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(quick()).unwrap();
        let outcome = fetcher.fetch(&format!("{}/news", mock_server.uri())).await;

        assert_eq!(
            outcome,
            FetchOutcome::Document {
                body: "<h1>Hello</h1>".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_headers() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(quick()).unwrap();
        fetcher.fetch(&mock_server.uri()).await;

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let headers = &requests[0].headers;
        let value = |name: &str| headers.get(name).unwrap().to_str().unwrap().to_string();
        assert_eq!(value("user-agent"), BROWSER_USER_AGENT);
        assert_eq!(value("accept"), BROWSER_ACCEPT);
        assert_eq!(value("accept-language"), BROWSER_ACCEPT_LANGUAGE);
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_http_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(quick()).unwrap();
        let outcome = fetcher.fetch(&mock_server.uri()).await;

        match outcome {
            FetchOutcome::HttpError { status, .. } => assert_eq!(status, 503),
            other => panic!("Expected HttpError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_slow_server_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(FetchSettings {
            timeout: Duration::from_millis(100),
            courtesy_delay: Duration::ZERO,
        })
        .unwrap();
        let outcome = fetcher.fetch(&mock_server.uri()).await;

        assert_eq!(outcome, FetchOutcome::TimedOut);
    }

    #[tokio::test]
    async fn test_fetch_refused_connection_is_transport_error() {
        let fetcher = HttpFetcher::new(quick()).unwrap();
        let outcome = fetcher.fetch("http://127.0.0.1:1/").await;

        assert!(matches!(outcome, FetchOutcome::TransportError(_)), "{outcome:?}");
    }

    #[tokio::test]
    async fn test_fetch_malformed_url_is_transport_error() {
        let fetcher = HttpFetcher::new(quick()).unwrap();
        let outcome = fetcher.fetch("www.b.example/news").await;

        match outcome {
            FetchOutcome::TransportError(message) => assert!(message.starts_with("invalid url")),
            other => panic!("Expected TransportError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_courtesy_delay_follows_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(FetchSettings {
            timeout: Duration::from_secs(5),
            courtesy_delay: Duration::from_millis(200),
        })
        .unwrap();
        let started = std::time::Instant::now();
        let outcome = fetcher.fetch(&mock_server.uri()).await;

        assert!(matches!(outcome, FetchOutcome::Document { .. }), "{outcome:?}");
        assert!(started.elapsed() >= Duration::from_millis(200));
    }
}
