//! News API request construction and HTTP transport.
//!
//! # Architecture
//!
//! - [`NewsTransport`]: Core trait performing a single GET
//! - [`HttpTransport`]: `reqwest`-backed implementation used by the binary
//! - [`NewsApi`]: Turns a [`FetchIntent`] into a request URL and decodes the reply
//!
//! # Endpoints
//!
//! | Intent | Path | Parameters |
//! |--------|------|------------|
//! | Search | `/search` | `q`, `lang`, `max`, `page`, `apikey` |
//! | Headlines | `/top-headlines` | `category`, `lang`, `max`, `page`, `apikey` |

use crate::error::{FetchError, TransportError};
use crate::models::{Article, ArticlesResponse};
use crate::state::FetchIntent;
use crate::utils::truncate_for_log;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use url::Url;

/// Articles requested per page.
pub const PAGE_SIZE: usize = 10;

/// Language filter sent with every request.
pub const LANGUAGE: &str = "en";

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://gnews.io/api/v4";

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for performing a GET against the news API.
///
/// Implementors only move bytes; status interpretation and decoding happen in
/// [`NewsApi`]. This keeps fakes in tests trivial.
pub trait NewsTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse, TransportError>;
}

/// [`NewsTransport`] over a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl NewsTransport for HttpTransport {
    #[instrument(level = "debug", skip_all, fields(host = url.host_str().unwrap_or_default(), path = url.path()))]
    async fn get(&self, url: &Url) -> Result<TransportResponse, TransportError> {
        let t0 = Instant::now();
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(
            status,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "HTTP response received"
        );
        Ok(TransportResponse { status, body })
    }
}

/// A configured client for the news API.
#[derive(Debug, Clone)]
pub struct NewsApi<T> {
    transport: T,
    base_url: Url,
    api_key: String,
}

impl<T> NewsApi<T>
where
    T: NewsTransport,
{
    /// `base_url` is the API root, e.g. `https://gnews.io/api/v4`.
    pub fn new(transport: T, base_url: &str, api_key: impl Into<String>) -> Result<Self, url::ParseError> {
        // Ensure a trailing slash so `join` appends instead of replacing the last segment.
        let base = format!("{}/", base_url.trim_end_matches('/'));
        Ok(Self {
            transport,
            base_url: Url::parse(&base)?,
            api_key: api_key.into(),
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the request URL for an intent.
    pub fn request_url(&self, intent: &FetchIntent) -> Result<Url, FetchError> {
        let (path, key, value, page) = match intent {
            FetchIntent::Search { query, page } => ("search", "q", query.as_str(), *page),
            FetchIntent::Headlines { category, page } => {
                ("top-headlines", "category", category.as_str(), *page)
            }
        };

        let mut url = self.base_url.join(path)?;
        url.query_pairs_mut()
            .append_pair(key, value)
            .append_pair("lang", LANGUAGE)
            .append_pair("max", &PAGE_SIZE.to_string())
            .append_pair("page", &page.to_string())
            .append_pair("apikey", &self.api_key);
        Ok(url)
    }

    /// Fetch one page of live articles.
    ///
    /// # Arguments
    ///
    /// * `intent` - Search or headlines request, including the 1-based page
    ///
    /// # Returns
    ///
    /// The decoded articles, in API order. Non-success statuses, undecodable
    /// bodies and empty article lists are all errors; the caller decides how to
    /// fall back.
    #[instrument(level = "info", skip_all, fields(page = intent.page()))]
    pub async fn fetch(&self, intent: &FetchIntent) -> Result<Vec<Article>, FetchError> {
        let url = self.request_url(intent)?;
        let response = self.transport.get(&url).await?;

        if !response.is_success() {
            warn!(
                status = response.status,
                body = %truncate_for_log(&response.body, 300),
                "news API returned an error status"
            );
            return Err(FetchError::Status(response.status));
        }

        let decoded: ArticlesResponse = serde_json::from_str(&response.body)?;
        if decoded.articles.is_empty() {
            return Err(FetchError::Empty);
        }
        Ok(decoded.articles)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::TransportErrorKind;
    use crate::models::Category;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays canned responses and records the URLs it was asked for.
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedTransport {
        responses: RefCell<VecDeque<Result<TransportResponse, TransportError>>>,
        pub(crate) requests: RefCell<Vec<Url>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn respond(self, status: u16, body: impl Into<String>) -> Self {
            self.responses.borrow_mut().push_back(Ok(TransportResponse {
                status,
                body: body.into(),
            }));
            self
        }

        pub(crate) fn fail(self, kind: TransportErrorKind, message: &str) -> Self {
            self.responses
                .borrow_mut()
                .push_back(Err(TransportError::new(kind, message)));
            self
        }
    }

    impl NewsTransport for ScriptedTransport {
        async fn get(&self, url: &Url) -> Result<TransportResponse, TransportError> {
            self.requests.borrow_mut().push(url.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::new(TransportErrorKind::Other, "no scripted response")))
        }
    }

    /// A JSON body carrying `count` articles.
    pub(crate) fn articles_body(count: usize) -> String {
        let articles: Vec<serde_json::Value> = (1..=count)
            .map(|i| {
                serde_json::json!({
                    "title": format!("Live story {}", i),
                    "description": "Reported today",
                    "content": "...",
                    "url": format!("https://example.com/story/{}", i),
                    "image": format!("https://example.com/story/{}.jpg", i),
                    "publishedAt": "2026-10-18T08:00:00Z",
                    "source": { "name": "Example Wire", "url": "https://example.com" }
                })
            })
            .collect();
        serde_json::json!({ "totalArticles": 1000, "articles": articles }).to_string()
    }

    fn api(transport: ScriptedTransport) -> NewsApi<ScriptedTransport> {
        NewsApi::new(transport, "https://news.example/api/v4/", "secret").unwrap()
    }

    #[test]
    fn test_search_url() {
        let api = api(ScriptedTransport::new());
        let url = api
            .request_url(&FetchIntent::Search {
                query: "space & time".to_string(),
                page: 3,
            })
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://news.example/api/v4/search?q=space+%26+time&lang=en&max=10&page=3&apikey=secret"
        );
    }

    #[test]
    fn test_headlines_url() {
        let api = api(ScriptedTransport::new());
        let url = api
            .request_url(&FetchIntent::Headlines {
                category: Category::Technology,
                page: 1,
            })
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://news.example/api/v4/top-headlines?category=technology&lang=en&max=10&page=1&apikey=secret"
        );
    }

    #[test]
    fn test_base_url_without_trailing_slash() {
        let api = NewsApi::new(ScriptedTransport::new(), "https://gnews.io/api/v4", "k").unwrap();
        let url = api
            .request_url(&FetchIntent::Headlines {
                category: Category::General,
                page: 1,
            })
            .unwrap();
        assert_eq!(url.path(), "/api/v4/top-headlines");
    }

    #[tokio::test]
    async fn test_fetch_decodes_articles() {
        let api = api(ScriptedTransport::new().respond(200, articles_body(3)));
        let intent = FetchIntent::Headlines {
            category: Category::Science,
            page: 1,
        };

        let articles = api.fetch(&intent).await.unwrap();
        assert_eq!(articles.len(), 3);
        assert_eq!(articles[2].title, "Live story 3");
        assert_eq!(articles[0].source.name, "Example Wire");
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let api = api(ScriptedTransport::new().respond(500, "{\"errors\":[\"boom\"]}"));
        let intent = FetchIntent::Headlines {
            category: Category::General,
            page: 1,
        };
        assert!(matches!(api.fetch(&intent).await, Err(FetchError::Status(500))));
    }

    #[tokio::test]
    async fn test_fetch_empty_articles_is_an_error() {
        let api = api(ScriptedTransport::new().respond(200, r#"{"totalArticles":0,"articles":[]}"#));
        let intent = FetchIntent::Search {
            query: "nothing".to_string(),
            page: 1,
        };
        assert!(matches!(api.fetch(&intent).await, Err(FetchError::Empty)));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let api = api(ScriptedTransport::new().respond(200, "<html>rate limited</html>"));
        let intent = FetchIntent::Search {
            query: "x".to_string(),
            page: 1,
        };
        assert!(matches!(api.fetch(&intent).await, Err(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn test_fetch_transport_failure() {
        let api = api(ScriptedTransport::new().fail(TransportErrorKind::Connect, "refused"));
        let intent = FetchIntent::Search {
            query: "x".to_string(),
            page: 1,
        };
        match api.fetch(&intent).await {
            Err(FetchError::Transport(e)) => assert_eq!(e.kind, TransportErrorKind::Connect),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    fn http_api(base_url: &str) -> NewsApi<HttpTransport> {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        NewsApi::new(HttpTransport::new(client), base_url, "SECRETKEY123").unwrap()
    }

    fn cors_search() -> FetchIntent {
        FetchIntent::Search {
            query: "cors".to_string(),
            page: 1,
        }
    }

    #[tokio::test]
    async fn test_http_malformed_response_is_loud_and_redacted() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket.write_all(b"NOT HTTP AT ALL\r\n\r\n").await;
            let _ = socket.shutdown().await;
        });

        let api = http_api(&format!("http://{}/api/v4", addr));
        match api.fetch(&cors_search()).await {
            Err(err @ FetchError::Transport(_)) => {
                assert!(!err.is_silent());
                let FetchError::Transport(e) = err else { unreachable!() };
                assert_eq!(e.kind, TransportErrorKind::Other);
                assert!(!e.message.contains("SECRETKEY123"));
                assert!(!e.message.contains("apikey="));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_refused_connection_is_connect_kind() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let api = http_api(&format!("http://127.0.0.1:{}/api/v4", port));
        match api.fetch(&cors_search()).await {
            Err(err @ FetchError::Transport(_)) => {
                assert!(!err.is_silent());
                let FetchError::Transport(e) = err else { unreachable!() };
                assert_eq!(e.kind, TransportErrorKind::Connect);
                assert!(!e.message.contains("SECRETKEY123"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
