//! Error types for talking to the news API.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Broad class of a transport-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    /// The request was blocked by a cross-origin policy before any response
    /// was visible to us.
    CrossOrigin,
    Other,
}

/// The request never produced a usable HTTP response.
#[derive(Debug, Error)]
#[error("{kind:?} failure: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Classify a failure that only comes with a message, as browser-backed
    /// fetch stacks report them. Native clients should use a structured kind.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = redact_api_key(&message.into());
        let kind = if looks_cross_origin(&message) {
            TransportErrorKind::CrossOrigin
        } else {
            TransportErrorKind::Other
        };
        Self { kind, message }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        // The request URL carries the search text and the API key; neither
        // belongs in a log line or in classification.
        let e = e.without_url();
        let kind = if e.is_timeout() {
            TransportErrorKind::Timeout
        } else if e.is_connect() {
            TransportErrorKind::Connect
        } else {
            TransportErrorKind::Other
        };
        Self {
            kind,
            message: redact_api_key(&error_chain(&e)),
        }
    }
}

static API_KEY_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(apikey=)[^&\s)]*").expect("api key pattern is valid"));

/// Mask the value of any `apikey=` query pair in `message`.
pub fn redact_api_key(message: &str) -> String {
    API_KEY_PAIR.replace_all(message, "${1}***").into_owned()
}

fn error_chain(e: &(dyn std::error::Error + 'static)) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

static CROSS_ORIGIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bcors\b|cross-origin|access-control-allow-origin|failed to fetch")
        .expect("cross-origin pattern is valid")
});

/// Last-resort check for errors that carry no structured kind.
///
/// Browser fetch stacks report blocked cross-origin requests only through the
/// message text, so this is inherently fragile; prefer a typed
/// [`TransportErrorKind::CrossOrigin`] wherever the transport can supply one.
pub fn looks_cross_origin(message: &str) -> bool {
    CROSS_ORIGIN.is_match(message)
}

/// Why a live fetch fell back to sample data.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("news API responded with HTTP {0}")]
    Status(u16),

    #[error("malformed news API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("news API returned no articles")]
    Empty,

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

impl FetchError {
    /// Failures that fall back to sample data without telling the user.
    ///
    /// Only cross-origin blocks qualify: in a sandboxed client they are the
    /// expected state of affairs rather than an API fault.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            FetchError::Transport(TransportError {
                kind: TransportErrorKind::CrossOrigin,
                ..
            })
        )
    }
}
