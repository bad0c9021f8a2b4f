//! Request/response model and the network seam for the cache controller.

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// HTTP-equivalent request method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
}

/// An outgoing resource request seen by the controller
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    /// True for full-page loads (navigation requests)
    pub navigate: bool,
}

impl Request {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            navigate: false,
        }
    }

    /// A plain GET for an asset or API-equivalent resource
    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url)
    }

    /// A full-page navigation request
    pub fn navigation(url: Url) -> Self {
        Self {
            method: Method::Get,
            url,
            navigate: true,
        }
    }

    /// Cache key for this request: path plus query, origin-relative
    pub fn cache_key(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_string(),
        }
    }
}

/// Classification of a response body's provenance
///
/// Mirrors the distinction between readable same-origin responses, readable
/// cross-origin responses, and opaque cross-origin responses whose status
/// cannot be inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Same-origin, fully readable
    Basic,
    /// Cross-origin but readable
    Cors,
    /// Cross-origin, not readable; never cache-safe
    Opaque,
    /// A synthesized network-failure response
    Error,
}

/// A response to an intercepted request
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub kind: ResponseKind,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    /// A successful same-origin response with the given content type
    pub fn ok(content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            kind: ResponseKind::Basic,
            content_type: Some(content_type.to_string()),
            body: body.into(),
        }
    }

    /// A successful HTML response
    pub fn ok_html(body: impl Into<Vec<u8>>) -> Self {
        Self::ok("text/html; charset=utf-8", body)
    }

    /// The placeholder document served when a navigation cannot be satisfied
    /// from cache or network
    pub fn offline_page() -> Self {
        Self::ok_html("<!doctype html><title>Offline</title><h1>Offline</h1>")
    }

    /// The synthesized empty response for a failed asset fetch with no cache
    pub fn gateway_timeout() -> Self {
        Self {
            status: 504,
            kind: ResponseKind::Basic,
            content_type: None,
            body: Vec::new(),
        }
    }

    /// A synthesized response standing in for a network failure on a
    /// pass-through request
    pub fn network_error() -> Self {
        Self {
            status: 0,
            kind: ResponseKind::Error,
            content_type: None,
            body: Vec::new(),
        }
    }

    /// Whether the status is in the success range and the response is not a
    /// synthesized error
    pub fn is_ok(&self) -> bool {
        self.kind != ResponseKind::Error && (200..300).contains(&self.status)
    }

    /// Whether this response may be written into the cache
    ///
    /// Network errors, non-OK statuses, and opaque responses are never
    /// cached.
    pub fn is_cache_safe(&self) -> bool {
        self.is_ok() && matches!(self.kind, ResponseKind::Basic | ResponseKind::Cors)
    }

    /// Body decoded as UTF-8, lossily
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Errors produced by the network seam
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network unavailable: {0}")]
    Unavailable(String),

    #[error("Request timed out: {0}")]
    Timeout(String),
}

/// The network seam the controller fetches through
///
/// Implementations resolve a request to a response or fail with a
/// `FetchError`; the controller owns every fallback decision.
#[async_trait]
pub trait NetworkFetch: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}
