//! The HTTP transport collaborator.
//!
//! The protocol core talks to the network through the [`Transport`] trait:
//! one attempt per call, any HTTP status answered as a [`RawResponse`], and
//! connection-level failures as [`HttpError`]. Bounded retry lives above the
//! trait in [`RetryPolicy`], so stubs and the real [`UreqTransport`] share
//! the same policy.

pub mod http;
pub mod observer;
pub mod retry;

pub use http::{ProxyConfig, ProxyScheme, TransportConfig, UreqTransport};
pub use observer::{BodyFilters, Observer};
pub use retry::RetryPolicy;

use std::time::Duration;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// One outgoing request as the transport sees it: resolved headers, the
/// rendered envelope, and an optional per-request timeout override.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub timeout: Option<Duration>,
}

/// The opaque result of a transport call. Consumed read-only by the response
/// layer; the parsed envelope is derived from `body` on demand.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Transport-level failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HttpError {
    /// An HTTP status outside the acceptable window, carrying the raw body.
    #[error("HTTP error ({status}){}{}", if .body.is_empty() { "" } else { ": " }, .body)]
    Status { status: u16, body: String },

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    /// The bounded retry loop ran out of attempts.
    #[error("Too many failures attempting request. Last error was: {last}")]
    RetriesExhausted { attempts: u32, last: String },
}

impl HttpError {
    /// Transient failures are worth another attempt; everything else is
    /// terminal.
    pub fn is_transient(&self) -> bool {
        matches!(self, HttpError::Timeout | HttpError::Connection(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Performs a single HTTP exchange.
///
/// Implementations answer `Ok` for *every* HTTP status; a 500 may carry a
/// SOAP fault, so status classification belongs to the layers above.
pub trait Transport {
    fn perform(
        &self,
        method: Method,
        url: &str,
        request: &TransportRequest,
    ) -> Result<RawResponse, HttpError>;
}
