//! HTTP transport layers.
//!
//! * `ReqwestAsync` backs [`crate::Client`], `UreqBlocking` backs
//!   [`crate::BlockingClient`].
//! * Middleware in [`middleware`] wraps any transport behind the same trait.

use http::{HeaderMap, StatusCode};
use std::time::Duration;
use url::Url;

#[cfg(feature = "async")]
pub mod async_transport;
#[cfg(feature = "blocking")]
pub mod blocking_transport;
#[cfg(feature = "metrics")]
pub(crate) mod metrics;
pub mod middleware;
pub mod request;
mod verb;

pub use verb::Verb;

/// Connection settings shared by both HTTP stacks.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// Accept invalid TLS certificates.
    pub insecure: bool,
    pub user_agent: String,
    /// Client-wide ceiling; each request also carries its own timeout.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Ignore `HTTP(S)_PROXY` from the environment.
    pub no_proxy: bool,
}

/// A fully resolved request: `.json` URL, merged headers, query pairs with
/// credentials, and the effective timeout.
#[derive(Clone, Debug)]
pub struct TransportRequest {
    pub verb: Verb,
    pub url: Url,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    /// Serialized JSON, present for `PUT`/`POST`/`PATCH`.
    pub payload: Option<Vec<u8>>,
    pub timeout: Duration,
}

impl TransportRequest {
    pub(crate) fn query_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.query.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ResponseMeta {
    /// Attempts replayed by the retry layer.
    pub retries: usize,
}

#[derive(Clone, Debug)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    pub meta: ResponseMeta,
}

impl TransportResponse {
    pub(crate) fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
            meta: ResponseMeta::default(),
        }
    }
}
