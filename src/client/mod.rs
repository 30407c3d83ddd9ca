//! Client implementations (async + optional blocking).
//!
//! Both clients resolve requests the same way through [`ClientConfig`]; they
//! differ only in the transport that carries them.

#[cfg(feature = "async")]
pub mod async_client;
#[cfg(feature = "blocking")]
pub mod blocking_client;

#[cfg(feature = "async")]
pub use async_client::{Client, ClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{BlockingClient, BlockingClientBuilder};

use crate::{
    Auth, BodySnippetConfig, DbPath, Error, HttpError, RequestHook,
    transport::{
        TransportOptions, TransportRequest, TransportResponse, Verb,
        middleware::{RetryConfig, retry::parse_retry_after},
        request::{Request, Response},
    },
    util::{
        diagnostics,
        url::{endpoint_url, location_url, normalize_base_url, sanitize_url_for_error},
    },
};
use http::HeaderMap;
use serde::de::DeserializeOwned;
use std::time::{Duration, SystemTime};
use url::Url;

/// Per-request timeout applied unless the builder or a reference overrides it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Environment variable read by `from_env` for the database URL.
pub const DATABASE_URL_ENV: &str = "FIREBASE_DATABASE_URL";
/// Environment variable read by `from_env` for the optional `auth` token.
pub const AUTH_TOKEN_ENV: &str = "FIREBASE_AUTH_TOKEN";

const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Everything a builder collects; both client kinds are built from it.
pub(crate) struct Settings {
    pub(crate) base: Url,
    pub(crate) auth: Option<Auth>,
    pub(crate) transport: TransportOptions,
    pub(crate) retry: Option<RetryConfig>,
    pub(crate) default_headers: HeaderMap,
    pub(crate) default_query: Vec<(String, String)>,
    pub(crate) body_snippet: BodySnippetConfig,
    pub(crate) request_hook: Option<RequestHook>,
}

impl Settings {
    /// 5 second timeout, no retries, no credential.
    pub(crate) fn new(base: &str) -> Result<Self, Error> {
        Ok(Self {
            base: normalize_base_url(base)?,
            auth: None,
            transport: TransportOptions {
                insecure: false,
                user_agent: DEFAULT_USER_AGENT.to_owned(),
                timeout: DEFAULT_TIMEOUT,
                connect_timeout: DEFAULT_CONNECT_TIMEOUT,
                no_proxy: false,
            },
            retry: None,
            default_headers: HeaderMap::new(),
            default_query: Vec::new(),
            body_snippet: BodySnippetConfig::default(),
            request_hook: None,
        })
    }

    /// `FIREBASE_DATABASE_URL` is required; a blank `FIREBASE_AUTH_TOKEN`
    /// counts as unset.
    pub(crate) fn from_env() -> Result<Self, Error> {
        let url = std::env::var(DATABASE_URL_ENV).map_err(|err| Error::InvalidConfig {
            message: format!("{DATABASE_URL_ENV} is not set").into_boxed_str(),
            source: Some(Box::new(err)),
        })?;
        let mut settings = Self::new(&url)?;
        settings.auth = std::env::var(AUTH_TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .map(Auth::token);
        Ok(settings)
    }

    pub(crate) fn into_config(self) -> ClientConfig {
        ClientConfig {
            base: self.base,
            auth: self.auth,
            timeout: self.transport.timeout,
            default_headers: self.default_headers,
            default_query: self.default_query,
            body_snippet: self.body_snippet,
        }
    }
}

/// Everything a client needs to turn a [`Request`] into a wire request and a
/// wire response into a result.
pub(crate) struct ClientConfig {
    pub(crate) base: Url,
    pub(crate) auth: Option<Auth>,
    pub(crate) timeout: Duration,
    pub(crate) default_headers: HeaderMap,
    pub(crate) default_query: Vec<(String, String)>,
    pub(crate) body_snippet: BodySnippetConfig,
}

impl ClientConfig {
    pub(crate) fn location(&self, path: &DbPath) -> String {
        location_url(&self.base, path)
    }

    pub(crate) fn rest_url(&self, path: &DbPath) -> Result<Url, Error> {
        endpoint_url(&self.base, path)
    }

    /// Resolve the `.json` URL and merge defaults: client headers, then request
    /// headers; client query options, then request options, then credentials.
    pub(crate) fn prepare(&self, req: &Request) -> Result<TransportRequest, Error> {
        let url = self.rest_url(&req.path)?;

        let mut headers = self.default_headers.clone();
        headers.extend(req.headers.clone());

        let mut query = self.default_query.clone();
        query.extend(req.query.iter().cloned());
        if let Some(auth) = &self.auth {
            auth.apply(&mut query);
        }

        Ok(TransportRequest {
            verb: req.verb,
            url,
            headers,
            query,
            payload: req.payload.clone(),
            timeout: req.timeout_override.unwrap_or(self.timeout),
        })
    }

    /// Turn any 4xx/5xx into a typed [`Error`].
    pub(crate) fn check(
        &self,
        verb: Verb,
        url: &Url,
        resp: TransportResponse,
    ) -> Result<Response, Error> {
        if resp.status.is_client_error() || resp.status.is_server_error() {
            let message = diagnostics::extract_message(&resp.body).map(|msg| {
                diagnostics::redact_text(msg.into(), self.auth.as_ref()).into_boxed_str()
            });
            return Err(HttpError {
                status: resp.status,
                verb,
                url: Box::new(sanitize_url_for_error(url)),
                message,
                body_snippet: self.snippet(&resp.body),
                retry_after: parse_retry_after(&resp.headers, SystemTime::now()),
            }
            .into());
        }

        Ok(Response {
            status: resp.status,
            headers: resp.headers,
            body: resp.body,
        })
    }

    pub(crate) fn decode<T: DeserializeOwned>(
        &self,
        verb: Verb,
        path: &DbPath,
        resp: &Response,
    ) -> Result<T, Error> {
        resp.json().map_err(|source| Error::Decode {
            status: resp.status,
            verb,
            path: path.to_string().into_boxed_str(),
            body_snippet: self.snippet(&resp.body),
            source,
        })
    }

    fn snippet(&self, body: &[u8]) -> Option<Box<str>> {
        diagnostics::body_snippet(body, self.body_snippet, self.auth.as_ref())
    }
}

/// Tracing span and metrics for one logical request, retries included.
pub(crate) struct Observer {
    #[cfg(feature = "tracing")]
    started: std::time::Instant,
    #[cfg(feature = "tracing")]
    span: tracing::Span,
    #[cfg(feature = "metrics")]
    metrics: crate::transport::metrics::RequestMetrics,
}

impl Observer {
    #[allow(unused_variables)]
    pub(crate) fn start(verb: Verb, url: &Url) -> Self {
        Self {
            #[cfg(feature = "tracing")]
            started: std::time::Instant::now(),
            #[cfg(feature = "tracing")]
            span: tracing::info_span!(
                "firebase.request",
                http.method = verb.as_str(),
                http.host = %url.host_str().unwrap_or_default(),
                http.path = %url.path(),
                http.status = tracing::field::Empty,
                retries = tracing::field::Empty,
                latency_ms = tracing::field::Empty,
                error_kind = tracing::field::Empty,
            ),
            #[cfg(feature = "metrics")]
            metrics: crate::transport::metrics::RequestMetrics::start(verb),
        }
    }

    #[cfg(feature = "tracing")]
    pub(crate) fn span(&self) -> &tracing::Span {
        &self.span
    }

    pub(crate) fn finish(&self, outcome: &Result<Response, Error>, retries: usize) {
        #[cfg(feature = "tracing")]
        {
            let span = &self.span;
            span.record("retries", retries as i64);
            span.record("latency_ms", self.started.elapsed().as_millis() as i64);
            match outcome {
                Ok(resp) => {
                    span.record("http.status", resp.status.as_u16() as i64);
                }
                Err(err) => {
                    if let Some(status) = err.status() {
                        span.record("http.status", status.as_u16() as i64);
                    }
                    span.record("error_kind", tracing::field::debug(err.kind()));
                    span.in_scope(|| tracing::debug!(error = %err, "request failed"));
                }
            }
        }

        #[cfg(feature = "metrics")]
        {
            let (status, kind) = match outcome {
                Ok(resp) => (Some(resp.status), None),
                Err(err) => (err.status(), Some(err.kind())),
            };
            self.metrics.finish(status, retries, kind);
        }

        let _ = (outcome, retries);
    }
}
