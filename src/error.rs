use crate::transport::Verb;
use http::StatusCode;
use std::{error::Error as StdError, fmt, time::Duration};
use thiserror::Error;
use url::Url;

pub type Result<T> = std::result::Result<T, Error>;

/// Controls how much of a failed response body is kept on [`HttpError`] and
/// [`Error::Decode`].
#[derive(Debug, Clone, Copy)]
pub struct BodySnippetConfig {
    pub enabled: bool,
    pub max_bytes: usize,
}

impl Default for BodySnippetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_bytes: 4096,
        }
    }
}

/// Coarse classification, stable across variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// `400`: invalid data, unknown index, malformed query.
    BadRequest,
    /// `401`/`403`: bad or expired credentials, or denied by security rules.
    Auth,
    /// `404`: the database itself does not exist. Missing locations read as `null`.
    NotFound,
    RateLimited,
    /// Any other 4xx/5xx.
    Api,
    Transport,
    Decode,
    InvalidConfig,
    InvalidRequest,
}

impl ErrorKind {
    fn for_status(status: StatusCode) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest,
            401 | 403 => Self::Auth,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            _ => Self::Api,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Other,
}

/// A 4xx/5xx answer from the database.
#[derive(Debug, Clone)]
pub struct HttpError {
    pub status: StatusCode,
    pub verb: Verb,
    /// `.json` URL without query, so without the credential.
    pub url: Box<Url>,
    /// The server's `error` field, e.g. `Permission denied`.
    pub message: Option<Box<str>>,
    pub body_snippet: Option<Box<str>>,
    /// Parsed `Retry-After`, when the server sent one.
    pub retry_after: Option<Duration>,
}

impl HttpError {
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.path()
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::for_status(self.status)
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} ({} {})", self.status, self.verb, self.path())?;
        match self.message.as_deref() {
            Some(message) => write!(f, ": {message}"),
            None => Ok(()),
        }
    }
}

/// All errors returned by the client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The database answered with a 4xx/5xx; see [`HttpError::kind`].
    #[error("{0}")]
    Status(Box<HttpError>),

    #[error("{verb} {path} did not complete: {source}")]
    Transport {
        verb: Verb,
        path: Box<str>,
        kind: TransportErrorKind,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("reply to {verb} {path} (HTTP {status}) is not the expected JSON: {source}")]
    Decode {
        status: StatusCode,
        verb: Verb,
        /// Database path, e.g. `/users/alice`.
        path: Box<str>,
        body_snippet: Option<Box<str>>,
        #[source]
        source: serde_json::Error,
    },

    /// Bad database URL, environment or client settings.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        message: Box<str>,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// Refused before any I/O: invalid key, inconsistent query, payload that
    /// does not serialize or has the wrong shape.
    #[error("invalid request: {message}")]
    InvalidRequest {
        message: Box<str>,
        #[source]
        source: Option<serde_json::Error>,
    },
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Status(http) => http.kind(),
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
            Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
        }
    }

    /// The HTTP answer behind this error, if the server replied.
    #[must_use]
    pub fn http(&self) -> Option<&HttpError> {
        match self {
            Self::Status(http) => Some(&**http),
            _ => None,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status(http) => Some(http.status),
            Self::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        self.http().and_then(|http| http.retry_after)
    }

    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        self.kind() == ErrorKind::Auth
    }

    /// Rate limiting, gateway failures, timeouts and refused connections.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status(http) => {
                crate::transport::middleware::retry::is_retryable_status(http.status)
            }
            Self::Transport { kind, .. } => *kind != TransportErrorKind::Other,
            _ => false,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into().into_boxed_str(),
            source: None,
        }
    }

    pub(crate) fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into().into_boxed_str(),
            source: None,
        }
    }

    pub(crate) fn payload(source: serde_json::Error) -> Self {
        Self::InvalidRequest {
            message: "payload does not serialize as JSON".into(),
            source: Some(source),
        }
    }
}

impl From<HttpError> for Error {
    fn from(http: HttpError) -> Self {
        Self::Status(Box::new(http))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http_error(status: StatusCode) -> HttpError {
        HttpError {
            status,
            verb: Verb::Get,
            url: Box::new(Url::parse("https://demo.firebaseio.com/users.json").unwrap()),
            message: Some("Permission denied".into()),
            body_snippet: None,
            retry_after: None,
        }
    }

    #[test]
    fn kind_follows_firebase_status_codes() {
        let kind = |status| Error::from(http_error(status)).kind();
        assert_eq!(kind(StatusCode::BAD_REQUEST), ErrorKind::BadRequest);
        assert_eq!(kind(StatusCode::UNAUTHORIZED), ErrorKind::Auth);
        assert_eq!(kind(StatusCode::NOT_FOUND), ErrorKind::NotFound);
        assert_eq!(kind(StatusCode::PRECONDITION_FAILED), ErrorKind::Api);
        assert_eq!(kind(StatusCode::INTERNAL_SERVER_ERROR), ErrorKind::Api);
    }

    #[test]
    fn rate_limit_carries_retry_after() {
        let limited = Error::from(HttpError {
            retry_after: Some(Duration::from_secs(2)),
            ..http_error(StatusCode::TOO_MANY_REQUESTS)
        });
        assert_eq!(limited.kind(), ErrorKind::RateLimited);
        assert!(limited.is_retryable());
        assert_eq!(limited.retry_after(), Some(Duration::from_secs(2)));
        assert!(!Error::from(http_error(StatusCode::BAD_REQUEST)).is_retryable());
    }

    #[test]
    fn http_error_display_includes_server_message() {
        let err = Error::from(http_error(StatusCode::FORBIDDEN));
        assert_eq!(
            err.to_string(),
            "HTTP 403 Forbidden (GET /users.json): Permission denied"
        );
    }
}
