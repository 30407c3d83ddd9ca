use crate::{Error, TransportErrorKind, transport::Verb};
use http::{HeaderMap, StatusCode};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Retry configuration for both async and blocking clients.
///
/// Retries are opt-in: a client built without `with_retry`/`retry_config` sends
/// every request exactly once.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Base delay used for exponential backoff (`base * 2^n`).
    pub base_delay: Duration,
    /// Maximum delay cap for exponential backoff.
    pub max_delay: Duration,
    /// Randomize backoff delays in `[0, cap]`.
    pub jitter: bool,
    /// Also replay `POST` (push) and `PATCH` (update). Defaults to `false`:
    /// a replayed push creates a second child, a replayed increment applies twice.
    pub retry_non_idempotent: bool,
    /// Prefer the server-provided `Retry-After` header when present.
    pub respect_retry_after: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            jitter: true,
            retry_non_idempotent: false,
            respect_retry_after: true,
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn new(max_retries: usize, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            ..Self::default()
        }
    }

    pub(crate) fn allows(&self, verb: Verb) -> bool {
        self.retry_non_idempotent || verb.is_idempotent()
    }

    /// Delay before replaying a response with a retryable status, or `None` when
    /// the response should be returned as is.
    pub(crate) fn delay_for_status(
        &self,
        retries: usize,
        status: StatusCode,
        headers: &HeaderMap,
    ) -> Option<Duration> {
        if retries >= self.max_retries || !is_retryable_status(status) {
            return None;
        }
        let retry_after = self
            .respect_retry_after
            .then(|| parse_retry_after(headers, SystemTime::now()))
            .flatten();
        Some(retry_after.unwrap_or_else(|| self.backoff(retries + 1)))
    }

    /// Delay before replaying after a transport failure, or `None` to give up.
    pub(crate) fn delay_for_error(&self, retries: usize, err: &Error) -> Option<Duration> {
        if retries >= self.max_retries {
            return None;
        }
        match err {
            Error::Transport {
                kind: TransportErrorKind::Timeout | TransportErrorKind::Connect,
                ..
            } => Some(self.backoff(retries + 1)),
            _ => None,
        }
    }

    fn backoff(&self, attempt: usize) -> Duration {
        let cap = backoff_delay(self, attempt);
        if self.jitter { jitter_delay(cap) } else { cap }
    }
}

pub(crate) fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

pub(crate) fn backoff_delay(config: &RetryConfig, attempt: usize) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let exp = 2u32.saturating_pow((attempt - 1).min(31) as u32);
    config.base_delay.saturating_mul(exp).min(config.max_delay)
}

pub(crate) fn parse_retry_after(headers: &HeaderMap, now: SystemTime) -> Option<Duration> {
    let text = headers.get(http::header::RETRY_AFTER)?.to_str().ok()?.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(secs) = text.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    let at = httpdate::parse_http_date(text).ok()?;
    Some(at.duration_since(now).unwrap_or(Duration::ZERO))
}

pub(crate) fn jitter_delay(cap: Duration) -> Duration {
    let max_ms = cap.as_millis().min(u128::from(u64::MAX)) as u64;
    if max_ms == 0 {
        return cap;
    }

    // xorshift over the clock; good enough to spread concurrent clients.
    let mut x = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_nanos() as u64;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    Duration::from_millis(x % (max_ms + 1))
}
