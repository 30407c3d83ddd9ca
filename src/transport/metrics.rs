use super::Verb;
use crate::ErrorKind;
use http::StatusCode;
use std::time::Instant;

/// Tracks one request from dispatch to outcome; the in-flight gauge is
/// released on drop whichever way the request ends.
pub(crate) struct RequestMetrics {
    method: &'static str,
    started: Instant,
    inflight: metrics::Gauge,
}

impl RequestMetrics {
    pub(crate) fn start(verb: Verb) -> Self {
        let inflight = metrics::gauge!("firebase_rest_inflight");
        inflight.increment(1.0);
        Self {
            method: verb.as_str(),
            started: Instant::now(),
            inflight,
        }
    }

    pub(crate) fn finish(
        &self,
        status: Option<StatusCode>,
        retries: usize,
        error_kind: Option<ErrorKind>,
    ) {
        let method = self.method;
        let status_class = status.map(status_class).unwrap_or("transport");

        metrics::counter!(
            "firebase_rest_requests_total",
            "method" => method,
            "status_class" => status_class
        )
        .increment(1);
        metrics::histogram!(
            "firebase_rest_request_duration_seconds",
            "method" => method,
            "status_class" => status_class
        )
        .record(self.started.elapsed());

        if retries > 0 {
            metrics::counter!("firebase_rest_retries_total", "method" => method)
                .increment(retries as u64);
        }

        if let Some(kind) = error_kind {
            metrics::counter!(
                "firebase_rest_errors_total",
                "method" => method,
                "kind" => error_kind_label(kind)
            )
            .increment(1);
        }
    }
}

impl Drop for RequestMetrics {
    fn drop(&mut self) {
        self.inflight.decrement(1.0);
    }
}

fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

fn error_kind_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::BadRequest => "bad_request",
        ErrorKind::Auth => "auth",
        ErrorKind::NotFound => "not_found",
        ErrorKind::RateLimited => "rate_limited",
        ErrorKind::Api => "api",
        ErrorKind::Transport => "transport",
        ErrorKind::Decode => "decode",
        ErrorKind::InvalidConfig => "invalid_config",
        ErrorKind::InvalidRequest => "invalid_request",
    }
}
