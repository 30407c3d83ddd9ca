//! Query-string options understood by the REST API.

use crate::Error;
use serde_json::Value;
use std::time::Duration;

/// Longest server-side read timeout the database honours.
pub const MAX_SERVER_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Ordering for filtered reads, rendered as the `orderBy` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderBy {
    Key,
    Value,
    Priority,
    /// A child key or nested path, e.g. `"height"` or `"dimensions/height"`.
    Child(String),
}

impl OrderBy {
    #[must_use]
    pub fn child(path: impl Into<String>) -> Self {
        Self::Child(path.into())
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Key => "$key",
            Self::Value => "$value",
            Self::Priority => "$priority",
            Self::Child(path) => path,
        }
    }
}

/// The `print` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    /// Human-readable JSON.
    Pretty,
    /// No response body (`204 No Content`); decoded as `null`.
    Silent,
}

impl PrintMode {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Silent => "silent",
        }
    }
}

/// The `writeSizeLimit` parameter: the largest write the server will accept
/// before refusing it, trading payload size against write latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteSizeLimit {
    Tiny,
    Small,
    Medium,
    Large,
    Unlimited,
}

impl WriteSizeLimit {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Tiny => "tiny",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Unlimited => "unlimited",
        }
    }
}

/// Filters and formatting for reads.
///
/// ```
/// use firebase_rest::{OrderBy, Query};
///
/// let query = Query::new()
///     .order_by(OrderBy::child("score"))
///     .start_at(100)
///     .limit_to_first(10);
/// # let _ = query;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    order_by: Option<OrderBy>,
    start_at: Option<Value>,
    end_at: Option<Value>,
    equal_to: Option<Value>,
    limit_to_first: Option<u32>,
    limit_to_last: Option<u32>,
    shallow: bool,
    print: Option<PrintMode>,
    export: bool,
    timeout: Option<Duration>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by = Some(order);
        self
    }

    #[must_use]
    pub fn start_at(mut self, value: impl Into<Value>) -> Self {
        self.start_at = Some(value.into());
        self
    }

    #[must_use]
    pub fn end_at(mut self, value: impl Into<Value>) -> Self {
        self.end_at = Some(value.into());
        self
    }

    #[must_use]
    pub fn equal_to(mut self, value: impl Into<Value>) -> Self {
        self.equal_to = Some(value.into());
        self
    }

    #[must_use]
    pub fn limit_to_first(mut self, n: u32) -> Self {
        self.limit_to_first = Some(n);
        self
    }

    #[must_use]
    pub fn limit_to_last(mut self, n: u32) -> Self {
        self.limit_to_last = Some(n);
        self
    }

    /// Return `true` in place of every child value instead of the full subtree.
    #[must_use]
    pub fn shallow(mut self) -> Self {
        self.shallow = true;
        self
    }

    #[must_use]
    pub fn print(mut self, mode: PrintMode) -> Self {
        self.print = Some(mode);
        self
    }

    /// Include priorities in the response (`format=export`).
    #[must_use]
    pub fn export(mut self) -> Self {
        self.export = true;
        self
    }

    /// Ask the server to give up after `timeout` (at most 15 minutes).
    #[must_use]
    pub fn server_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn has_filters(&self) -> bool {
        self.start_at.is_some()
            || self.end_at.is_some()
            || self.equal_to.is_some()
            || self.limit_to_first.is_some()
            || self.limit_to_last.is_some()
    }

    /// Render as query pairs, rejecting combinations the server refuses.
    pub fn to_pairs(&self) -> Result<Vec<(String, String)>, Error> {
        if self.shallow && (self.order_by.is_some() || self.has_filters()) {
            return Err(Error::invalid_request(
                "shallow cannot be combined with orderBy or filtering parameters",
            ));
        }
        if self.order_by.is_none() && self.has_filters() {
            return Err(Error::invalid_request("filtering parameters require orderBy"));
        }
        if self.limit_to_first.is_some() && self.limit_to_last.is_some() {
            return Err(Error::invalid_request(
                "limitToFirst and limitToLast are mutually exclusive",
            ));
        }
        if self.equal_to.is_some() && (self.start_at.is_some() || self.end_at.is_some()) {
            return Err(Error::invalid_request(
                "equalTo cannot be combined with startAt or endAt",
            ));
        }

        let mut pairs = Vec::new();
        if let Some(order) = &self.order_by {
            pairs.push(("orderBy".to_owned(), json_text(&Value::from(order.as_str()))));
        }
        for (name, value) in [
            ("startAt", &self.start_at),
            ("endAt", &self.end_at),
            ("equalTo", &self.equal_to),
        ] {
            if let Some(value) = value {
                pairs.push((name.to_owned(), json_text(value)));
            }
        }
        if let Some(n) = self.limit_to_first {
            pairs.push(("limitToFirst".to_owned(), n.to_string()));
        }
        if let Some(n) = self.limit_to_last {
            pairs.push(("limitToLast".to_owned(), n.to_string()));
        }
        if self.shallow {
            pairs.push(("shallow".to_owned(), "true".to_owned()));
        }
        if let Some(mode) = self.print {
            pairs.push(("print".to_owned(), mode.as_str().to_owned()));
        }
        if self.export {
            pairs.push(("format".to_owned(), "export".to_owned()));
        }
        if let Some(timeout) = self.timeout {
            pairs.push(("timeout".to_owned(), render_timeout(timeout)?));
        }
        Ok(pairs)
    }
}

fn json_text(value: &Value) -> String {
    // `Value`'s Display is its compact JSON encoding.
    value.to_string()
}

/// Render a server-side timeout in the largest whole unit: `ms`, `s` or `min`.
pub(crate) fn render_timeout(timeout: Duration) -> Result<String, Error> {
    let ms = timeout.as_millis();
    if ms == 0 {
        return Err(Error::invalid_request("server timeout must be at least 1ms"));
    }
    if timeout > MAX_SERVER_TIMEOUT {
        return Err(Error::invalid_request("server timeout cannot exceed 15 minutes"));
    }
    Ok(if ms % 60_000 == 0 {
        format!("{}min", ms / 60_000)
    } else if ms % 1_000 == 0 {
        format!("{}s", ms / 1_000)
    } else {
        format!("{ms}ms")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(query: &Query) -> Vec<(String, String)> {
        query.to_pairs().unwrap()
    }

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_owned(), v.to_owned())
    }

    #[test]
    fn order_by_and_bounds_are_json_encoded() {
        let query = Query::new()
            .order_by(OrderBy::child("dimensions/height"))
            .start_at("a")
            .end_at(3)
            .limit_to_first(2);
        assert_eq!(
            pairs(&query),
            vec![
                pair("orderBy", "\"dimensions/height\""),
                pair("startAt", "\"a\""),
                pair("endAt", "3"),
                pair("limitToFirst", "2"),
            ]
        );
    }

    #[test]
    fn special_orderings_use_dollar_keys() {
        let query = Query::new().order_by(OrderBy::Key).equal_to("alice");
        assert_eq!(
            pairs(&query),
            vec![pair("orderBy", "\"$key\""), pair("equalTo", "\"alice\"")]
        );
    }

    #[test]
    fn formatting_flags_render() {
        let query = Query::new()
            .shallow()
            .print(PrintMode::Pretty)
            .export()
            .server_timeout(Duration::from_secs(90));
        assert_eq!(
            pairs(&query),
            vec![
                pair("shallow", "true"),
                pair("print", "pretty"),
                pair("format", "export"),
                pair("timeout", "90s"),
            ]
        );
    }

    #[test]
    fn rejects_inconsistent_combinations() {
        assert!(Query::new().limit_to_last(1).to_pairs().is_err());
        assert!(
            Query::new()
                .shallow()
                .order_by(OrderBy::Key)
                .to_pairs()
                .is_err()
        );
        assert!(
            Query::new()
                .order_by(OrderBy::Value)
                .limit_to_first(1)
                .limit_to_last(1)
                .to_pairs()
                .is_err()
        );
        assert!(
            Query::new()
                .order_by(OrderBy::Value)
                .equal_to(1)
                .start_at(0)
                .to_pairs()
                .is_err()
        );
    }

    #[test]
    fn timeout_uses_largest_whole_unit() {
        assert_eq!(render_timeout(Duration::from_millis(250)).unwrap(), "250ms");
        assert_eq!(render_timeout(Duration::from_secs(3)).unwrap(), "3s");
        assert_eq!(render_timeout(Duration::from_secs(120)).unwrap(), "2min");
        assert!(render_timeout(Duration::ZERO).is_err());
        assert!(render_timeout(Duration::from_secs(16 * 60)).is_err());
    }
}
