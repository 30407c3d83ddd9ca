//! Values exchanged with the database.

use crate::Error;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// The child name generated by the server for a `push`.
///
/// Push names sort chronologically, so children created by repeated pushes
/// list in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PushId {
    name: String,
}

impl PushId {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl From<PushId> for String {
    fn from(value: PushId) -> Self {
        value.name
    }
}

impl std::fmt::Display for PushId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Placeholders the server replaces at write time.
///
/// ```
/// use firebase_rest::ServerValue;
/// use serde_json::json;
///
/// let payload = json!({ "text": "hi", "sentAt": ServerValue::timestamp() });
/// assert_eq!(payload["sentAt"], json!({ ".sv": "timestamp" }));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ServerValue(Value);

impl ServerValue {
    /// Milliseconds since the Unix epoch, as observed by the server.
    #[must_use]
    pub fn timestamp() -> Self {
        Self(json!({ ".sv": "timestamp" }))
    }

    /// Atomically add `delta` to the current numeric value (missing counts as 0).
    #[must_use]
    pub fn increment(delta: impl Into<serde_json::Number>) -> Self {
        let delta: serde_json::Number = delta.into();
        Self(json!({ ".sv": { "increment": delta } }))
    }

    /// Fractional variant of [`ServerValue::increment`]. NaN and infinities
    /// have no JSON form and are refused.
    pub fn increment_f64(delta: f64) -> Result<Self, Error> {
        let delta = serde_json::Number::from_f64(delta).ok_or_else(|| {
            Error::invalid_request(format!("increment {delta} is not a finite number"))
        })?;
        Ok(Self::increment(delta))
    }
}

impl From<ServerValue> for Value {
    fn from(value: ServerValue) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_id_deserializes_from_server_reply() {
        let id: PushId = serde_json::from_str(r#"{"name":"-NxYz012abc"}"#).unwrap();
        assert_eq!(id.as_str(), "-NxYz012abc");
    }

    #[test]
    fn increment_renders_server_placeholder() {
        let value = serde_json::to_value(ServerValue::increment(5)).unwrap();
        assert_eq!(value, json!({ ".sv": { "increment": 5 } }));
    }

    #[test]
    fn fractional_increment_rejects_non_finite() {
        let value = serde_json::to_value(ServerValue::increment_f64(0.5).unwrap()).unwrap();
        assert_eq!(value, json!({ ".sv": { "increment": 0.5 } }));
        let err = ServerValue::increment_f64(f64::NAN).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidRequest);
        assert!(ServerValue::increment_f64(f64::INFINITY).is_err());
    }
}
