use super::Verb;
use crate::{DbPath, Error};
use http::{HeaderMap, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

/// One call against a database location, before URL resolution and credentials.
#[derive(Clone, Debug)]
pub struct Request {
    pub verb: Verb,
    pub path: DbPath,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    /// Serialized JSON body of a write.
    pub payload: Option<Vec<u8>>,
    pub timeout_override: Option<Duration>,
}

impl Request {
    #[must_use]
    pub fn new(verb: Verb, path: DbPath) -> Self {
        Self {
            verb,
            path,
            query: Vec::new(),
            headers: HeaderMap::new(),
            payload: None,
            timeout_override: None,
        }
    }

    #[must_use]
    pub fn query_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Serialize `value` as the JSON payload.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, Error> {
        self.payload = Some(serde_json::to_vec(value).map_err(Error::payload)?);
        Ok(self)
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout_override = timeout;
        self
    }
}

#[derive(Clone, Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    /// Decode the body; an empty body (`204`, `print=silent`) decodes as JSON `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_slice(b"null");
        }
        serde_json::from_slice(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn empty_body_decodes_as_null() {
        let resp = Response {
            status: StatusCode::NO_CONTENT,
            headers: HeaderMap::new(),
            body: Vec::new(),
        };
        assert_eq!(resp.json::<Value>().unwrap(), Value::Null);
        assert_eq!(resp.json::<Option<String>>().unwrap(), None);
    }

    #[test]
    fn json_payload_is_compact() {
        let req = Request::new(Verb::Put, DbPath::parse("users/alice"))
            .json(&json!({ "age": 31 }))
            .unwrap();
        assert_eq!(req.payload.as_deref(), Some(&br#"{"age":31}"#[..]));
    }
}
