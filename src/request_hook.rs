use crate::{
    Error,
    transport::{TransportRequest, Verb},
};
use http::HeaderMap;
use std::sync::Arc;
use url::Url;

/// What a request hook sees of one attempt; retries call the hook again.
///
/// Only headers are writable. The query already holds the credential, so a
/// hook can check which identity a call runs under.
pub struct RequestHookContext<'a> {
    pub verb: Verb,
    /// `.json` URL, query not included.
    pub url: &'a Url,
    pub headers: &'a mut HeaderMap,
    pub query: &'a [(String, String)],
    /// JSON body of `PUT`/`POST`/`PATCH`.
    pub payload: Option<&'a [u8]>,
}

impl<'a> RequestHookContext<'a> {
    pub(crate) fn of(req: &'a mut TransportRequest) -> Self {
        Self {
            verb: req.verb,
            url: &req.url,
            headers: &mut req.headers,
            query: &req.query,
            payload: req.payload.as_deref(),
        }
    }

    /// First value of query parameter `name`.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

pub type RequestHook =
    Arc<dyn for<'a> Fn(RequestHookContext<'a>) -> Result<(), Error> + Send + Sync + 'static>;
