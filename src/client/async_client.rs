//! High-level asynchronous database client.

use super::{ClientConfig, Observer, Settings};
use crate::{
    Auth, DatabaseRef, DbPath, Error, RequestHookContext,
    transport::{
        async_transport::{DynAsyncTransport, ReqwestAsync},
        middleware::{Hooked, RetryAsync, RetryConfig},
        request::{Request, Response},
    },
};
use http::{HeaderMap, HeaderValue, header::HeaderName};
use serde::de::DeserializeOwned;
use std::{sync::Arc, time::Duration};
use url::Url;

/// Configures and constructs [`Client`].
pub struct ClientBuilder {
    settings: Settings,
}

impl ClientBuilder {
    /// Read `FIREBASE_DATABASE_URL` and, when set, `FIREBASE_AUTH_TOKEN`.
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            settings: Settings::from_env()?,
        })
    }

    pub fn auth(mut self, auth: Auth) -> Self {
        self.settings.auth = Some(auth);
        self
    }

    /// Send `auth=<token>` with every request: an ID token or a legacy
    /// database secret.
    pub fn auth_token(self, token: impl Into<String>) -> Self {
        self.auth(Auth::token(token))
    }

    /// Send `access_token=<token>` with every request (Google OAuth2).
    pub fn access_token(self, token: impl Into<String>) -> Self {
        self.auth(Auth::access_token(token))
    }

    pub fn no_system_proxy(mut self) -> Self {
        self.settings.transport.no_proxy = true;
        self
    }

    /// Accept invalid TLS certificates (**dangerous**). Useful against a
    /// local emulator behind a self-signed proxy.
    pub fn danger_accept_invalid_certs(mut self, yes: bool) -> Self {
        self.settings.transport.insecure = yes;
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.settings.transport.user_agent = ua.into();
        self
    }

    /// Timeout of each request; defaults to 5 seconds.
    pub fn timeout(mut self, value: Duration) -> Self {
        self.settings.transport.timeout = value;
        self
    }

    pub fn connect_timeout(mut self, value: Duration) -> Self {
        self.settings.transport.connect_timeout = value;
        self
    }

    pub fn default_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.settings.default_headers.insert(name, value);
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.settings.default_headers.extend(headers);
        self
    }

    /// Add a query parameter sent with every request, e.g. `("ns", "demo")`
    /// against the emulator.
    pub fn default_query_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.default_query.push((key.into(), value.into()));
        self
    }

    /// Keep (redacted) response bodies on errors. On by default.
    pub fn capture_body_snippet(mut self, enabled: bool) -> Self {
        self.settings.body_snippet.enabled = enabled;
        self
    }

    pub fn max_body_snippet_bytes(mut self, max_bytes: usize) -> Self {
        self.settings.body_snippet.max_bytes = max_bytes;
        self
    }

    /// Replay reads, sets and removes on 429/502/503/504 and connection failures.
    pub fn with_retry(self, max_retries: usize, base_delay: Duration) -> Self {
        self.retry_config(RetryConfig::new(max_retries, base_delay))
    }

    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.settings.retry = Some(config);
        self
    }

    /// Add a hook invoked for every request attempt (including retries).
    pub fn request_hook<F>(mut self, hook: F) -> Self
    where
        F: for<'a> Fn(RequestHookContext<'a>) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.settings.request_hook = Some(Arc::new(hook));
        self
    }

    pub fn build(self) -> Result<Client, Error> {
        let mut settings = self.settings;
        let mut transport: DynAsyncTransport =
            Arc::new(ReqwestAsync::try_new(&settings.transport)?);
        if let Some(hook) = settings.request_hook.take() {
            transport = Arc::new(Hooked::new(transport, hook));
        }
        if let Some(retry) = settings.retry.take() {
            transport = Arc::new(RetryAsync::new(transport, retry));
        }

        Ok(Client {
            inner: Arc::new(Inner {
                config: settings.into_config(),
                transport,
            }),
        })
    }
}

/// Asynchronous handle on one database. Cheap to clone.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

struct Inner {
    config: ClientConfig,
    transport: DynAsyncTransport,
}

impl Client {
    pub fn builder(base: impl AsRef<str>) -> Result<ClientBuilder, Error> {
        Ok(ClientBuilder {
            settings: Settings::new(base.as_ref())?,
        })
    }

    pub fn new(base: impl AsRef<str>) -> Result<Self, Error> {
        Self::builder(base)?.build()
    }

    /// See [`ClientBuilder::from_env`].
    pub fn from_env() -> Result<Self, Error> {
        ClientBuilder::from_env()?.build()
    }

    /// The database root URL, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.config.base
    }

    /// A reference to `path`, relative to the database root.
    #[must_use]
    pub fn reference(&self, path: impl Into<DbPath>) -> DatabaseRef {
        DatabaseRef::new(self.clone(), path.into())
    }

    #[must_use]
    pub fn root(&self) -> DatabaseRef {
        self.reference(DbPath::root())
    }

    pub(crate) fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub(crate) async fn send_json<T: DeserializeOwned + Send + 'static>(
        &self,
        req: Request,
    ) -> Result<T, Error> {
        let resp = self.execute_request(&req).await?;
        self.inner.config.decode(req.verb, &req.path, &resp)
    }

    pub(crate) async fn execute_request(&self, req: &Request) -> Result<Response, Error> {
        let config = &self.inner.config;
        let wire = config.prepare(req)?;
        let url = wire.url.clone();
        let observer = Observer::start(req.verb, &url);

        let sent = self.inner.transport.send(wire);
        #[cfg(feature = "tracing")]
        let sent = tracing::Instrument::instrument(sent, observer.span().clone());

        let result = sent.await;
        let retries = result.as_ref().map_or(0, |resp| resp.meta.retries);
        let outcome = result.and_then(|resp| config.check(req.verb, &url, resp));
        observer.finish(&outcome, retries);
        outcome
    }
}
