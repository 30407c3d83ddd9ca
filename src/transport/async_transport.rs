use super::{TransportOptions, TransportRequest, TransportResponse, Verb};
use crate::error::{Error, TransportErrorKind};
use async_trait::async_trait;
use http::{HeaderValue, header::CONTENT_TYPE};
use std::sync::Arc;

/// Trait implemented by any async HTTP layer.
#[async_trait]
pub trait AsyncTransport: Send + Sync + 'static {
    async fn send(&self, req: TransportRequest) -> Result<TransportResponse, Error>;
}

pub type DynAsyncTransport = Arc<dyn AsyncTransport>;

#[async_trait]
impl<T: AsyncTransport + ?Sized> AsyncTransport for Arc<T> {
    async fn send(&self, req: TransportRequest) -> Result<TransportResponse, Error> {
        (**self).send(req).await
    }
}

/// `reqwest` backed transport used by [`crate::Client`].
#[derive(Clone)]
pub struct ReqwestAsync {
    http: reqwest::Client,
}

impl ReqwestAsync {
    pub fn try_new(options: &TransportOptions) -> Result<Self, Error> {
        #[cfg(feature = "rustls")]
        install_ring_provider();

        let builder = reqwest::Client::builder()
            .user_agent(options.user_agent.as_str())
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout)
            .danger_accept_invalid_certs(options.insecure);
        let builder = if options.no_proxy {
            builder.no_proxy()
        } else {
            builder
        };

        let http = builder.build().map_err(|err| Error::InvalidConfig {
            message: "cannot build the reqwest client".into(),
            source: Some(Box::new(err)),
        })?;
        Ok(Self { http })
    }
}

/// rustls refuses to pick a crypto provider on its own when several are linked.
#[cfg(feature = "rustls")]
fn install_ring_provider() {
    static INSTALLED: std::sync::OnceLock<()> = std::sync::OnceLock::new();
    INSTALLED.get_or_init(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

fn failed(verb: Verb, req_path: &str, err: reqwest::Error) -> Error {
    let kind = if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() {
        TransportErrorKind::Connect
    } else {
        TransportErrorKind::Other
    };
    Error::Transport {
        verb,
        path: req_path.into(),
        kind,
        source: Box::new(err),
    }
}

#[async_trait]
impl AsyncTransport for ReqwestAsync {
    async fn send(&self, req: TransportRequest) -> Result<TransportResponse, Error> {
        let verb = req.verb;
        let path = req.url.path().to_owned();

        let mut call = self
            .http
            .request(verb.method(), req.url.clone())
            .query(&req.query)
            .headers(req.headers)
            .timeout(req.timeout);
        if let Some(payload) = req.payload {
            call = call
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(payload);
        }

        let resp = call.send().await.map_err(|err| failed(verb, &path, err))?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await.map_err(|err| failed(verb, &path, err))?;

        Ok(TransportResponse::new(status, headers, body.to_vec()))
    }
}
