use super::{TransportOptions, TransportRequest, TransportResponse, Verb};
use crate::error::{Error, TransportErrorKind};
use http::header::CONTENT_TYPE;
use std::sync::Arc;
use ureq::{Agent, Body, RequestBuilder, typestate::WithBody};

/// Trait implemented by any blocking HTTP layer.
pub trait BlockingTransport: Send + Sync + 'static {
    fn send(&self, req: TransportRequest) -> Result<TransportResponse, Error>;
}

pub type DynBlockingTransport = Arc<dyn BlockingTransport>;

impl<T: BlockingTransport + ?Sized> BlockingTransport for Arc<T> {
    fn send(&self, req: TransportRequest) -> Result<TransportResponse, Error> {
        (**self).send(req)
    }
}

/// `ureq` backed transport used by [`crate::BlockingClient`].
#[derive(Clone)]
pub struct UreqBlocking {
    agent: Agent,
}

impl UreqBlocking {
    pub fn try_new(options: &TransportOptions) -> Result<Self, Error> {
        let mut config = Agent::config_builder()
            .http_status_as_error(false)
            .user_agent(options.user_agent.as_str())
            .timeout_global(Some(options.timeout))
            .timeout_connect(Some(options.connect_timeout));
        if options.no_proxy {
            config = config.proxy(None);
        }
        if options.insecure {
            let tls = ureq::tls::TlsConfig::builder()
                .disable_verification(true)
                .build();
            config = config.tls_config(tls);
        }
        Ok(Self {
            agent: Agent::new_with_config(config.build()),
        })
    }
}

/// Query, headers and the per-request timeout; identical for every verb.
fn prepare<B>(call: RequestBuilder<B>, req: &TransportRequest) -> RequestBuilder<B> {
    req.headers
        .iter()
        .fold(call.query_pairs(req.query_pairs()), |call, (name, value)| {
            call.header(name, value)
        })
        .config()
        .timeout_global(Some(req.timeout))
        .build()
}

fn send_payload(
    call: RequestBuilder<WithBody>,
    payload: Option<Vec<u8>>,
) -> Result<http::Response<Body>, ureq::Error> {
    match payload {
        Some(json) => call.header(CONTENT_TYPE, "application/json").send(json),
        None => call.send_empty(),
    }
}

fn classify(err: &ureq::Error) -> TransportErrorKind {
    use std::io::ErrorKind as Io;

    match err {
        ureq::Error::Timeout(_) => TransportErrorKind::Timeout,
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => TransportErrorKind::Connect,
        ureq::Error::Io(io) => match io.kind() {
            Io::TimedOut => TransportErrorKind::Timeout,
            Io::ConnectionRefused
            | Io::ConnectionReset
            | Io::ConnectionAborted
            | Io::NotConnected => TransportErrorKind::Connect,
            _ => TransportErrorKind::Other,
        },
        _ => TransportErrorKind::Other,
    }
}

impl BlockingTransport for UreqBlocking {
    fn send(&self, mut req: TransportRequest) -> Result<TransportResponse, Error> {
        let verb = req.verb;
        let payload = req.payload.take();
        let failed = |err: ureq::Error| Error::Transport {
            verb,
            path: req.url.path().into(),
            kind: classify(&err),
            source: Box::new(err),
        };

        let url = req.url.as_str();
        let sent = match verb {
            Verb::Get => prepare(self.agent.get(url), &req).call(),
            Verb::Delete => prepare(self.agent.delete(url), &req).call(),
            Verb::Put => send_payload(prepare(self.agent.put(url), &req), payload),
            Verb::Post => send_payload(prepare(self.agent.post(url), &req), payload),
            Verb::Patch => send_payload(prepare(self.agent.patch(url), &req), payload),
        };

        let mut response = sent.map_err(failed)?;
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(failed)?;
        let (parts, _) = response.into_parts();

        Ok(TransportResponse::new(parts.status, parts.headers, body))
    }
}
