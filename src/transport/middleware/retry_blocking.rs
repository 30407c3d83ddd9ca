//! Conservative retry wrapper (blocking).

use super::retry::RetryConfig;
use crate::{
    Error,
    transport::{
        ResponseMeta, TransportRequest, TransportResponse,
        blocking_transport::{BlockingTransport, DynBlockingTransport},
    },
};
use std::thread::sleep;

#[derive(Clone)]
pub struct RetryBlocking {
    inner: DynBlockingTransport,
    config: RetryConfig,
}

impl RetryBlocking {
    #[must_use]
    pub fn new(inner: DynBlockingTransport, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

impl BlockingTransport for RetryBlocking {
    fn send(&self, req: TransportRequest) -> Result<TransportResponse, Error> {
        let can_retry = self.config.allows(req.verb);

        let mut retries = 0usize;
        loop {
            let delay = match self.inner.send(req.clone()) {
                Ok(mut resp) => {
                    match can_retry
                        .then(|| self.config.delay_for_status(retries, resp.status, &resp.headers))
                        .flatten()
                    {
                        Some(delay) => delay,
                        None => {
                            resp.meta = ResponseMeta {
                                retries: resp.meta.retries.saturating_add(retries),
                            };
                            return Ok(resp);
                        }
                    }
                }
                Err(err) => match can_retry
                    .then(|| self.config.delay_for_error(retries, &err))
                    .flatten()
                {
                    Some(delay) => delay,
                    None => return Err(err),
                },
            };

            if !delay.is_zero() {
                sleep(delay);
            }
            retries += 1;

            #[cfg(feature = "tracing")]
            tracing::debug!(retries, delay_ms = delay.as_millis() as u64, "replaying request");
        }
    }
}
