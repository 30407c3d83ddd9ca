//! Conservative retry wrapper (async).

use super::retry::RetryConfig;
use crate::{
    Error,
    transport::{
        ResponseMeta, TransportRequest, TransportResponse,
        async_transport::{AsyncTransport, DynAsyncTransport},
    },
};
use async_trait::async_trait;
use tokio::time::sleep;

#[derive(Clone)]
pub struct RetryAsync {
    inner: DynAsyncTransport,
    config: RetryConfig,
}

impl RetryAsync {
    #[must_use]
    pub fn new(inner: DynAsyncTransport, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl AsyncTransport for RetryAsync {
    async fn send(&self, req: TransportRequest) -> Result<TransportResponse, Error> {
        let can_retry = self.config.allows(req.verb);

        let mut retries = 0usize;
        loop {
            let delay = match self.inner.send(req.clone()).await {
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
                sleep(delay).await;
            }
            retries += 1;

            #[cfg(feature = "tracing")]
            tracing::debug!(retries, delay_ms = delay.as_millis() as u64, "replaying request");
        }
    }
}
