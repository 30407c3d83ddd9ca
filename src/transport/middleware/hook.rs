//! Runs the client's request hook in front of each attempt.

use crate::transport::{TransportRequest, TransportResponse};
use crate::{Error, RequestHook, RequestHookContext};

#[cfg(feature = "async")]
use crate::transport::async_transport::AsyncTransport;
#[cfg(feature = "blocking")]
use crate::transport::blocking_transport::BlockingTransport;

/// Wraps either transport kind; stack it below the retry layer so replays
/// pass through the hook as well.
#[derive(Clone)]
pub struct Hooked<T> {
    inner: T,
    hook: RequestHook,
}

impl<T> Hooked<T> {
    pub fn new(inner: T, hook: RequestHook) -> Self {
        Self { inner, hook }
    }

    fn apply(&self, req: &mut TransportRequest) -> Result<(), Error> {
        (self.hook)(RequestHookContext::of(req))
    }
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl<T: AsyncTransport> AsyncTransport for Hooked<T> {
    async fn send(&self, mut req: TransportRequest) -> Result<TransportResponse, Error> {
        self.apply(&mut req)?;
        self.inner.send(req).await
    }
}

#[cfg(feature = "blocking")]
impl<T: BlockingTransport> BlockingTransport for Hooked<T> {
    fn send(&self, mut req: TransportRequest) -> Result<TransportResponse, Error> {
        self.apply(&mut req)?;
        self.inner.send(req)
    }
}
