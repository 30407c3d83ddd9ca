//! Transport wrappers: request hooks and retries.

mod hook;
pub mod retry;

#[cfg(feature = "async")]
pub mod retry_async;
#[cfg(feature = "blocking")]
pub mod retry_blocking;

pub use hook::Hooked;
pub use retry::RetryConfig;
#[cfg(feature = "async")]
pub use retry_async::RetryAsync;
#[cfg(feature = "blocking")]
pub use retry_blocking::RetryBlocking;
