//! Firebase Realtime Database REST client.
//!
//! A [`Client`] (async, `reqwest`) or [`BlockingClient`] (blocking, `ureq`)
//! hands out references to locations in the database tree. Navigation is pure
//! path math; every operation is one HTTP request against `<location>.json`
//! with the credential in the query string.
//!
//! ```no_run
//! # async fn demo() -> Result<(), firebase_rest::Error> {
//! use firebase_rest::Client;
//! use serde_json::json;
//!
//! let client = Client::builder("https://demo.firebaseio.com")?
//!     .auth_token("id-token")
//!     .build()?;
//!
//! let users = client.reference("users");
//! users.child("alice").set(&json!({ "age": 31 })).await?;
//! let id = users.push(&json!({ "name": "bob" })).await?;
//! let bob: serde_json::Value = users.child(id.as_str()).get().await?;
//! # let _ = bob;
//! # Ok(())
//! # }
//! ```

// compile-time guard: enable at least one client kind.
#[cfg(not(any(feature = "async", feature = "blocking")))]
compile_error!("Enable at least one of: `async` (default) or `blocking`.");

pub mod api;
mod auth;
pub mod client;
mod error;
mod request_hook;
pub mod transport;
pub mod types;
mod util;

pub use api::*;
pub use auth::{Auth, SecretString};
#[cfg(feature = "blocking")]
pub use client::{BlockingClient, BlockingClientBuilder};
#[cfg(feature = "async")]
pub use client::{Client, ClientBuilder};
pub use client::{AUTH_TOKEN_ENV, DATABASE_URL_ENV, DEFAULT_TIMEOUT};
pub use error::{BodySnippetConfig, Error, ErrorKind, HttpError, Result, TransportErrorKind};
pub use request_hook::{RequestHook, RequestHookContext};
pub use transport::{Verb, middleware::RetryConfig};
pub use types::*;
