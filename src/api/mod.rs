//! Database references.
//!
//! The primary surface is reached through the clients:
//! - `Client::reference(path)` / `BlockingClient::reference(path)`
//! - `Client::root()` / `BlockingClient::root()`

pub mod reference;

pub use reference::*;
