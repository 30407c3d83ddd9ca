//! Paths, query options and values.

pub mod common;
pub mod path;
pub mod query;

pub use common::*;
pub use path::*;
pub use query::*;
