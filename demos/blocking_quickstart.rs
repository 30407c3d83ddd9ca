//! Blocking demo mirroring `async_quickstart`.
//!
//! Build with:
//! ```bash
//! cargo run --no-default-features --features blocking,rustls --example blocking_quickstart
//! ```
//!
//! Env vars: `FIREBASE_DATABASE_URL`, optional `FIREBASE_AUTH_TOKEN`,
//! `DEMO_PATH` (default: `demo`).

use firebase_rest::{BlockingClient, Query};
use serde_json::json;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    let client = BlockingClient::from_env()?;
    let path = std::env::var("DEMO_PATH").unwrap_or_else(|_| "demo".to_owned());
    let demo = client.reference(path).with_timeout(Duration::from_secs(10));

    demo.child("counter").set(&0)?;
    demo.child("counter").silent().put(&1)?;
    let counter: i64 = demo.child("counter").get()?;
    println!("counter = {counter}");

    let id = demo.child("log").push(&json!({ "event": "started" }))?;
    println!("log entry {id} at {}", demo.child("log").child(id.as_str()));

    let pretty: serde_json::Value = demo.get_with(&Query::new().shallow())?;
    println!("shallow view: {pretty}");

    match demo.parent() {
        Some(parent) => println!("parent: {parent}"),
        None => println!("{demo} is the database root"),
    }

    demo.remove()?;
    Ok(())
}
