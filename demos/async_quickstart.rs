//! End-to-end async demo:
//! 1. write a profile   2. push messages   3. ordered read
//! 4. shallow listing   5. clean up
//!
//! Set env vars to run against a real database (or the emulator):
//! - `FIREBASE_DATABASE_URL` (e.g. `https://demo-default-rtdb.firebaseio.com`)
//! - `FIREBASE_AUTH_TOKEN` (optional ID token or database secret)

use firebase_rest::{ClientBuilder, OrderBy, Query, ServerValue};
use serde_json::json;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) build async client from the environment
    let client = ClientBuilder::from_env()?
        .no_system_proxy()
        .timeout(Duration::from_secs(10))
        .with_retry(2, Duration::from_millis(200))
        .build()?;
    let demo = client.reference("demo");

    // 2) profile
    let alice = demo.child("users/alice");
    let stored = alice
        .set(&json!({ "name": "Alice", "score": 72, "joined": ServerValue::timestamp() }))
        .await?;
    println!("wrote {alice}: {stored}");
    let bumped = alice
        .update(&json!({ "score": ServerValue::increment(3) }))
        .await?;
    println!("score is now {}", bumped["score"]);

    // 3) messages
    for text in ["hello", "world"] {
        let id = demo.child("messages").push(&json!({ "text": text })).await?;
        println!("pushed {id}");
    }

    // 4) ordered read
    let latest: serde_json::Value = demo
        .child("messages")
        .get_with(&Query::new().order_by(OrderBy::Key).limit_to_last(1))
        .await?;
    println!("latest message: {latest}");

    // 5) shallow listing
    println!("children of {demo}: {:?}", demo.shallow_keys().await?);

    demo.remove().await?;
    let gone: Option<serde_json::Value> = demo.get().await?;
    println!("after remove: {gone:?}");

    println!("database root: {}", client.root());
    Ok(())
}
