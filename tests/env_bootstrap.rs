//! Environment bootstrap lives in its own test binary: it mutates process
//! environment variables.

use anyhow::Result;
#[cfg(feature = "async")]
use firebase_rest::{AUTH_TOKEN_ENV, Client, DATABASE_URL_ENV, ErrorKind};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param, query_param_is_missing},
};

#[cfg(feature = "async")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_from_env_reads_url_and_token() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/settings.json"))
        .and(query_param("auth", "env-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("with token")))
        .expect(1)
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/settings.json"))
        .and(query_param_is_missing("auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("anonymous")))
        .expect(1)
        .mount(&server)
        .await;

    // SAFETY: this binary holds a single test, nothing else reads the environment.
    unsafe {
        std::env::set_var(DATABASE_URL_ENV, format!("{}/", server.uri()));
        std::env::set_var(AUTH_TOKEN_ENV, "env-token");
    }
    let client = Client::from_env()?;
    assert_eq!(client.base_url().as_str(), format!("{}/", server.uri()));
    let seen: String = client.reference("settings").get().await?;
    assert_eq!(seen, "with token");

    unsafe {
        std::env::set_var(AUTH_TOKEN_ENV, "  ");
    }
    let seen: String = Client::from_env()?.reference("settings").get().await?;
    assert_eq!(seen, "anonymous");

    unsafe {
        std::env::remove_var(DATABASE_URL_ENV);
        std::env::remove_var(AUTH_TOKEN_ENV);
    }
    let err = Client::from_env().expect_err("url is required");
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);

    server.verify().await;
    Ok(())
}
