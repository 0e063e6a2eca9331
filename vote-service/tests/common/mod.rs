#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use vote_service::config::VoteConfig;
use vote_service::handlers::VOTER_COOKIE;
use vote_service::models::VoteRecord;
use vote_service::services::{MockVoteStore, VoteStore};
use vote_service::startup::{build_router, Application};
use vote_service::{AppState, PageSettings};

pub const TEST_HOSTNAME: &str = "vote-test-host";

/// Store that always fails the way an unreachable Redis does.
pub struct FailingVoteStore;

#[async_trait]
impl VoteStore for FailingVoteStore {
    async fn push_vote(&self, _record: &VoteRecord) -> Result<u64, AppError> {
        Err(AppError::from(redis::RedisError::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ))))
    }
}

pub fn test_page() -> PageSettings {
    PageSettings {
        option_a: "Cats".to_string(),
        option_b: "Dogs".to_string(),
        hostname: TEST_HOSTNAME.to_string(),
    }
}

/// In-process router backed by `store`.
pub fn test_router(store: Arc<dyn VoteStore>) -> Router {
    build_router(AppState::new(test_page(), store))
}

pub fn mock_router() -> (Router, Arc<MockVoteStore>) {
    let store = Arc::new(MockVoteStore::new());
    (test_router(store.clone()), store)
}

pub fn test_config(overrides: &[(&str, &str)]) -> VoteConfig {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("HOSTNAME".to_string(), TEST_HOSTNAME.to_string()),
        ("OTLP_ENDPOINT".to_string(), String::new()),
    ]);
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    VoteConfig::from_lookup(CoreConfig { port: 0 }, |key| vars.get(key).cloned())
}

pub fn get_ballot(cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri("/");
    if let Some(voter_id) = cookie {
        builder = builder.header(header::COOKIE, format!("{}={}", VOTER_COOKIE, voter_id));
    }
    builder.body(Body::empty()).unwrap()
}

/// POST `/` with an urlencoded body; `vote: None` sends no `vote` field.
pub fn post_vote(vote: Option<&str>, cookie: Option<&str>) -> Request<Body> {
    let body = match vote {
        Some(vote) => format!("vote={}", vote),
        None => "other=1".to_string(),
    };

    let mut builder = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(voter_id) = cookie {
        builder = builder.header(header::COOKIE, format!("{}={}", VOTER_COOKIE, voter_id));
    }
    builder.body(Body::from(body)).unwrap()
}

/// Full `Set-Cookie` header for `voter_id`, attributes included.
pub fn voter_set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&format!("{}=", VOTER_COOKIE)))
        .map(str::to_string)
}

/// Value of the `voter_id` cookie set by the response, if any.
pub fn voter_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| {
            let pair = value.split(';').next()?.trim();
            let (name, voter_id) = pair.split_once('=')?;
            (name == VOTER_COOKIE).then(|| voter_id.to_string())
        })
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("Response body is not UTF-8")
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    /// Serve the full application on a random port.
    pub async fn spawn_with_store(store: Arc<dyn VoteStore>) -> Self {
        let app = Application::build_with_store(test_config(&[]), store)
            .await
            .expect("Failed to build test application");
        Self::run(app).await
    }

    /// Serve the application wired to the Redis store named by `redis_url`.
    pub async fn spawn_with_redis(redis_url: &str) -> Self {
        let config = test_config(&[("REDIS_URL", redis_url), ("REDIS_TIMEOUT_SECS", "1")]);
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        Self::run(app).await
    }

    async fn run(app: Application) -> Self {
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        let health_url = format!("{}/healthcheck", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }
}
