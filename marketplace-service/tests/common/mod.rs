#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use marketplace_service::config::{DatabaseConfig, MarketplaceConfig, SERVICE_NAME};
use marketplace_service::services::MarketplaceDb;
use marketplace_service::startup::{build_router, AppState, Application};
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use tower::util::ServiceExt;
use uuid::Uuid;

pub fn config(database: DatabaseConfig) -> MarketplaceConfig {
    MarketplaceConfig {
        common: CoreConfig { port: 0 }, // Random port for testing
        service_name: SERVICE_NAME.to_string(),
        database,
    }
}

/// Router backed by no database at all.
pub fn router_without_store() -> Router {
    build_router(AppState::new(config(DatabaseConfig::default()), None))
}

/// Connection string for a server that never answers, with a short selection timeout.
pub const UNREACHABLE_DATABASE_URL: &str =
    "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200&connectTimeoutMS=200";

pub fn unreachable_database() -> DatabaseConfig {
    DatabaseConfig {
        url: Some(UNREACHABLE_DATABASE_URL.to_string()),
        name: Some("marketplace_unreachable".to_string()),
    }
}

/// Router whose store handle exists but cannot reach its server.
pub async fn router_with_unreachable_store() -> Router {
    let database = unreachable_database();
    let db = MarketplaceDb::connect(UNREACHABLE_DATABASE_URL, "marketplace_unreachable")
        .await
        .expect("client creation should not need a server");
    build_router(AppState::new(config(database), Some(db)))
}

/// Drive one request through `router` and decode the JSON body.
///
/// Non-JSON bodies decode to `Value::Null`.
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.expect("router should respond");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    post_raw(uri, body.to_string())
}

pub fn post_raw(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

/// POST without a `Content-Type` header.
pub fn post_untyped(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// A running server against a throwaway MongoDB database.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: MarketplaceDb,
    pub db_name: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let url = std::env::var("TEST_DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let db_name = format!("marketplace_test_{}", Uuid::new_v4().simple());

        let app = Application::build(config(DatabaseConfig {
            url: Some(url),
            name: Some(db_name.clone()),
        }))
        .await
        .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().cloned().expect("test app should have a database");
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            db_name,
            client,
        }
    }

    pub async fn create_listing(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/listings", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Create a listing that must succeed and return its id.
    pub async fn create_listing_id(&self, body: &Value) -> String {
        let response = self.create_listing(body).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["id"].as_str().expect("id should be a string").to_string()
    }

    pub async fn get_json(&self, path: &str) -> (reqwest::StatusCode, Value) {
        let response = self
            .client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request");
        let status = response.status();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn cleanup(&self) {
        let _ = self.db.database().drop(None).await;
    }
}
