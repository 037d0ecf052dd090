//! Shared test utilities for integration tests.
//!
//! Provides a `TestClient` that drives the application through its router
//! against an in-memory database. The AI client is left unconfigured, so
//! every categorization resolves to its deterministic fallback and no test
//! ever touches the network.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use smartledger::config::Config;
use smartledger::db::{create_in_memory_pool, migrations, queries};
use smartledger::ledger::LedgerStore;
use smartledger::models::Transaction;
use smartledger::services::ai_client::AiClient;
use smartledger::services::insight_scheduler::InsightScheduler;
use smartledger::handlers;
use smartledger::state::AppState;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub struct TestClient {
    pub state: AppState,
}

impl TestClient {
    /// Fresh in-memory database, migrated, with an unconfigured AI client.
    /// Must be called from within a tokio runtime (the insight scheduler
    /// spawns a task).
    pub fn new() -> Self {
        let pool = create_in_memory_pool().expect("Failed to create in-memory pool");
        {
            let conn = pool.get().expect("Failed to get connection");
            migrations::run_migrations(&conn, Path::new("migrations"))
                .expect("Failed to run migrations");
        }

        let config = Config {
            host: "127.0.0.1".into(),
            port: 7080,
            database_path: PathBuf::from(":memory:"),
            migrations_path: PathBuf::from("migrations"),
            static_path: PathBuf::from("static"),
            ai_api_key: String::new(),
            ai_base_url: "http://127.0.0.1:1".into(),
            ai_model: "test-model".into(),
            insight_debounce: Duration::from_millis(20),
        };

        let ledger = LedgerStore::load(pool.clone());
        let ai = AiClient::new(config.ai_settings()).expect("Failed to create AI client");
        let insights = InsightScheduler::spawn(
            ledger.subscribe(),
            Arc::new(ai.clone()),
            config.insight_debounce,
        );

        let state = AppState {
            db: pool,
            config: Arc::new(config),
            ledger,
            ai,
            insights,
        };

        Self { state }
    }

    pub fn router(&self) -> Router {
        handlers::routes().with_state(self.state.clone())
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// Get JSON from an endpoint and parse it.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        uri: &str,
    ) -> (StatusCode, Option<T>) {
        let (status, body) = self.get(uri).await;
        let parsed = serde_json::from_str(&body).ok();
        (status, parsed)
    }

    /// Make a POST request with a JSON body and return status and body.
    pub async fn post_json(&self, uri: &str, json: serde_json::Value) -> (StatusCode, String) {
        let response = self
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(json.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// Make a DELETE request and return status and body.
    pub async fn delete(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .router()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// Record a transaction through the API and return the created entity.
    /// With no category override, the unconfigured AI client yields the
    /// per-type fallback ("General" / "Income").
    pub async fn create_transaction(
        &self,
        amount: f64,
        description: &str,
        kind: &str,
        category: Option<&str>,
    ) -> Transaction {
        let mut body = serde_json::json!({
            "amount": amount,
            "description": description,
            "type": kind,
        });
        if let Some(category) = category {
            body["category"] = serde_json::Value::String(category.into());
        }

        let (status, body) = self.post_json("/api/transactions", body).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        serde_json::from_str(&body).expect("create response is a Transaction")
    }

    /// Read the persisted ledger record straight from the key-value table.
    pub fn persisted_ledger(&self) -> Option<serde_json::Value> {
        let conn = self.state.db.get().expect("Failed to get connection");
        queries::ledger::load(&conn)
            .expect("kv read failed")
            .map(|json| serde_json::from_str(&json).expect("persisted record is valid JSON"))
    }
}
