//! Common test utilities for blog-service tests.
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use blog_service::config::{BlogConfig, MongoConfig, PostgresConfig};
use blog_service::models::{MongoBlog, SqlBlog};
use blog_service::services::{MockDocumentStore, MockRelationalStore, MongoBlogStore, PostgresBlogStore};
use blog_service::startup::{build_router, AppState, Application};
use chrono::{TimeZone, Utc};
use mongodb::bson::oid::ObjectId;
use service_core::config::Config as CommonConfig;
use std::sync::{Arc, Once};
use tokio::sync::oneshot;
use tower::ServiceExt;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,blog_service=debug,sqlx=warn")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn sql_blog(id: i64) -> SqlBlog {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    SqlBlog {
        id,
        title: format!("title {}", id),
        content: format!("content {}", id),
        created_at: at,
        updated_at: at,
    }
}

pub fn sql_blogs(count: i64) -> Vec<SqlBlog> {
    (1..=count).map(sql_blog).collect()
}

pub fn mongo_blogs(count: usize) -> Vec<MongoBlog> {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| MongoBlog {
            id: ObjectId::new(),
            title: format!("title {}", i),
            content: format!("content {}", i),
            created_at: at,
            updated_at: at,
        })
        .collect()
}

/// Router over in-memory stores, with handles kept for inspecting calls.
pub struct MockApp {
    pub router: Router,
    pub sql: Arc<MockRelationalStore>,
    pub mongo: Arc<MockDocumentStore>,
}

impl MockApp {
    pub fn new(sql: MockRelationalStore, mongo: MockDocumentStore) -> Self {
        init_tracing();
        let sql = Arc::new(sql);
        let mongo = Arc::new(mongo);
        let state = AppState::new(sql.clone(), mongo.clone());
        Self {
            router: build_router(state),
            sql,
            mongo,
        }
    }

    pub fn seeded(sql_rows: i64, mongo_docs: usize) -> Self {
        Self::new(
            MockRelationalStore::new(sql_blogs(sql_rows)),
            MockDocumentStore::new(mongo_blogs(mongo_docs)),
        )
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .expect("router call failed");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }
}

/// A running application backed by real databases.
pub struct TestApp {
    pub address: String,
    pub postgres: PostgresBlogStore,
    pub mongo: MongoBlogStore,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        init_tracing();

        let postgres_url = std::env::var("TEST_POSTGRES_URL")
            .expect("TEST_POSTGRES_URL must be set to run database tests");
        let mongo_url = std::env::var("TEST_MONGO_URL")
            .expect("TEST_MONGO_URL must be set to run database tests");

        let config = BlogConfig {
            common: CommonConfig { port: 0 },
            service_name: "blog-service-test".to_string(),
            log_level: "debug".to_string(),
            otlp_endpoint: None,
            postgres: PostgresConfig {
                url: postgres_url,
                max_connections: 4,
                min_connections: 1,
                run_migrations: true,
                table: "blogs".to_string(),
                random_view: "random_blogs".to_string(),
            },
            mongodb: MongoConfig {
                uri: mongo_url,
                database: format!("blog_test_{}", ObjectId::new().to_hex()),
                collection: "blogs".to_string(),
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build application");

        let address = format!("http://127.0.0.1:{}", app.port());
        let postgres = app.postgres().clone();
        let mongo = app.mongo().clone();

        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            app.run_until(async {
                rx.await.ok();
            })
            .await
            .ok();
        });

        // Wait for the server to accept requests
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client
                .get(format!("{}/healthz", address))
                .send()
                .await
                .is_ok()
            {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        Self {
            address,
            postgres,
            mongo,
            shutdown: Some(tx),
        }
    }

    pub async fn get(&self, path: &str) -> (StatusCode, serde_json::Value) {
        let response = reqwest::Client::new()
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request");
        let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
        let body = response.json().await.unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    /// Drop the per-test Mongo database and stop the server.
    pub async fn cleanup(mut self) {
        let _ = self.mongo.blogs().drop(None).await;
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
