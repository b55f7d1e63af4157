//! MongoDB access for the document read path.

use crate::config::MongoConfig;
use crate::dtos::Page;
use crate::models::{MongoBlog, NewBlog};
use crate::services::metrics::record_query;
use crate::services::store::DocumentBlogStore;
use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, Document},
    options::FindOptions,
    Client as MongoClient, Collection, Database,
};
use service_core::error::AppError;
use std::time::Instant;
use tracing::{info, instrument};

const STORE: &str = "mongodb";

#[derive(Clone)]
pub struct MongoBlogStore {
    client: MongoClient,
    db: Database,
    collection: String,
}

impl MongoBlogStore {
    /// Build the client and make sure the deployment answers a ping.
    pub async fn connect(config: &MongoConfig) -> Result<Self, AppError> {
        info!(database = %config.database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(&config.uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::database("failed to connect to mongo", e)
        })?;
        let db = client.database(&config.database);

        let store = Self {
            client,
            db,
            collection: config.collection.clone(),
        };
        store.health_check().await?;

        info!(database = %config.database, "Successfully connected to MongoDB database");
        Ok(store)
    }

    pub fn blogs(&self) -> Collection<MongoBlog> {
        self.db.collection(&self.collection)
    }

    /// Untyped view of the same collection, so each document can be decoded separately.
    fn raw_blogs(&self) -> Collection<Document> {
        self.db.collection(&self.collection)
    }

    /// Drop every document and insert `blogs` with fresh ids and timestamps.
    #[instrument(skip(self, blogs), fields(count = blogs.len()))]
    pub async fn replace_all(&self, blogs: &[NewBlog]) -> Result<(), AppError> {
        let collection = self.blogs();

        collection
            .delete_many(doc! {}, None)
            .await
            .map_err(|e| AppError::database("failed to clear blogs", e))?;

        if blogs.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let documents: Vec<MongoBlog> = blogs.iter().cloned().map(|b| b.into_mongo(now)).collect();

        collection
            .insert_many(documents, None)
            .await
            .map_err(|e| AppError::database("failed to insert blogs", e))?;

        info!(collection = %self.collection, "Blogs replaced");
        Ok(())
    }

    pub async fn shutdown(self) {
        self.client.shutdown().await;
        info!("MongoDB client disconnected");
    }
}

/// Decode one raw document. A bad document fails the request that read it, nothing else.
pub fn decode_blog(document: Document) -> Result<MongoBlog, AppError> {
    let id = document
        .get("_id")
        .map(|id| id.to_string())
        .unwrap_or_else(|| "<missing _id>".to_string());

    bson::from_document::<MongoBlog>(document).map_err(|e| {
        AppError::database(
            "failed to get blogs",
            anyhow::anyhow!("failed to decode document {}: {}", id, e),
        )
    })
}

#[async_trait]
impl DocumentBlogStore for MongoBlogStore {
    #[instrument(skip(self), fields(collection = %self.collection))]
    async fn list(&self, page: Page) -> Result<Vec<MongoBlog>, AppError> {
        // The driver reads a zero limit as "no limit".
        if page.is_empty() {
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let result = self.find_page(page).await;
        record_query(STORE, "list", started.elapsed(), result.is_ok());
        result
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::database("mongo health check failed", e)
            })?;
        Ok(())
    }
}

impl MongoBlogStore {
    async fn find_page(&self, page: Page) -> Result<Vec<MongoBlog>, AppError> {
        let find_options = FindOptions::builder()
            .skip(page.skip())
            .limit(page.limit)
            .build();

        let mut cursor = self
            .raw_blogs()
            .find(doc! {}, find_options)
            .await
            .map_err(|e| AppError::database("failed to get blogs", e))?;

        let mut blogs = Vec::new();
        while let Some(document) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::database("failed to get blogs", e))?
        {
            blogs.push(decode_blog(document)?);
        }

        Ok(blogs)
    }
}
