//! In-memory stores for exercising handlers without live databases.

use crate::dtos::Page;
use crate::models::{MongoBlog, SqlBlog};
use crate::services::mongo::decode_blog;
use crate::services::store::{DocumentBlogStore, RelationalBlogStore};
use async_trait::async_trait;
use mongodb::bson::{self, Document};
use service_core::error::AppError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

fn page_of<T: Clone>(rows: &[T], page: Page) -> Vec<T> {
    rows.iter()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .cloned()
        .collect()
}

/// Mock relational store: a source table and a view that only changes on refresh.
#[derive(Default)]
pub struct MockRelationalStore {
    source: RwLock<Vec<SqlBlog>>,
    view: RwLock<Vec<SqlBlog>>,
    failure: Option<String>,
    list_calls: AtomicU64,
    refresh_calls: AtomicU64,
}

impl MockRelationalStore {
    /// Source and view both start out holding `rows`.
    pub fn new(rows: Vec<SqlBlog>) -> Self {
        Self {
            source: RwLock::new(rows.clone()),
            view: RwLock::new(rows),
            ..Self::default()
        }
    }

    /// Every call fails with `message` as the underlying error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Change the source table; the view keeps its old rows until refreshed.
    pub fn set_source(&self, rows: Vec<SqlBlog>) {
        if let Ok(mut source) = self.source.write() {
            *source = rows;
        }
    }

    pub fn list_calls(&self) -> u64 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> u64 {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    fn check(&self, message: &str) -> Result<(), AppError> {
        match &self.failure {
            Some(detail) => Err(AppError::database(message, anyhow::anyhow!(detail.clone()))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RelationalBlogStore for MockRelationalStore {
    async fn list_random(&self, page: Page) -> Result<Vec<SqlBlog>, AppError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check("failed to get blogs")?;

        let view = self
            .view
            .read()
            .map_err(|_| AppError::InternalError(anyhow::anyhow!("view lock poisoned")))?;
        Ok(page_of(&view, page))
    }

    async fn refresh_random(&self) -> Result<(), AppError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.check("failed to randomize blogs")?;

        let source = self
            .source
            .read()
            .map_err(|_| AppError::InternalError(anyhow::anyhow!("source lock poisoned")))?
            .clone();
        let mut view = self
            .view
            .write()
            .map_err(|_| AppError::InternalError(anyhow::anyhow!("view lock poisoned")))?;
        *view = source;

        tracing::info!("[MOCK] Random view refreshed");
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.check("postgres health check failed")
    }
}

/// Mock document store holding raw documents, decoded on read like the real one.
#[derive(Default)]
pub struct MockDocumentStore {
    documents: Vec<Document>,
    failure: Option<String>,
    list_calls: AtomicU64,
}

impl MockDocumentStore {
    pub fn new(blogs: Vec<MongoBlog>) -> Self {
        let documents = blogs
            .iter()
            .filter_map(|blog| bson::to_document(blog).ok())
            .collect();
        Self::from_documents(documents)
    }

    /// Use arbitrary documents, including ones that do not decode as a blog.
    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self {
            documents,
            ..Self::default()
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn list_calls(&self) -> u64 {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Documents currently held; reads never change this.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }
}

#[async_trait]
impl DocumentBlogStore for MockDocumentStore {
    async fn list(&self, page: Page) -> Result<Vec<MongoBlog>, AppError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(detail) = &self.failure {
            return Err(AppError::database(
                "failed to get blogs",
                anyhow::anyhow!(detail.clone()),
            ));
        }

        page_of(&self.documents, page)
            .into_iter()
            .map(decode_blog)
            .collect()
    }

    async fn health_check(&self) -> Result<(), AppError> {
        match &self.failure {
            Some(detail) => Err(AppError::database(
                "mongo health check failed",
                anyhow::anyhow!(detail.clone()),
            )),
            None => Ok(()),
        }
    }
}
