//! Store seams the HTTP handlers depend on.

use crate::dtos::Page;
use crate::models::{MongoBlog, SqlBlog};
use async_trait::async_trait;
use service_core::error::AppError;

/// Relational read path over the precomputed random view.
#[async_trait]
pub trait RelationalBlogStore: Send + Sync {
    /// Read one page of the view. Row order is whatever the view holds.
    async fn list_random(&self, page: Page) -> Result<Vec<SqlBlog>, AppError>;

    /// Rebuild the view from its source table. Returns once the rebuild has committed.
    async fn refresh_random(&self) -> Result<(), AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

/// Document read path over the blog collection.
#[async_trait]
pub trait DocumentBlogStore: Send + Sync {
    /// Read one page of the collection in natural order.
    async fn list(&self, page: Page) -> Result<Vec<MongoBlog>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}
