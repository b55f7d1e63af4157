//! PostgreSQL access for the relational read and refresh paths.

use crate::config::PostgresConfig;
use crate::dtos::Page;
use crate::models::{NewBlog, SqlBlog};
use crate::services::metrics::record_query;
use crate::services::store::RelationalBlogStore;
use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};
use std::time::{Duration, Instant};
use tracing::{info, instrument};

const STORE: &str = "postgres";

/// Rows per INSERT statement when seeding; three binds per row stays far below the 65535 limit.
const INSERT_BATCH_SIZE: usize = 1000;

/// Connection pool plus the names of the source table and its random view.
#[derive(Clone)]
pub struct PostgresBlogStore {
    pool: PgPool,
    table: String,
    view: String,
}

impl PostgresBlogStore {
    /// Open the pool and make sure the server answers.
    #[instrument(skip(config), fields(service = "blog-service"))]
    pub async fn connect(config: &PostgresConfig) -> Result<Self, AppError> {
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(&config.url)
            .await
            .map_err(|e| AppError::database("failed to connect to postgres", e))?;

        let store = Self::from_pool(pool, &config.table, &config.random_view);
        store.health_check().await?;

        info!("PostgreSQL connection pool established");

        Ok(store)
    }

    /// Wrap an existing pool. Names must already be validated identifiers.
    pub fn from_pool(pool: PgPool, table: &str, view: &str) -> Self {
        Self {
            pool,
            table: table.to_string(),
            view: view.to_string(),
        }
    }

    /// Create the `blogs` table and the `random_blogs` view if they are missing.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::database("migration failed", e))?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Replace every row of the source table with `blogs`, in one transaction.
    #[instrument(skip(self, blogs), fields(count = blogs.len()))]
    pub async fn replace_all(&self, blogs: &[NewBlog]) -> Result<(), AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database("failed to begin transaction", e))?;

        sqlx::query(&format!("DELETE FROM {}", self.table))
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database("failed to clear blogs", e))?;

        for chunk in blogs.chunks(INSERT_BATCH_SIZE) {
            let mut builder: QueryBuilder<Postgres> =
                QueryBuilder::new(format!("INSERT INTO {} (id, title, content) ", self.table));
            builder.push_values(chunk, |mut row, blog| {
                row.push_bind(blog.id)
                    .push_bind(&blog.title)
                    .push_bind(&blog.content);
            });
            builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database("failed to insert blogs", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database("failed to commit seed", e))?;

        info!(table = %self.table, "Blogs replaced");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }
}

#[async_trait]
impl RelationalBlogStore for PostgresBlogStore {
    #[instrument(skip(self), fields(view = %self.view))]
    async fn list_random(&self, page: Page) -> Result<Vec<SqlBlog>, AppError> {
        let started = Instant::now();

        // No ORDER BY: the view's stored order is the shuffle from the last refresh.
        let sql = format!(
            "SELECT id, title, content, created_at, updated_at FROM {} LIMIT $1 OFFSET $2",
            self.view
        );
        let result = sqlx::query_as::<_, SqlBlog>(&sql)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await;

        record_query(STORE, "list_random", started.elapsed(), result.is_ok());

        result.map_err(|e| AppError::database("failed to get blogs", e))
    }

    #[instrument(skip(self), fields(view = %self.view))]
    async fn refresh_random(&self) -> Result<(), AppError> {
        let started = Instant::now();

        let result = sqlx::query(&format!("REFRESH MATERIALIZED VIEW {}", self.view))
            .execute(&self.pool)
            .await;

        record_query(STORE, "refresh_random", started.elapsed(), result.is_ok());

        result.map_err(|e| AppError::database("failed to randomize blogs", e))?;
        info!("Random view refreshed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("postgres health check failed", e))?;
        Ok(())
    }
}
