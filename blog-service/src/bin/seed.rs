//! Populate PostgreSQL and MongoDB with generated blog posts.

use blog_service::config::BlogConfig;
use blog_service::services::seed::{generate_blogs, seed_mongo, seed_postgres, SeedOptions};
use blog_service::services::{MongoBlogStore, PostgresBlogStore};
use service_core::error::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = BlogConfig::load()?;
    let options = SeedOptions::from_env()?;

    let blogs = generate_blogs(&mut rand::thread_rng(), options.count);
    tracing::info!(count = blogs.len(), "Generated blog posts");

    let postgres = PostgresBlogStore::connect(&config.postgres).await?;
    if config.postgres.run_migrations {
        postgres.run_migrations().await?;
    }
    let mongo = MongoBlogStore::connect(&config.mongodb).await?;

    let outcome = async {
        seed_postgres(&postgres, &blogs).await?;
        seed_mongo(&mongo, &blogs).await
    }
    .await;

    postgres.close().await;
    mongo.shutdown().await;

    outcome
}
