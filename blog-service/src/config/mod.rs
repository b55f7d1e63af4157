use serde::Deserialize;
use service_core::config::{self as core_config, get_env, get_env_parsed, is_production};
use service_core::error::AppError;
use std::env;

const MAX_IDENTIFIER_LEN: usize = 63;

#[derive(Debug, Clone, Deserialize)]
pub struct BlogConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub postgres: PostgresConfig,
    pub mongodb: MongoConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub run_migrations: bool,
    /// Source table the seeder writes to.
    pub table: String,
    /// Materialized view the list endpoint reads from.
    pub random_view: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

impl BlogConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common = core_config::Config::load()?;
        let is_prod = is_production();

        let config = BlogConfig {
            common,
            service_name: get_env("SERVICE_NAME", Some("blog-service"), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            postgres: PostgresConfig {
                url: get_env("POSTGRES_URL", None, is_prod)?,
                max_connections: get_env_parsed("POSTGRES_MAX_CONNECTIONS", "10", is_prod)?,
                min_connections: get_env_parsed("POSTGRES_MIN_CONNECTIONS", "1", is_prod)?,
                run_migrations: get_env_parsed("POSTGRES_RUN_MIGRATIONS", "true", is_prod)?,
                table: get_env("BLOG_TABLE", Some("blogs"), is_prod)?,
                random_view: get_env("RANDOM_VIEW", Some("random_blogs"), is_prod)?,
            },
            mongodb: MongoConfig {
                uri: get_env("MONGO_URL", None, is_prod)?,
                database: get_env("MONGO_DATABASE", Some("test"), is_prod)?,
                collection: get_env("MONGO_COLLECTION", Some("blogs"), is_prod)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Table and view names end up inside SQL text, so only bare identifiers are accepted.
    pub fn validate(&self) -> Result<(), AppError> {
        validate_identifier("BLOG_TABLE", &self.postgres.table)?;
        validate_identifier("RANDOM_VIEW", &self.postgres.random_view)?;

        if self.postgres.min_connections > self.postgres.max_connections {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "POSTGRES_MIN_CONNECTIONS ({}) exceeds POSTGRES_MAX_CONNECTIONS ({})",
                self.postgres.min_connections,
                self.postgres.max_connections
            )));
        }

        Ok(())
    }
}

fn validate_identifier(key: &str, name: &str) -> Result<(), AppError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid_start && valid_rest && name.len() <= MAX_IDENTIFIER_LEN {
        Ok(())
    } else {
        Err(AppError::ConfigError(anyhow::anyhow!(
            "{} must be a plain SQL identifier, got '{}'",
            key,
            name
        )))
    }
}
