//! HTTP handlers for blog-service.

pub mod health;
pub mod mongo;
pub mod sql;

pub use health::{healthz, metrics_endpoint, readiness_check};
