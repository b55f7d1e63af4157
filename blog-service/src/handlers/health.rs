use crate::dtos::MessageResponse;
use crate::services::get_metrics;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;

/// Liveness probe. Never touches a store, so a database outage does not change it.
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(MessageResponse::new("OK")))
}

/// Readiness probe: both stores must answer.
pub async fn readiness_check(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let (sql, mongo) = tokio::join!(state.sql.health_check(), state.mongo.health_check());

    let failures: Vec<String> = [sql, mongo]
        .into_iter()
        .filter_map(|result| result.err().map(|e| e.to_string()))
        .collect();

    if !failures.is_empty() {
        tracing::warn!(failures = ?failures, "Readiness check failed");
        return Err(AppError::ServiceUnavailable(failures.join("; ")));
    }

    Ok((StatusCode::OK, Json(MessageResponse::new("OK"))))
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
