use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Rejected input. The message is returned to the caller verbatim.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A store call failed. `message` is the generic text shown to callers;
    /// `detail` is always logged and only returned when `expose_detail` is set.
    #[error("{message}: {detail}")]
    DatabaseError {
        message: String,
        detail: anyhow::Error,
        expose_detail: bool,
    },

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn database(message: impl Into<String>, detail: impl Into<anyhow::Error>) -> Self {
        AppError::DatabaseError {
            message: message.into(),
            detail: detail.into(),
            expose_detail: false,
        }
    }

    /// Replace the caller-facing message of a database error, keeping its detail.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        match self {
            AppError::DatabaseError {
                detail,
                expose_detail,
                ..
            } => AppError::DatabaseError {
                message: message.into(),
                detail,
                expose_detail,
            },
            other => other,
        }
    }

    /// Return the underlying error text in the response body as `error`.
    pub fn exposing_detail(self) -> Self {
        match self {
            AppError::DatabaseError {
                message, detail, ..
            } => AppError::DatabaseError {
                message,
                detail,
                expose_detail: true,
            },
            other => other,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DatabaseError { .. }
            | AppError::ConfigError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::BadRequest(message) => ErrorResponse {
                message,
                error: None,
            },
            AppError::DatabaseError {
                message,
                detail,
                expose_detail,
            } => {
                tracing::error!(error = %detail, "{}", message);
                ErrorResponse {
                    message,
                    error: expose_detail.then(|| detail.to_string()),
                }
            }
            AppError::ServiceUnavailable(detail) => ErrorResponse {
                message: "service unavailable".to_string(),
                error: Some(detail),
            },
            AppError::ConfigError(err) => ErrorResponse {
                message: "configuration error".to_string(),
                error: Some(err.to_string()),
            },
            AppError::InternalError(err) => {
                tracing::error!(error = ?err, "Unhandled internal error");
                ErrorResponse {
                    message: "internal server error".to_string(),
                    error: Some(err.to_string()),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
