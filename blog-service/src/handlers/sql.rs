use crate::dtos::{BlogListResponse, MessageResponse, PageParams};
use crate::models::SqlBlog;
use crate::startup::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

/// `GET /sql/blog` - one page of the random view.
pub async fn list_blogs(
    State(state): State<AppState>,
    params: PageParams,
) -> Result<impl IntoResponse, AppError> {
    let page = params.parse()?;

    let blogs: Vec<SqlBlog> = state
        .sql
        .list_random(page)
        .await
        .map_err(|e| e.with_message("failed to get blogs"))?;

    tracing::debug!(limit = page.limit, offset = page.offset, count = blogs.len(), "Listed sql blogs");

    Ok((
        StatusCode::OK,
        Json(BlogListResponse::new("get sql blog posts", blogs)),
    ))
}

/// `GET /sql/random` - rebuild the random view before answering.
pub async fn randomize(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state
        .sql
        .refresh_random()
        .await
        .map_err(|e| e.with_message("failed to randomize blogs").exposing_detail())?;

    Ok((StatusCode::OK, Json(MessageResponse::new("seed successfully"))))
}
