use crate::dtos::{BlogListResponse, MessageResponse, MongoBlogResponse, PageParams};
use crate::startup::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

/// `GET /mongo/blog` - one page of the collection.
pub async fn list_blogs(
    State(state): State<AppState>,
    params: PageParams,
) -> Result<impl IntoResponse, AppError> {
    let page = params.parse()?;

    let blogs: Vec<MongoBlogResponse> = state
        .mongo
        .list(page)
        .await
        .map_err(|e| e.with_message("failed to get blogs"))?
        .into_iter()
        .map(MongoBlogResponse::from)
        .collect();

    tracing::debug!(limit = page.limit, offset = page.offset, count = blogs.len(), "Listed mongo blogs");

    Ok((
        StatusCode::OK,
        Json(BlogListResponse::new("get mongo blog posts", blogs)),
    ))
}

/// `GET /mongo/random` - placeholder; the collection is left untouched.
pub async fn randomize() -> impl IntoResponse {
    (StatusCode::OK, Json(MessageResponse::new("seed successfully")))
}
