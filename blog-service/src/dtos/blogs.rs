use crate::models::MongoBlog;
use serde::{Deserialize, Serialize};

/// `{"message": ..., "data": [...]}` envelope for the list endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct BlogListResponse<T> {
    pub message: String,
    pub data: Vec<T>,
}

impl<T> BlogListResponse<T> {
    pub fn new(message: impl Into<String>, data: Vec<T>) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// JSON view of a document; the ObjectId is rendered as its hex string.
#[derive(Debug, Serialize, Deserialize)]
pub struct MongoBlogResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<MongoBlog> for MongoBlogResponse {
    fn from(blog: MongoBlog) -> Self {
        Self {
            id: blog.id.to_hex(),
            title: blog.title,
            content: blog.content,
            created_at: blog.created_at.to_rfc3339(),
            updated_at: blog.updated_at.to_rfc3339(),
        }
    }
}
