pub mod blogs;
pub mod pagination;

pub use blogs::{BlogListResponse, MessageResponse, MongoBlogResponse};
pub use pagination::{Page, PageParams, PagingError};
