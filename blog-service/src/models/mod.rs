//! Blog post records as stored in each backend.

mod blog;

pub use blog::{MongoBlog, NewBlog, SqlBlog};
