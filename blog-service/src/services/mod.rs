pub mod memory;
pub mod metrics;
pub mod mongo;
pub mod postgres;
pub mod seed;
pub mod store;

pub use memory::{MockDocumentStore, MockRelationalStore};
pub use self::metrics::{get_metrics, init_metrics};
pub use mongo::MongoBlogStore;
pub use postgres::PostgresBlogStore;
pub use store::{DocumentBlogStore, RelationalBlogStore};
