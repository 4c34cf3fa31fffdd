pub mod client;
pub mod query;
pub mod rows;

pub use client::HttpStoreClient;
pub use query::{Direction, SelectQuery};
