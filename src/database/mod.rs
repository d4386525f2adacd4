pub mod connection;
pub mod matches;
pub mod members;
pub mod models;
pub mod setup;

pub use connection::{DbConn, DbPool, create_memory_pool, create_pool, get_connection};
pub use members::SqliteRankStore;
pub use models::*;
