pub mod geo;
pub mod migrate;
pub mod reviews;
pub mod sessions;
pub mod shops;
pub mod types;
pub mod users;

pub use sqlx::sqlite::SqlitePool;
pub use types::*;
