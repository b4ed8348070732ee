//! SQLite persistence for Courier.

pub mod pool;
pub mod user;

pub use pool::DatabasePool;
pub use user::SqliteUserRepository;
