pub mod db;
pub mod store;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use db::Database;
pub use store::PgLogStore;
