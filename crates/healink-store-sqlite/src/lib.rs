//! SQLite backend for the Healink telemetry and alert stores.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. The connection serialises
//! writes (single-writer append) while WAL mode keeps readers concurrent.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
