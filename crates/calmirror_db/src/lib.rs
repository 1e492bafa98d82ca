//! Mirror store for calmirror
//!
//! Persists connected accounts, the local mirror of each account's provider
//! events and the per-account field mappings, using SQLx's Any driver
//! (SQLite by default).
//!
//! # Example
//!
//! ```rust,no_run
//! use calmirror_db::{DbClient, SqlStore};
//!
//! async fn setup() -> Result<SqlStore, calmirror_db::DbError> {
//!     let client = DbClient::from_url("sqlite://data/calmirror.db").await?;
//!     let store = SqlStore::new(client);
//!     store.init_schema().await?;
//!     Ok(store)
//! }
//! ```

pub mod client;
pub mod error;
pub mod repositories;
pub mod store;

pub use client::{DbClient, DbTransaction};
pub use error::DbError;
pub use repositories::{AccountRepository, FieldMappingRepository, MirrorEventRepository};
pub use store::SqlStore;
