// --- File: crates/calmirror_sync/src/lib.rs ---
pub mod diff;
#[cfg(test)]
mod diff_proptest;
pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
#[cfg(test)]
pub mod mock;
pub mod reconcile;
pub mod routes;
pub mod webhook;

pub use error::SyncError;
pub use logic::{MirrorStore, SyncSettings, SyncState};
pub use reconcile::{reconcile_account, ReconcileReport};
pub use routes::routes;
