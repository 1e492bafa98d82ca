// --- File: crates/calmirror_sync/src/error.rs ---
use crate::reconcile::ReconcileReport;
use calmirror_common::{
    external_service_error, internal_error, not_found, validation_error, CalmirrorError,
    ProviderError,
};
use calmirror_db::DbError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Calendar provider error: {0}")]
    Upstream(#[from] ProviderError),
    #[error("Storage error: {0}")]
    Storage(#[from] DbError),
    #[error("{} of the account's records could not be written", .0.failed.len())]
    PartialWrite(ReconcileReport),
}

impl From<SyncError> for CalmirrorError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::NotFound(what) => not_found(what),
            SyncError::InvalidInput(msg) => validation_error(msg),
            // Provider and storage details stay in the log.
            SyncError::Upstream(e) => {
                error!("Calendar provider failure: {}", e);
                external_service_error("google_calendar", "calendar provider request failed")
            }
            SyncError::Storage(e) => {
                error!("Mirror store failure: {}", e);
                CalmirrorError::DatabaseError("mirror store unavailable".to_string())
            }
            SyncError::PartialWrite(report) => {
                for failure in &report.failed {
                    error!(
                        "Record {} not reconciled: {}",
                        failure.provider_event_id, failure.reason
                    );
                }
                internal_error(format!(
                    "{} records could not be reconciled",
                    report.failed.len()
                ))
            }
        }
    }
}
