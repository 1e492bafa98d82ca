// --- File: crates/calmirror_sync/src/reconcile.rs ---
use crate::diff;
use crate::error::SyncError;
use calmirror_common::{Account, CalendarProvider, RecordFailure};
use calmirror_db::MirrorEventRepository;
use serde::Serialize;
use tracing::{debug, info, warn};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// What one reconcile did to an account's mirror.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    /// Events listed by the provider.
    pub fetched: usize,
    pub updated: usize,
    pub soft_deleted: usize,
    pub unchanged: usize,
    /// Provider events with no active mirror row; they are not imported.
    pub ignored: usize,
    pub failed: Vec<RecordFailure>,
}

impl ReconcileReport {
    /// A report is complete when every planned record was applied.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Brings the account's active mirror rows in line with the provider's list.
///
/// A provider failure aborts before anything is written. Running it again
/// without upstream changes updates and deletes nothing.
pub async fn reconcile_account<R>(
    store: &R,
    provider: &dyn CalendarProvider,
    account: &Account,
) -> Result<ReconcileReport, SyncError>
where
    R: MirrorEventRepository + Sync,
{
    let provider_events = provider.list_events(account).await?;
    let active = store.find_active(&account.id).await?;
    debug!(
        "Reconciling account {}: {} provider events, {} active rows",
        account.id,
        provider_events.len(),
        active.len()
    );

    let plan = diff::plan(&provider_events, &active);

    let mut report = ReconcileReport {
        fetched: provider_events.len(),
        unchanged: plan.unchanged,
        ignored: plan.ignored,
        failed: plan.failed,
        ..ReconcileReport::default()
    };

    if !plan.updates.is_empty() {
        let outcome = store.bulk_update(&account.id, &plan.updates).await?;
        report.updated = outcome.applied;
        report.failed.extend(outcome.failed);
    }

    if !plan.deletes.is_empty() {
        let outcome = store.bulk_soft_delete(&account.id, &plan.deletes).await?;
        report.soft_deleted = outcome.applied;
        report.failed.extend(outcome.failed);
    }

    if report.is_complete() {
        info!(
            "Mirror synchronized for account {}: fetched={} updated={} soft_deleted={} unchanged={} ignored={}",
            account.id,
            report.fetched,
            report.updated,
            report.soft_deleted,
            report.unchanged,
            report.ignored
        );
    } else {
        warn!(
            "Mirror partially synchronized for account {}: {} records failed",
            account.id,
            report.failed.len()
        );
    }

    Ok(report)
}
