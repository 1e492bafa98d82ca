//! Repository for mirrored events

use crate::error::DbError;
use calmirror_common::{BatchOutcome, EventFieldsUpdate, MirrorEvent};
use std::future::Future;

pub trait MirrorEventRepository {
    /// All rows of the account with `deleted = false`.
    fn find_active(
        &self,
        account_id: &str,
    ) -> impl Future<Output = Result<Vec<MirrorEvent>, DbError>> + Send;

    /// Stores a new row. A second row with the same account and provider id,
    /// soft-deleted or not, is rejected with [`DbError::Duplicate`].
    fn insert_event(
        &self,
        event: &MirrorEvent,
    ) -> impl Future<Output = Result<(), DbError>> + Send;

    /// Overwrites title, start and end of the given active rows.
    ///
    /// Each record is applied on its own; records that fail or match no
    /// active row are reported in the outcome.
    fn bulk_update(
        &self,
        account_id: &str,
        updates: &[EventFieldsUpdate],
    ) -> impl Future<Output = Result<BatchOutcome, DbError>> + Send;

    /// Flags the given active rows as deleted.
    fn bulk_soft_delete(
        &self,
        account_id: &str,
        provider_event_ids: &[String],
    ) -> impl Future<Output = Result<BatchOutcome, DbError>> + Send;
}
