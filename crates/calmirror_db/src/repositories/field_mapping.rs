//! Repository for per-account field mappings

use crate::error::DbError;
use calmirror_common::{FieldMapping, MappingColumn};
use std::future::Future;

pub trait FieldMappingRepository {
    /// Deactivates every mapping of the account and stores `columns` as the
    /// new active one, in a single transaction.
    fn replace_active(
        &self,
        account_id: &str,
        columns: &[MappingColumn],
    ) -> impl Future<Output = Result<FieldMapping, DbError>> + Send;

    fn find_active_mapping(
        &self,
        account_id: &str,
    ) -> impl Future<Output = Result<Option<FieldMapping>, DbError>> + Send;
}
