//! Repository for connected accounts

use crate::error::DbError;
use calmirror_common::{Account, AccountCredentials};
use std::future::Future;

pub trait AccountRepository {
    /// Inserts or refreshes the account identified by `credentials.email`.
    ///
    /// An existing account keeps its id, and keeps its refresh token when
    /// `credentials.refresh_token` is `None`.
    fn upsert_by_email(
        &self,
        credentials: AccountCredentials,
    ) -> impl Future<Output = Result<Account, DbError>> + Send;

    fn find_by_id(
        &self,
        account_id: &str,
    ) -> impl Future<Output = Result<Option<Account>, DbError>> + Send;
}
