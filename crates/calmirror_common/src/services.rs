// --- File: crates/calmirror_common/src/services.rs ---
//! Service abstractions for the external calendar provider.
//!
//! The sync core only talks to the provider through [`CalendarProvider`], so the
//! Google client can be swapped for an in-memory fake in tests.

use crate::models::{Account, ProviderEvent, ProviderEventDraft};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Failures talking to the calendar provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("authorization failed: {0}")]
    Authorization(String),
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Operations the sync core needs from a calendar provider.
pub trait CalendarProvider: Send + Sync {
    /// Lists every event of the account's calendar, recurring events expanded
    /// into single instances, ordered by start time.
    fn list_events(&self, account: &Account) -> BoxFuture<'_, Vec<ProviderEvent>, ProviderError>;

    /// Creates an event and returns the provider-assigned id.
    fn create_event(
        &self,
        account: &Account,
        draft: ProviderEventDraft,
    ) -> BoxFuture<'_, String, ProviderError>;

    /// Subscribes `callback_address` to change notifications and returns the
    /// channel id, which embeds the account id.
    fn subscribe(
        &self,
        account: &Account,
        callback_address: &str,
    ) -> BoxFuture<'_, String, ProviderError>;
}
