// --- File: crates/calmirror_gcal/src/provider.rs ---

use crate::client::GoogleCalendarClient;
use calmirror_common::{
    Account, BoxFuture, CalendarProvider, ProviderError, ProviderEvent, ProviderEventDraft,
};
use chrono::Utc;

/// `channel-<accountId>-<epochMillis>`. The account id must not contain `-`.
pub fn channel_id_for(account_id: &str, epoch_millis: i64) -> String {
    format!("channel-{}-{}", account_id, epoch_millis)
}

/// [`CalendarProvider`] backed by the Google Calendar REST API.
#[derive(Debug, Clone)]
pub struct GoogleCalendarProvider {
    client: GoogleCalendarClient,
}

impl GoogleCalendarProvider {
    pub fn new(client: GoogleCalendarClient) -> Self {
        Self { client }
    }
}

impl CalendarProvider for GoogleCalendarProvider {
    fn list_events(&self, account: &Account) -> BoxFuture<'_, Vec<ProviderEvent>, ProviderError> {
        let token = account.access_token.clone();
        Box::pin(async move { self.client.list_events(&token).await })
    }

    fn create_event(
        &self,
        account: &Account,
        draft: ProviderEventDraft,
    ) -> BoxFuture<'_, String, ProviderError> {
        let token = account.access_token.clone();
        Box::pin(async move { self.client.insert_event(&token, &draft).await })
    }

    fn subscribe(
        &self,
        account: &Account,
        callback_address: &str,
    ) -> BoxFuture<'_, String, ProviderError> {
        let token = account.access_token.clone();
        let channel_id = channel_id_for(&account.id, Utc::now().timestamp_millis());
        let address = callback_address.to_string();
        Box::pin(async move {
            let channel = self
                .client
                .watch_events(&token, &channel_id, &address)
                .await?;
            Ok(channel.id)
        })
    }
}
