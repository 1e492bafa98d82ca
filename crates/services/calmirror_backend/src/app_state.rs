// --- File: crates/services/calmirror_backend/src/app_state.rs ---
use calmirror_common::{config_error, CalmirrorError};
use calmirror_config::{AppConfig, GcalConfig};
use calmirror_db::{DbClient, SqlStore};
use calmirror_gcal::{GoogleCalendarClient, GoogleCalendarProvider};
use calmirror_sync::{SyncSettings, SyncState};
use chrono_tz::Tz;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// Reads the sync settings out of the `gcal` section.
pub fn sync_settings(gcal: &GcalConfig) -> Result<SyncSettings, CalmirrorError> {
    let time_zone = Tz::from_str(gcal.time_zone())
        .map_err(|_| config_error(format!("unknown gcal.time_zone '{}'", gcal.time_zone())))?;
    let webhook_url = gcal
        .webhook_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string);
    Ok(SyncSettings {
        time_zone,
        webhook_url,
    })
}

/// Connects the store, prepares its schema and builds the Google provider.
pub async fn build_sync_state(config: &AppConfig) -> Result<Arc<SyncState<SqlStore>>, CalmirrorError> {
    let db_client = DbClient::new(config).await?;
    let store = SqlStore::new(db_client);
    store.init_schema().await?;

    let gcal = config.gcal.clone().unwrap_or_default();
    let settings = sync_settings(&gcal)?;
    let client = GoogleCalendarClient::from_config(&gcal)
        .map_err(|e| config_error(format!("Google Calendar client: {}", e)))?;

    info!(
        "Sync ready: calendar '{}', time zone {}, webhook {}",
        client.calendar_id(),
        settings.time_zone.name(),
        settings.webhook_url.as_deref().unwrap_or("disabled")
    );

    Ok(Arc::new(SyncState {
        store,
        provider: Arc::new(GoogleCalendarProvider::new(client)),
        settings,
    }))
}
