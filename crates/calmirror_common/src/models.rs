// --- File: crates/calmirror_common/src/models.rs ---

// Data structures shared by the store, the provider client and the sync core.

use crate::schedule::EventSchedule;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A connected calendar identity holding provider credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Hyphen-free identifier; it is embedded in webhook channel ids.
    pub id: String,
    pub email: String,
    pub google_id: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Access token expiry in epoch milliseconds, as reported by the provider.
    pub expiry_date: Option<i64>,
}

/// Credentials handed over once the OAuth exchange has completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AccountCredentials {
    pub email: String,
    pub google_id: String,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<i64>,
}

/// Locally mirrored copy of a provider event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorEvent {
    pub account_id: String,
    /// Unique per account, including soft-deleted rows.
    pub provider_event_id: String,
    pub mapping_id: Option<String>,
    pub title: String,
    pub start: EventSchedule,
    pub end: EventSchedule,
    pub deleted: bool,
}

/// One column assignment of a field mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MappingColumn {
    pub name: String,
    pub position: String,
}

impl MappingColumn {
    pub fn new(name: &str, position: &str) -> Self {
        Self {
            name: name.to_string(),
            position: position.to_string(),
        }
    }
}

/// The columns every newly connected account starts with.
pub fn default_mapping_columns() -> Vec<MappingColumn> {
    vec![
        MappingColumn::new("google_title", "A"),
        MappingColumn::new("google_start_time", "B"),
        MappingColumn::new("google_end_time", "C"),
    ]
}

/// Per-account field-to-column configuration. At most one is active per account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub id: String,
    pub account_id: String,
    pub columns: Vec<MappingColumn>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// Start or end of a provider event, exactly as the provider sent it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
}

impl ProviderTime {
    pub fn date(date: &str) -> Self {
        Self {
            date: Some(date.to_string()),
            date_time: None,
        }
    }

    pub fn date_time(date_time: &str) -> Self {
        Self {
            date: None,
            date_time: Some(date_time.to_string()),
        }
    }

    pub fn to_schedule(&self) -> Result<EventSchedule, crate::schedule::ScheduleError> {
        EventSchedule::from_provider(self.date.as_deref(), self.date_time.as_deref())
    }
}

/// An event as listed by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEvent {
    pub id: String,
    pub title: String,
    pub start: ProviderTime,
    pub end: ProviderTime,
}

/// A new timed event to be created at the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEventDraft {
    pub title: String,
    /// RFC 3339 with offset.
    pub start: String,
    pub end: String,
    /// IANA zone the offsets were computed in.
    pub time_zone: String,
}

/// Replacement values for one mirror row, keyed by provider event id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFieldsUpdate {
    pub provider_event_id: String,
    pub title: String,
    pub start: EventSchedule,
    pub end: EventSchedule,
}

/// A record a batch could not apply, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RecordFailure {
    pub provider_event_id: String,
    pub reason: String,
}

impl RecordFailure {
    pub fn new(provider_event_id: &str, reason: impl ToString) -> Self {
        Self {
            provider_event_id: provider_event_id.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result of a batch write: how many records were applied and which failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub applied: usize,
    pub failed: Vec<RecordFailure>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
