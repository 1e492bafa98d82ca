// --- File: crates/calmirror_sync/src/logic.rs ---
use crate::error::SyncError;
use crate::reconcile::{reconcile_account, ReconcileReport};
use crate::webhook::{account_id_from_channel, WebhookNotification};
use calmirror_common::schedule::{DATE_FORMAT, TIME_FORMAT};
use calmirror_common::{
    default_mapping_columns, Account, AccountCredentials, CalendarProvider, EventSchedule,
    FieldMapping, MappingColumn, MirrorEvent, ProviderEventDraft,
};
use calmirror_db::{AccountRepository, FieldMappingRepository, MirrorEventRepository};
use chrono::{Duration, LocalResult, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{error, info, warn};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Everything the sync operations need from the mirror store.
pub trait MirrorStore:
    AccountRepository + MirrorEventRepository + FieldMappingRepository + Clone + Send + Sync + 'static
{
}

impl<T> MirrorStore for T where
    T: AccountRepository
        + MirrorEventRepository
        + FieldMappingRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}

#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Zone in which `eventDate`/`eventTime` of new events are interpreted.
    pub time_zone: Tz,
    /// Public address of the webhook route; no subscription when `None`.
    pub webhook_url: Option<String>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            time_zone: Tz::UTC,
            webhook_url: None,
        }
    }
}

// Shared state of the sync routes
#[derive(Clone)]
pub struct SyncState<R> {
    pub store: R,
    pub provider: Arc<dyn CalendarProvider>,
    pub settings: SyncSettings,
}

// --- Data Structures ---

/// A mirror row as returned to API clients.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub account_id: String,
    /// Provider-assigned event id.
    pub event_id: String,
    pub mapping_id: Option<String>,
    pub title: String,
    #[cfg_attr(feature = "openapi", schema(example = "2024-06-01"))]
    pub start_date: String,
    #[cfg_attr(feature = "openapi", schema(example = "14:00"))]
    pub start_time: Option<String>,
    pub end_date: String,
    pub end_time: Option<String>,
    pub deleted: bool,
}

impl From<&MirrorEvent> for EventRecord {
    fn from(event: &MirrorEvent) -> Self {
        Self {
            account_id: event.account_id.clone(),
            event_id: event.provider_event_id.clone(),
            mapping_id: event.mapping_id.clone(),
            title: event.title.clone(),
            start_date: event.start.date_string(),
            start_time: event.start.time_string(),
            end_date: event.end.date_string(),
            end_time: event.end.time_string(),
            deleted: event.deleted,
        }
    }
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub account_id: String,
    pub event_name: String,
    /// YYYY-MM-DD
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2024-06-01"))]
    pub event_date: String,
    /// HH:mm, 24-hour
    #[cfg_attr(feature = "openapi", schema(example = "14:00"))]
    pub event_time: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateEventResponse {
    pub message: String,
    pub event: EventRecord,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FetchEventsRequest {
    pub account_id: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct FetchEventsResponse {
    pub events: Vec<EventRecord>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct MappingRequest {
    pub account_id: String,
    pub mapping: Vec<MappingColumn>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MappingResponse {
    pub message: String,
    pub mapping: FieldMapping,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ConnectedAccount {
    pub id: String,
    pub email: String,
    pub expiry_date: Option<i64>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ConnectAccountResponse {
    pub account: ConnectedAccount,
    pub mapping_id: String,
    /// Whether a push-notification channel was opened.
    pub watching: bool,
}

/// What a webhook notification led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    Handshake,
    Reconciled(ReconcileReport),
}

// --- Operations ---

async fn require_account<R: MirrorStore>(store: &R, account_id: &str) -> Result<Account, SyncError> {
    store
        .find_by_id(account_id)
        .await?
        .ok_or_else(|| SyncError::NotFound(format!("account {}", account_id)))
}

/// Reconciles and fails unless every record was written.
async fn reconcile_complete<R: MirrorStore>(
    state: &SyncState<R>,
    account: &Account,
) -> Result<ReconcileReport, SyncError> {
    let report = reconcile_account(&state.store, state.provider.as_ref(), account).await?;
    if report.is_complete() {
        Ok(report)
    } else {
        Err(SyncError::PartialWrite(report))
    }
}

/// Handles a push notification: the `sync` handshake touches nothing, any
/// other state reconciles the account named by the channel id.
pub async fn handle_notification<R: MirrorStore>(
    state: &SyncState<R>,
    notification: &WebhookNotification,
) -> Result<WebhookOutcome, SyncError> {
    if notification.is_sync_handshake() {
        info!("Webhook channel handshake received");
        return Ok(WebhookOutcome::Handshake);
    }

    let channel_id = notification
        .channel_id
        .as_deref()
        .ok_or_else(|| SyncError::NotFound("channel id header missing".to_string()))?;
    let account_id = account_id_from_channel(channel_id)
        .ok_or_else(|| SyncError::NotFound(format!("no account in channel {}", channel_id)))?;
    let account = require_account(&state.store, account_id).await?;

    info!(
        "Webhook notification ({}) for account {}",
        notification.resource_state.as_deref().unwrap_or("unknown"),
        account.id
    );
    let report = reconcile_complete(state, &account).await?;
    Ok(WebhookOutcome::Reconciled(report))
}

/// Creates a one-hour event at the provider, then mirrors it.
pub async fn create_event<R: MirrorStore>(
    state: &SyncState<R>,
    request: CreateEventRequest,
) -> Result<MirrorEvent, SyncError> {
    let account = require_account(&state.store, &request.account_id).await?;

    let date = NaiveDate::parse_from_str(&request.event_date, DATE_FORMAT).map_err(|_| {
        SyncError::InvalidInput(format!(
            "eventDate '{}' must be YYYY-MM-DD",
            request.event_date
        ))
    })?;
    let time = NaiveTime::parse_from_str(&request.event_time, TIME_FORMAT).map_err(|_| {
        SyncError::InvalidInput(format!("eventTime '{}' must be HH:mm", request.event_time))
    })?;

    let tz = state.settings.time_zone;
    let start = match tz.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(at) => at,
        // Repeated wall-clock hour: take the first occurrence.
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            return Err(SyncError::InvalidInput(format!(
                "{} {} does not exist in {}",
                request.event_date,
                request.event_time,
                tz.name()
            )))
        }
    };
    let end = start + Duration::hours(1);

    let draft = ProviderEventDraft {
        title: request.event_name.clone(),
        start: start.to_rfc3339(),
        end: end.to_rfc3339(),
        time_zone: tz.name().to_string(),
    };
    let provider_event_id = state.provider.create_event(&account, draft).await?;

    let mapping_id = state
        .store
        .find_active_mapping(&account.id)
        .await?
        .map(|mapping| mapping.id);

    let event = MirrorEvent {
        account_id: account.id.clone(),
        provider_event_id,
        mapping_id,
        title: request.event_name,
        start: EventSchedule::timed(start.naive_local()),
        end: EventSchedule::timed(end.naive_local()),
        deleted: false,
    };

    if let Err(e) = state.store.insert_event(&event).await {
        error!(
            "Provider event {} was created but could not be mirrored: {}",
            event.provider_event_id, e
        );
        return Err(e.into());
    }

    info!(
        "Event {} created for account {} at {}",
        event.provider_event_id, account.id, event.start
    );
    Ok(event)
}

/// Newest first: start date descending, then start time descending, with
/// all-day rows after the timed rows of their date.
pub fn newest_first(a: &MirrorEvent, b: &MirrorEvent) -> Ordering {
    b.start
        .date
        .cmp(&a.start.date)
        .then_with(|| match (a.start.time, b.start.time) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// Reconciles the account, then returns its active rows newest first.
pub async fn fetch_events<R: MirrorStore>(
    state: &SyncState<R>,
    account_id: &str,
) -> Result<Vec<MirrorEvent>, SyncError> {
    let account = require_account(&state.store, account_id).await?;
    reconcile_complete(state, &account).await?;

    let mut events = state.store.find_active(&account.id).await?;
    events.sort_by(newest_first);
    Ok(events)
}

/// Makes `columns` the account's only active mapping.
pub async fn replace_mapping<R: MirrorStore>(
    state: &SyncState<R>,
    account_id: &str,
    columns: Vec<MappingColumn>,
) -> Result<FieldMapping, SyncError> {
    if columns.is_empty() {
        return Err(SyncError::InvalidInput(
            "mapping must contain at least one column".to_string(),
        ));
    }
    if let Some(column) = columns
        .iter()
        .find(|c| c.name.trim().is_empty() || c.position.trim().is_empty())
    {
        return Err(SyncError::InvalidInput(format!(
            "mapping column '{}' at '{}' needs both a name and a position",
            column.name, column.position
        )));
    }

    let account = require_account(&state.store, account_id).await?;
    let mapping = state.store.replace_active(&account.id, &columns).await?;
    info!(
        "Mapping {} with {} columns active for account {}",
        mapping.id,
        mapping.columns.len(),
        account.id
    );
    Ok(mapping)
}

pub async fn active_mapping<R: MirrorStore>(
    state: &SyncState<R>,
    account_id: &str,
) -> Result<FieldMapping, SyncError> {
    state
        .store
        .find_active_mapping(account_id)
        .await?
        .ok_or_else(|| SyncError::NotFound(format!("active mapping for account {}", account_id)))
}

/// Stores the credentials of a finished OAuth exchange, makes sure the
/// account has an active mapping and, when configured, starts watching its
/// calendar.
pub async fn connect_account<R: MirrorStore>(
    state: &SyncState<R>,
    credentials: AccountCredentials,
) -> Result<ConnectAccountResponse, SyncError> {
    if credentials.email.trim().is_empty() {
        return Err(SyncError::InvalidInput("email is required".to_string()));
    }
    if credentials.access_token.is_empty() {
        return Err(SyncError::InvalidInput("accessToken is required".to_string()));
    }

    let account = state.store.upsert_by_email(credentials).await?;

    let mapping = match state.store.find_active_mapping(&account.id).await? {
        Some(mapping) => mapping,
        None => {
            state
                .store
                .replace_active(&account.id, &default_mapping_columns())
                .await?
        }
    };

    let watching = match state.settings.webhook_url.as_deref() {
        Some(address) => match state.provider.subscribe(&account, address).await {
            Ok(channel_id) => {
                info!("Account {} watched on channel {}", account.id, channel_id);
                true
            }
            Err(e) => {
                warn!("Could not watch calendar of account {}: {}", account.id, e);
                false
            }
        },
        None => false,
    };

    info!("Account {} connected ({})", account.id, account.email);
    Ok(ConnectAccountResponse {
        account: ConnectedAccount {
            id: account.id,
            email: account.email,
            expiry_date: account.expiry_date,
        },
        mapping_id: mapping.id,
        watching,
    })
}
