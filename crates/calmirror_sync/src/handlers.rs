// File: crates/calmirror_sync/src/handlers.rs
use crate::logic::{
    active_mapping, connect_account, create_event, fetch_events, handle_notification,
    replace_mapping, ConnectAccountResponse, CreateEventRequest, CreateEventResponse, EventRecord,
    FetchEventsRequest, FetchEventsResponse, MappingRequest, MappingResponse, MirrorStore,
    SyncState, WebhookOutcome,
};
use crate::webhook::WebhookNotification;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use calmirror_common::{AccountCredentials, CalmirrorError, FieldMapping};
use std::sync::Arc;
use tracing::info;

/// Google push notification endpoint.
pub async fn google_calendar_webhook_handler<R: MirrorStore>(
    State(state): State<Arc<SyncState<R>>>,
    headers: HeaderMap,
) -> Result<StatusCode, CalmirrorError> {
    let notification = WebhookNotification::from_headers(&headers);
    match handle_notification(state.as_ref(), &notification).await? {
        WebhookOutcome::Handshake => {}
        WebhookOutcome::Reconciled(report) => {
            info!(
                "Webhook reconcile done: {} fetched, {} updated, {} soft-deleted",
                report.fetched, report.updated, report.soft_deleted
            );
        }
    }
    Ok(StatusCode::OK)
}

pub async fn create_event_handler<R: MirrorStore>(
    State(state): State<Arc<SyncState<R>>>,
    Json(request): Json<CreateEventRequest>,
) -> Result<Json<CreateEventResponse>, CalmirrorError> {
    info!("Create event requested for account {}", request.account_id);
    let event = create_event(state.as_ref(), request).await?;
    Ok(Json(CreateEventResponse {
        message: "Event created successfully".to_string(),
        event: EventRecord::from(&event),
    }))
}

pub async fn fetch_events_handler<R: MirrorStore>(
    State(state): State<Arc<SyncState<R>>>,
    Json(request): Json<FetchEventsRequest>,
) -> Result<Json<FetchEventsResponse>, CalmirrorError> {
    info!("Fetch events requested for account {}", request.account_id);
    let events = fetch_events(state.as_ref(), &request.account_id).await?;
    Ok(Json(FetchEventsResponse {
        events: events.iter().map(EventRecord::from).collect(),
    }))
}

pub async fn replace_mapping_handler<R: MirrorStore>(
    State(state): State<Arc<SyncState<R>>>,
    Json(request): Json<MappingRequest>,
) -> Result<Json<MappingResponse>, CalmirrorError> {
    let mapping = replace_mapping(state.as_ref(), &request.account_id, request.mapping).await?;
    Ok(Json(MappingResponse {
        message: "Mapping saved successfully".to_string(),
        mapping,
    }))
}

pub async fn get_mapping_handler<R: MirrorStore>(
    State(state): State<Arc<SyncState<R>>>,
    Path(account_id): Path<String>,
) -> Result<Json<FieldMapping>, CalmirrorError> {
    Ok(Json(active_mapping(state.as_ref(), &account_id).await?))
}

/// Receives the result of the OAuth exchange.
pub async fn connect_account_handler<R: MirrorStore>(
    State(state): State<Arc<SyncState<R>>>,
    Json(credentials): Json<AccountCredentials>,
) -> Result<Json<ConnectAccountResponse>, CalmirrorError> {
    info!("Connecting account {}", credentials.email);
    Ok(Json(connect_account(state.as_ref(), credentials).await?))
}
