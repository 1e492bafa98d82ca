// File: crates/calmirror_sync/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{
    ConnectAccountResponse, ConnectedAccount, CreateEventRequest, CreateEventResponse,
    EventRecord, FetchEventsRequest, FetchEventsResponse, MappingRequest, MappingResponse,
};
use calmirror_common::{AccountCredentials, FieldMapping, MappingColumn};

#[utoipa::path(
    post,
    path = "/events/google-calendar-webhook",
    params(
        ("x-goog-resource-state" = String, Header, description = "Resource state; `sync` for the channel handshake", example = "exists"),
        ("x-goog-channel-id" = String, Header, description = "Channel id handed out at subscription", example = "channel-3f2a9c0d4b1e4f7a8c6d2e1f0a9b8c7d-1717236000000")
    ),
    responses(
        (status = 200, description = "Handshake acknowledged or mirror reconciled"),
        (status = 404, description = "No account for the channel id"),
        (status = 500, description = "Reconcile failed")
    ),
    tag = "events"
)]
fn doc_google_calendar_webhook_handler() {}

#[utoipa::path(
    post,
    path = "/events/create-event",
    request_body(content = CreateEventRequest, example = json!({
        "accountId": "3f2a9c0d4b1e4f7a8c6d2e1f0a9b8c7d",
        "eventName": "Dentist",
        "eventDate": "2024-06-01",
        "eventTime": "14:00"
    })),
    responses(
        (status = 200, description = "Event created and mirrored", body = CreateEventResponse),
        (status = 400, description = "Invalid date or time"),
        (status = 404, description = "Unknown account"),
        (status = 500, description = "Provider or store failure")
    ),
    tag = "events"
)]
fn doc_create_event_handler() {}

#[utoipa::path(
    post,
    path = "/events/fetch-events",
    request_body = FetchEventsRequest,
    responses(
        (status = 200, description = "Reconciled active events, newest first", body = FetchEventsResponse),
        (status = 404, description = "Unknown account"),
        (status = 500, description = "Reconcile failed")
    ),
    tag = "events"
)]
fn doc_fetch_events_handler() {}

#[utoipa::path(
    post,
    path = "/mapping",
    request_body = MappingRequest,
    responses(
        (status = 200, description = "New active mapping", body = MappingResponse),
        (status = 400, description = "Empty or incomplete mapping"),
        (status = 404, description = "Unknown account")
    ),
    tag = "mapping"
)]
fn doc_replace_mapping_handler() {}

#[utoipa::path(
    get,
    path = "/mapping/{account_id}",
    params(("account_id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "Active mapping", body = FieldMapping),
        (status = 404, description = "No active mapping")
    ),
    tag = "mapping"
)]
fn doc_get_mapping_handler() {}

#[utoipa::path(
    post,
    path = "/accounts/connect",
    request_body = AccountCredentials,
    responses(
        (status = 200, description = "Account stored", body = ConnectAccountResponse),
        (status = 400, description = "Missing email or access token")
    ),
    tag = "accounts"
)]
fn doc_connect_account_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_google_calendar_webhook_handler,
        doc_create_event_handler,
        doc_fetch_events_handler,
        doc_replace_mapping_handler,
        doc_get_mapping_handler,
        doc_connect_account_handler
    ),
    components(
        schemas(
            AccountCredentials,
            ConnectAccountResponse,
            ConnectedAccount,
            CreateEventRequest,
            CreateEventResponse,
            EventRecord,
            FetchEventsRequest,
            FetchEventsResponse,
            FieldMapping,
            MappingColumn,
            MappingRequest,
            MappingResponse
        )
    ),
    tags(
        (name = "events", description = "Mirror reconcile and event creation"),
        (name = "mapping", description = "Per-account field mappings"),
        (name = "accounts", description = "Account connection")
    ),
    servers(
        (url = "/api", description = "calmirror API server")
    )
)]
pub struct SyncApiDoc;
