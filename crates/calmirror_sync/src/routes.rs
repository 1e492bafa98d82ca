// --- File: crates/calmirror_sync/src/routes.rs ---

use crate::handlers::{
    connect_account_handler, create_event_handler, fetch_events_handler,
    get_mapping_handler, google_calendar_webhook_handler, replace_mapping_handler,
};
use crate::logic::{MirrorStore, SyncState};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// All sync routes, relative to the `/api` prefix.
pub fn routes<R: MirrorStore>(state: Arc<SyncState<R>>) -> Router {
    Router::new()
        .route(
            "/events/google-calendar-webhook",
            post(google_calendar_webhook_handler::<R>),
        )
        .route("/events/create-event", post(create_event_handler::<R>))
        .route("/events/fetch-events", post(fetch_events_handler::<R>))
        .route("/mapping", post(replace_mapping_handler::<R>))
        .route("/mapping/{account_id}", get(get_mapping_handler::<R>))
        .route("/accounts/connect", post(connect_account_handler::<R>))
        .with_state(state)
}
