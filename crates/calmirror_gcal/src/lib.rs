// --- File: crates/calmirror_gcal/src/lib.rs ---
//! Google Calendar v3 REST client.
//!
//! [`GoogleCalendarClient`] speaks the HTTP API with a per-account bearer
//! token; [`GoogleCalendarProvider`] adapts it to the shared
//! [`calmirror_common::CalendarProvider`] trait.

pub mod api;
pub mod client;
pub mod provider;

pub use client::GoogleCalendarClient;
pub use provider::{channel_id_for, GoogleCalendarProvider};
