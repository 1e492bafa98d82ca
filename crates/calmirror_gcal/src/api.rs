// --- File: crates/calmirror_gcal/src/api.rs ---
// Wire types of the Calendar v3 endpoints used here.

use calmirror_common::{ProviderEvent, ProviderTime};
use serde::{Deserialize, Serialize};

/// Response from the events.list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListResponse {
    #[serde(default)]
    pub items: Vec<ApiEvent>,
    pub next_page_token: Option<String>,
}

/// An event resource, reduced to the fields the mirror keeps.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    pub id: Option<String>,
    pub status: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub start: Option<ProviderTime>,
    #[serde(default)]
    pub end: Option<ProviderTime>,
}

impl ApiEvent {
    /// Cancelled instances and id-less entries are not part of the calendar.
    pub fn into_provider_event(self) -> Option<ProviderEvent> {
        if self.status.as_deref() == Some("cancelled") {
            return None;
        }
        Some(ProviderEvent {
            id: self.id?,
            title: self.summary.unwrap_or_default(),
            start: self.start.unwrap_or_default(),
            end: self.end.unwrap_or_default(),
        })
    }
}

/// Start or end of an event to insert.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime<'a> {
    pub date_time: &'a str,
    pub time_zone: &'a str,
}

/// Body of events.insert.
#[derive(Debug, Serialize)]
pub struct InsertEventRequest<'a> {
    pub summary: &'a str,
    pub start: EventDateTime<'a>,
    pub end: EventDateTime<'a>,
}

/// The part of the events.insert response we need.
#[derive(Debug, Deserialize)]
pub struct InsertEventResponse {
    pub id: String,
}

/// Body of events.watch.
#[derive(Debug, Serialize)]
pub struct WatchRequest<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub channel_type: &'a str,
    pub address: &'a str,
}

/// Response from events.watch.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub resource_id: Option<String>,
    pub expiration: Option<String>,
}

/// Google's error envelope: `{"error": {"code", "message"}}`.
#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_and_id_less_events_are_dropped() {
        let body = r#"{
            "items": [
                {"id": "a", "status": "confirmed", "summary": "Standup",
                 "start": {"dateTime": "2024-05-01T09:30:00-05:00"},
                 "end": {"dateTime": "2024-05-01T10:00:00-05:00"}},
                {"id": "b", "status": "cancelled"},
                {"summary": "no id", "start": {"date": "2024-05-01"}, "end": {"date": "2024-05-02"}}
            ]
        }"#;
        let list: EventListResponse = serde_json::from_str(body).unwrap();
        assert!(list.next_page_token.is_none());

        let events: Vec<ProviderEvent> = list
            .items
            .into_iter()
            .filter_map(ApiEvent::into_provider_event)
            .collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Standup");
        assert_eq!(
            events[0].start.date_time.as_deref(),
            Some("2024-05-01T09:30:00-05:00")
        );
    }

    #[test]
    fn test_missing_summary_becomes_empty_title() {
        let event: ApiEvent =
            serde_json::from_str(r#"{"id": "x", "start": {"date": "2024-05-01"}}"#).unwrap();
        let event = event.into_provider_event().unwrap();
        assert_eq!(event.title, "");
        assert_eq!(event.end, ProviderTime::default());
    }

    #[test]
    fn test_watch_request_uses_type_key() {
        let body = serde_json::to_value(WatchRequest {
            id: "channel-abc-1",
            channel_type: "web_hook",
            address: "https://example.com/hook",
        })
        .unwrap();
        assert_eq!(body["type"], "web_hook");
    }
}
