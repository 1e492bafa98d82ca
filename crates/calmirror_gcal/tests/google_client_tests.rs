use calmirror_common::{Account, CalendarProvider, ProviderError, ProviderEventDraft};
use calmirror_gcal::{GoogleCalendarClient, GoogleCalendarProvider};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GoogleCalendarClient {
    GoogleCalendarClient::new(reqwest::Client::new(), server.uri(), "primary")
}

fn account() -> Account {
    Account {
        id: "acc1".to_string(),
        email: "a@example.com".to_string(),
        google_id: "gid".to_string(),
        access_token: "token-1".to_string(),
        refresh_token: None,
        expiry_date: None,
    }
}

#[tokio::test]
async fn test_list_events_follows_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "e2", "summary": "Second",
                 "start": {"date": "2024-05-02"}, "end": {"date": "2024-05-03"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .and(query_param("singleEvents", "true"))
        .and(query_param("orderBy", "startTime"))
        .and(header("authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "e1", "summary": "First",
                 "start": {"dateTime": "2024-05-01T09:30:00-05:00"},
                 "end": {"dateTime": "2024-05-01T10:30:00-05:00"}}
            ],
            "nextPageToken": "page-2"
        })))
        .mount(&server)
        .await;

    let events = client_for(&server).list_events("token-1").await.unwrap();
    let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["e1", "e2"]);
    assert_eq!(events[1].start.date.as_deref(), Some("2024-05-02"));
}

#[tokio::test]
async fn test_status_codes_are_classified() {
    for status in [401u16, 403, 429, 500] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {"code": status, "message": "nope"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).list_events("token").await.unwrap_err();
        match status {
            401 => assert_eq!(err, ProviderError::Authentication("nope".to_string())),
            403 => assert_eq!(err, ProviderError::Authorization("nope".to_string())),
            429 => assert!(matches!(err, ProviderError::RateLimited(_))),
            _ => assert_eq!(
                err,
                ProviderError::Api {
                    status: 500,
                    message: "nope".to_string()
                }
            ),
        }
    }
}

#[tokio::test]
async fn test_unparseable_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_events("token").await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_create_event_sends_offset_and_zone() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calendars/primary/events"))
        .and(body_partial_json(json!({
            "summary": "Dentist",
            "start": {"dateTime": "2024-06-01T14:00:00+02:00", "timeZone": "Europe/Zurich"},
            "end": {"dateTime": "2024-06-01T15:00:00+02:00", "timeZone": "Europe/Zurich"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "new-id"})))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GoogleCalendarProvider::new(client_for(&server));
    let id = provider
        .create_event(
            &account(),
            ProviderEventDraft {
                title: "Dentist".to_string(),
                start: "2024-06-01T14:00:00+02:00".to_string(),
                end: "2024-06-01T15:00:00+02:00".to_string(),
                time_zone: "Europe/Zurich".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(id, "new-id");
}

#[tokio::test]
async fn test_subscribe_embeds_account_in_channel_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calendars/primary/events/watch"))
        .and(body_partial_json(json!({
            "type": "web_hook",
            "address": "https://example.com/api/events/google-calendar-webhook"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "channel-acc1-1717236000000",
            "resourceId": "res",
            "expiration": "1717840800000"
        })))
        .mount(&server)
        .await;

    let provider = GoogleCalendarProvider::new(client_for(&server));
    let channel = provider
        .subscribe(
            &account(),
            "https://example.com/api/events/google-calendar-webhook",
        )
        .await
        .unwrap();

    assert_eq!(channel, "channel-acc1-1717236000000");
    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let sent_id = body["id"].as_str().unwrap();
    assert!(sent_id.starts_with("channel-acc1-"));
    assert_eq!(sent_id.split('-').nth(1), Some("acc1"));
}
