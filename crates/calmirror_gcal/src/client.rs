// --- File: crates/calmirror_gcal/src/client.rs ---
//! HTTP client for the Google Calendar v3 API.
//!
//! Each call takes the account's access token; the client itself only holds
//! the connection pool, the API base URL and the calendar id.

use crate::api::{
    ApiErrorEnvelope, Channel, EventDateTime, EventListResponse, InsertEventRequest,
    InsertEventResponse, WatchRequest,
};
use calmirror_common::http::client::DEFAULT_TIMEOUT_SECS;
use calmirror_common::{create_client, ProviderError, ProviderEvent, ProviderEventDraft};
use calmirror_config::GcalConfig;
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// Google Calendar API client.
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    base_url: String,
    calendar_id: String,
}

impl GoogleCalendarClient {
    pub fn new(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        calendar_id: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            calendar_id: calendar_id.into(),
        }
    }

    pub fn from_config(config: &GcalConfig) -> Result<Self, ProviderError> {
        let timeout = config.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let http_client = create_client(timeout, true)
            .map_err(|e| ProviderError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::new(
            http_client,
            config.api_base_url(),
            config.calendar_id(),
        ))
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    /// `<base>/calendars/<calendar_id>/<suffix...>` with the calendar id escaped.
    fn calendar_url(&self, suffix: &[&str]) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ProviderError::Network(format!("invalid API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::Network("API base URL cannot have a path".to_string()))?
            .pop_if_empty()
            .push("calendars")
            .push(&self.calendar_id)
            .extend(suffix);
        Ok(url)
    }

    /// Lists all events, recurring events expanded, ordered by start time.
    /// Every result page is followed.
    pub async fn list_events(&self, access_token: &str) -> Result<Vec<ProviderEvent>, ProviderError> {
        let url = self.calendar_url(&["events"])?;
        let mut all_events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http_client
                .get(url.clone())
                .bearer_auth(access_token)
                .query(&[("singleEvents", "true"), ("orderBy", "startTime")]);
            if let Some(token) = page_token.as_deref() {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await.map_err(network_error)?;
            let page: EventListResponse = parse_response(response).await?;

            all_events.extend(
                page.items
                    .into_iter()
                    .filter_map(|event| event.into_provider_event()),
            );

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(
            "fetched {} events from calendar {}",
            all_events.len(),
            self.calendar_id
        );
        Ok(all_events)
    }

    /// Inserts a timed event and returns its provider id.
    pub async fn insert_event(
        &self,
        access_token: &str,
        draft: &ProviderEventDraft,
    ) -> Result<String, ProviderError> {
        let url = self.calendar_url(&["events"])?;
        let body = InsertEventRequest {
            summary: &draft.title,
            start: EventDateTime {
                date_time: &draft.start,
                time_zone: &draft.time_zone,
            },
            end: EventDateTime {
                date_time: &draft.end,
                time_zone: &draft.time_zone,
            },
        };

        let response = self
            .http_client
            .post(url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;
        let created: InsertEventResponse = parse_response(response).await?;

        info!("Created provider event {}", created.id);
        Ok(created.id)
    }

    /// Opens a push-notification channel for the calendar's events.
    pub async fn watch_events(
        &self,
        access_token: &str,
        channel_id: &str,
        address: &str,
    ) -> Result<Channel, ProviderError> {
        let url = self.calendar_url(&["events", "watch"])?;
        let body = WatchRequest {
            id: channel_id,
            channel_type: "web_hook",
            address,
        };

        let response = self
            .http_client
            .post(url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;
        let channel: Channel = parse_response(response).await?;

        info!(
            "Watching calendar {} on channel {} (expires {:?})",
            self.calendar_id, channel.id, channel.expiration
        );
        Ok(channel)
    }
}

fn network_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Network("request timeout".to_string())
    } else if e.is_connect() {
        ProviderError::Network(format!("connection failed: {}", e))
    } else {
        ProviderError::Network(format!("request failed: {}", e))
    }
}

/// Classifies non-success statuses and decodes the body of a success.
async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, ProviderError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .map(|s| format!(", retry after {} seconds", s))
            .unwrap_or_default();
        return Err(ProviderError::RateLimited(format!(
            "rate limit exceeded{}",
            retry_after
        )));
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(body);
        warn!("Google Calendar API returned {}: {}", status, message);

        return Err(match status {
            StatusCode::UNAUTHORIZED => ProviderError::Authentication(message),
            StatusCode::FORBIDDEN => ProviderError::Authorization(message),
            _ => ProviderError::Api {
                status: status.as_u16(),
                message,
            },
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::Network(format!("failed to read response: {}", e)))?;
    serde_json::from_str(&body)
        .map_err(|e| ProviderError::InvalidResponse(format!("failed to parse response: {}", e)))
}
