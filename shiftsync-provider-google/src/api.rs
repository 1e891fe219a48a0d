//! Google Calendar v3 REST client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shiftsync_core::date_range::DateRange;
use shiftsync_core::remote::{CalendarClient, CalendarInfo, Insert, Update};
use shiftsync_core::{RemoteEvent, ShiftSyncError, ShiftSyncResult};
use tracing::{debug, warn};
use url::Url;

use crate::convert::{FromGoogle, ToGoogle};
use crate::types::{CalendarListPage, ErrorResponse, EventsPage, GoogleEvent};

const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Largest page size the events endpoint accepts.
const MAX_RESULTS: &str = "2500";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A Google Calendar account, authenticated with an OAuth access token.
pub struct GoogleCalendar {
    http: Client,
    base_url: Url,
    access_token: String,
}

impl GoogleCalendar {
    pub fn new(access_token: impl Into<String>) -> ShiftSyncResult<Self> {
        Self::with_base_url(GOOGLE_CALENDAR_API_BASE, access_token)
    }

    /// Point the client at another server, e.g. a mock in tests.
    pub fn with_base_url(base_url: &str, access_token: impl Into<String>) -> ShiftSyncResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ShiftSyncError::Config(format!("Invalid API base URL '{base_url}': {e}")))?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ShiftSyncError::Transport(e.to_string()))?;

        Ok(GoogleCalendar {
            http,
            base_url,
            access_token: access_token.into(),
        })
    }

    /// Base URL plus percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> ShiftSyncResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ShiftSyncError::Config(format!("Invalid API base URL '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        self.http
            .request(method, url.clone())
            .bearer_auth(&self.access_token)
    }

    async fn send(&self, method: Method, url: &Url, builder: RequestBuilder) -> ShiftSyncResult<Response> {
        debug!(%method, %url, "google calendar request");
        builder
            .send()
            .await
            .map_err(|e| ShiftSyncError::Transport(format!("{method} {url}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url, query: &[(&str, &str)]) -> ShiftSyncResult<T> {
        let builder = self.request(Method::GET, url).query(query);
        let response = self.send(Method::GET, url, builder).await?;

        if !response.status().is_success() {
            return Err(request_error(Method::GET, url, response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ShiftSyncError::Serialization(format!("Failed to parse Google response: {e}")))
    }
}

/// Turn an unexpected response into an error, keeping Google's message.
async fn request_error(method: Method, url: &Url, response: Response) -> ShiftSyncError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();

    let body = match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(parsed) if !parsed.error.message.is_empty() => parsed.error.message,
        _ => text,
    };

    warn!(%method, %url, status, %body, "google calendar request failed");

    ShiftSyncError::Request {
        method: method.to_string(),
        url: url.to_string(),
        status,
        body,
    }
}

#[async_trait]
impl CalendarClient for GoogleCalendar {
    async fn list_calendars(&self) -> ShiftSyncResult<Vec<CalendarInfo>> {
        let url = self.endpoint(&["users", "me", "calendarList"])?;
        let mut calendars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let page: CalendarListPage = self.get_json(&url, &query).await?;
            calendars.extend(page.items.into_iter().map(|c| CalendarInfo {
                summary: if c.summary.is_empty() {
                    "(unnamed)".to_string()
                } else {
                    c.summary
                },
                id: c.id,
                primary: c.primary,
            }));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(calendars)
    }

    async fn list_events(&self, calendar_id: &str, range: &DateRange) -> ShiftSyncResult<Vec<RemoteEvent>> {
        let url = self.endpoint(&["calendars", calendar_id, "events"])?;
        let time_min = range.from_rfc3339();
        let time_max = range.to_rfc3339();

        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("timeMin", time_min.as_str()),
                ("timeMax", time_max.as_str()),
                ("singleEvents", "true"),
                ("maxResults", MAX_RESULTS),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let page: EventsPage = self.get_json(&url, &query).await?;
            for event in page.items {
                if event.status.as_deref() == Some("cancelled") {
                    continue;
                }
                // Google returns events overlapping the window; only those
                // starting inside it belong to this schedule.
                let event = RemoteEvent::from_google(event)?;
                if event.start.instant().is_ok_and(|start| range.contains(start)) {
                    events.push(event);
                } else {
                    debug!(event_id = %event.id, start = %event.start.date_time, "skipping event starting outside window");
                }
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(events)
    }

    async fn insert_event(&self, calendar_id: &str, event: &RemoteEvent) -> ShiftSyncResult<Insert> {
        let url = self.endpoint(&["calendars", calendar_id, "events"])?;
        let body: GoogleEvent = event.to_google();

        let builder = self.request(Method::POST, &url).json(&body);
        let response = self.send(Method::POST, &url, builder).await?;

        match response.status() {
            StatusCode::CONFLICT => Ok(Insert::AlreadyExists),
            status if status.is_success() => Ok(Insert::Inserted),
            _ => Err(request_error(Method::POST, &url, response).await),
        }
    }

    async fn update_event(&self, calendar_id: &str, event: &RemoteEvent) -> ShiftSyncResult<Update> {
        let url = self.endpoint(&["calendars", calendar_id, "events", &event.id])?;
        let body: GoogleEvent = event.to_google();

        let builder = self.request(Method::PUT, &url).json(&body);
        let response = self.send(Method::PUT, &url, builder).await?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::GONE => Ok(Update::NotFound),
            status if status.is_success() => Ok(Update::Updated),
            _ => Err(request_error(Method::PUT, &url, response).await),
        }
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> ShiftSyncResult<bool> {
        let url = self.endpoint(&["calendars", calendar_id, "events", event_id])?;

        let builder = self.request(Method::DELETE, &url);
        let response = self.send(Method::DELETE, &url, builder).await?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::GONE => Ok(false),
            status if status.is_success() => Ok(true),
            _ => Err(request_error(Method::DELETE, &url, response).await),
        }
    }
}
