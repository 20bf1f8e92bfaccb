use super::models::{EventResource, InsertedEvent};
use super::token::TokenManager;
use crate::config::Config;
use crate::error::{google_calendar_error, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

/// An authenticated calendar that accepts new events
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Insert one event into the bound calendar
    async fn insert_event(&self, event: &EventResource) -> AppResult<InsertedEvent>;
}

/// Produces an authenticated calendar for one request
#[async_trait]
pub trait CalendarConnector: Send + Sync {
    async fn connect(&self) -> AppResult<Box<dyn CalendarApi>>;
}

/// Google Calendar client factory
#[derive(Clone)]
pub struct GoogleCalendar {
    token_manager: TokenManager,
    client: Client,
    api_base: String,
    calendar_id: String,
}

impl GoogleCalendar {
    pub fn new(token_manager: TokenManager, api_base: &str, calendar_id: &str) -> Self {
        Self {
            token_manager,
            client: Client::new(),
            api_base: api_base.to_string(),
            calendar_id: calendar_id.to_string(),
        }
    }

    /// Build the factory from the loaded secrets and settings
    pub fn from_config(config: &Config) -> Self {
        let token_manager = TokenManager::new(
            config.secrets.google_token.clone(),
            config.secrets.google_client.clone(),
        );
        Self::new(token_manager, &config.calendar_api_base, &config.calendar_id)
    }

    /// The in-memory token record
    pub fn token_manager(&self) -> &TokenManager {
        &self.token_manager
    }

    fn events_url(&self) -> AppResult<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| google_calendar_error("Calendar API base cannot take a path"))?
            .pop_if_empty()
            .push("calendars")
            .push(&self.calendar_id)
            .push("events");
        Ok(url)
    }
}

#[async_trait]
impl CalendarConnector for GoogleCalendar {
    async fn connect(&self) -> AppResult<Box<dyn CalendarApi>> {
        let access_token = self.token_manager.access_token().await?;
        let events_url = self.events_url()?;
        debug!("Calendar session bound to {}", events_url);

        Ok(Box::new(CalendarSession {
            client: self.client.clone(),
            access_token,
            events_url,
        }))
    }
}

/// Calendar handle holding a valid access token
pub struct CalendarSession {
    client: Client,
    access_token: String,
    events_url: Url,
}

#[async_trait]
impl CalendarApi for CalendarSession {
    async fn insert_event(&self, event: &EventResource) -> AppResult<InsertedEvent> {
        let response = self
            .client
            .post(self.events_url.clone())
            .bearer_auth(&self.access_token)
            .json(event)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to insert event: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to insert event: HTTP {} - {}",
                status, error_body
            )));
        }

        let inserted: InsertedEvent = response.json().await.map_err(|e| {
            google_calendar_error(&format!("Failed to parse insert response: {}", e))
        })?;

        info!("Created calendar event {}", inserted.id);
        Ok(inserted)
    }
}
