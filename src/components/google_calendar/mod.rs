mod client;
pub mod models;
pub mod token;
pub mod writer;

pub use client::{CalendarApi, CalendarConnector, CalendarSession, GoogleCalendar};
pub use models::{EventDateTime, EventResource, InsertedEvent};
pub use token::{OAuthClientConfig, OAuthToken, TokenManager, CALENDAR_SCOPE};
pub use writer::{write_events, InsertOutcome, WriteReport};
