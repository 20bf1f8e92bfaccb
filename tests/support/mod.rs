//! Fakes shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use schedule_assistant::components::google_calendar::{EventResource, InsertedEvent};
use schedule_assistant::components::{
    CalendarApi, CalendarConnector, LanguageModel, SchedulingAnalyzer, SchedulingAssistant,
};
use schedule_assistant::error::{AppResult, Error};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TIME_ZONE: chrono_tz::Tz = chrono_tz::Asia::Taipei;

/// Model that returns a fixed reply and records every prompt it sees
pub struct FakeModel {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl FakeModel {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// Calendar that rejects the inserts listed in `fail_on` (1-based)
/// and remembers every request body
#[derive(Default)]
pub struct FakeCalendar {
    fail_on: Vec<usize>,
    credential_error: Option<fn() -> Error>,
    connects: AtomicUsize,
    inserted: Arc<Mutex<Vec<EventResource>>>,
}

impl FakeCalendar {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_on(fail_on: &[usize]) -> Arc<Self> {
        Arc::new(Self {
            fail_on: fail_on.to_vec(),
            ..Default::default()
        })
    }

    pub fn without_credentials(error: fn() -> Error) -> Arc<Self> {
        Arc::new(Self {
            credential_error: Some(error),
            ..Default::default()
        })
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn inserted(&self) -> Vec<EventResource> {
        self.inserted.lock().unwrap().clone()
    }
}

struct FakeSession {
    fail_on: Vec<usize>,
    inserted: Arc<Mutex<Vec<EventResource>>>,
}

#[async_trait]
impl CalendarApi for FakeSession {
    async fn insert_event(&self, event: &EventResource) -> AppResult<InsertedEvent> {
        let mut inserted = self.inserted.lock().unwrap();
        inserted.push(event.clone());
        let attempt = inserted.len();

        if self.fail_on.contains(&attempt) {
            return Err(Error::GoogleCalendar(
                "HTTP 400 Bad Request - invalid start time".to_string(),
            ));
        }

        Ok(InsertedEvent {
            id: format!("evt{}", attempt),
            html_link: Some(format!("https://calendar.google.com/event?eid=evt{}", attempt)),
        })
    }
}

#[async_trait]
impl CalendarConnector for FakeCalendar {
    async fn connect(&self) -> AppResult<Box<dyn CalendarApi>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.credential_error {
            return Err(error());
        }
        Ok(Box::new(FakeSession {
            fail_on: self.fail_on.clone(),
            inserted: self.inserted.clone(),
        }))
    }
}

pub fn assistant(model: Arc<FakeModel>, calendar: Arc<FakeCalendar>) -> SchedulingAssistant {
    let analyzer = SchedulingAnalyzer::new(model, TIME_ZONE, 5000);
    SchedulingAssistant::new(analyzer, calendar, TIME_ZONE)
}
