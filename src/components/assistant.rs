use super::analyzer::{GeminiModel, SchedulingAnalyzer};
use super::document;
use super::google_calendar::{write_events, CalendarConnector, GoogleCalendar, WriteReport};
use crate::config::Config;
use crate::error::AppResult;
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::info;

/// What one submission produced
#[derive(Debug, Clone, PartialEq)]
pub enum RunReport {
    /// The model found nothing to schedule
    NoEvents,
    /// Events were sent to the calendar
    Written(WriteReport),
}

/// Runs analyze → connect → write for one user action
#[derive(Clone)]
pub struct SchedulingAssistant {
    analyzer: SchedulingAnalyzer,
    calendar: Arc<dyn CalendarConnector>,
    time_zone: Tz,
}

impl SchedulingAssistant {
    pub fn new(
        analyzer: SchedulingAnalyzer,
        calendar: Arc<dyn CalendarConnector>,
        time_zone: Tz,
    ) -> Self {
        Self {
            analyzer,
            calendar,
            time_zone,
        }
    }

    /// Wire the Gemini model and Google Calendar from configuration
    pub fn from_config(config: &Config) -> Self {
        let model = Arc::new(GeminiModel::new(
            &config.secrets.gemini_api_key,
            &config.gemini_model,
        ));
        let analyzer = SchedulingAnalyzer::new(model, config.timezone, config.max_content_chars);
        let calendar = Arc::new(GoogleCalendar::from_config(config));
        Self::new(analyzer, calendar, config.timezone)
    }

    /// Analyze free-form text and insert the events it describes
    pub async fn analyze_and_schedule(&self, content: &str) -> AppResult<RunReport> {
        let analysis = self.analyzer.analyze(content).await?;
        if analysis.is_empty() {
            info!("No events found in submitted content");
            return Ok(RunReport::NoEvents);
        }

        let calendar = self.calendar.connect().await?;
        let report = write_events(calendar.as_ref(), &analysis.events, self.time_zone.name()).await;
        Ok(RunReport::Written(report))
    }

    /// Extract the text of a PDF and schedule what it describes
    pub async fn schedule_document(&self, pdf_bytes: &[u8]) -> AppResult<RunReport> {
        let text = document::extract_text(pdf_bytes)?;
        info!("Extracted {} characters from uploaded PDF", text.chars().count());
        self.analyze_and_schedule(&text).await
    }
}
