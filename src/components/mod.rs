pub mod analyzer;
pub mod assistant;
pub mod document;
pub mod google_calendar;

pub use analyzer::{AnalysisResult, EventCandidate, LanguageModel, SchedulingAnalyzer};
pub use assistant::{RunReport, SchedulingAssistant};
pub use google_calendar::{CalendarApi, CalendarConnector, GoogleCalendar};
