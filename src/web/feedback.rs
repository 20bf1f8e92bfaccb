use crate::components::google_calendar::InsertOutcome;
use crate::components::RunReport;
use crate::error::{AppResult, Error};
use rust_i18n::t;

/// Severity of a feedback message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
    Success,
}

impl Level {
    pub fn css_class(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Success => "success",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Level::Info => "💡",
            Level::Warning => "⚠️",
            Level::Error => "❌",
            Level::Success => "✅",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackMessage {
    pub level: Level,
    pub text: String,
}

/// Everything shown to the user after a submission
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feedback {
    pub messages: Vec<FeedbackMessage>,
    /// Play the celebration animation
    pub celebrate: bool,
}

impl Feedback {
    fn push(&mut self, level: Level, text: impl Into<String>) {
        self.messages.push(FeedbackMessage {
            level,
            text: text.into(),
        });
    }

    pub fn warning(text: impl Into<String>) -> Self {
        let mut feedback = Self::default();
        feedback.push(Level::Warning, text);
        feedback
    }

    pub fn error(text: impl Into<String>) -> Self {
        let mut feedback = Self::default();
        feedback.push(Level::Error, text);
        feedback
    }

    /// Feedback for a finished (or halted) pipeline run
    pub fn from_run(result: &AppResult<RunReport>, locale: &str) -> Self {
        match result {
            Ok(report) => Self::from_report(report, locale),
            Err(err) => Self::from_error(err, locale),
        }
    }

    fn from_error(err: &Error, locale: &str) -> Self {
        let text = match err {
            Error::Document(_) => t!("feedback.pdf_unreadable", locale = locale),
            Error::Analysis(detail) | Error::LanguageModel(detail) => {
                t!("feedback.analysis_failed", locale = locale, error = detail)
            }
            Error::CredentialRefresh(_) => t!("feedback.credential_refresh_failed", locale = locale),
            Error::CredentialMissing(_) => t!("feedback.credential_missing", locale = locale),
            other => t!("feedback.unexpected", locale = locale, error = other.to_string()),
        };

        Self::error(text)
    }

    fn from_report(report: &RunReport, locale: &str) -> Self {
        let mut feedback = Self::default();

        let report = match report {
            RunReport::NoEvents => {
                feedback.push(Level::Info, t!("feedback.no_events", locale = locale));
                return feedback;
            }
            RunReport::Written(report) => report,
        };

        for outcome in &report.outcomes {
            match outcome {
                InsertOutcome::Created { summary, .. } => feedback.push(
                    Level::Success,
                    t!("feedback.event_created", locale = locale, summary = summary),
                ),
                InsertOutcome::Failed { summary, reason } => feedback.push(
                    Level::Error,
                    t!(
                        "feedback.event_failed",
                        locale = locale,
                        summary = summary,
                        reason = reason
                    ),
                ),
            }
        }

        let created = report.created_count();
        if created > 0 {
            feedback.push(
                Level::Success,
                t!("feedback.summary", locale = locale, count = created),
            );
            feedback.celebrate = true;
        }

        feedback
    }
}
