use super::client::CalendarApi;
use super::models::{EventDateTime, EventResource};
use crate::components::analyzer::EventCandidate;
use rust_i18n::t;
use tracing::{error, info};

/// Result of inserting one event candidate
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Created {
        summary: String,
        event_id: String,
        html_link: Option<String>,
    },
    Failed {
        summary: String,
        reason: String,
    },
}

impl InsertOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, InsertOutcome::Created { .. })
    }

    pub fn summary(&self) -> &str {
        match self {
            InsertOutcome::Created { summary, .. } | InsertOutcome::Failed { summary, .. } => summary,
        }
    }
}

/// Per-candidate outcomes of one write pass, in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteReport {
    pub outcomes: Vec<InsertOutcome>,
}

impl WriteReport {
    pub fn created_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_created()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.created_count()
    }
}

/// Title for the event, falling back to a placeholder
fn event_summary(candidate: &EventCandidate) -> String {
    candidate
        .summary
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| t!("calendar.default_summary").to_string())
}

/// End time to submit: the given end, or the start itself when it is missing
pub fn resolve_end_time(start: &str, end: Option<&str>) -> String {
    end.map(str::trim)
        .filter(|e| !e.is_empty())
        .unwrap_or(start)
        .to_string()
}

/// Build the insert request for a candidate.
///
/// Fails when the model's record was malformed or has no start time.
pub fn build_event_resource(
    candidate: &EventCandidate,
    time_zone: &str,
) -> Result<EventResource, String> {
    if let Some(reason) = &candidate.malformed {
        return Err(reason.clone());
    }

    let start = candidate
        .start_time
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "event has no start_time".to_string())?;

    let end = resolve_end_time(start, candidate.end_time.as_deref());

    Ok(EventResource {
        summary: event_summary(candidate),
        start: EventDateTime {
            date_time: start.to_string(),
            time_zone: time_zone.to_string(),
        },
        end: EventDateTime {
            date_time: end,
            time_zone: time_zone.to_string(),
        },
    })
}

/// Insert every candidate, one after another.
///
/// A failed insert is recorded and the loop moves on to the next candidate.
pub async fn write_events(
    calendar: &dyn CalendarApi,
    candidates: &[EventCandidate],
    time_zone: &str,
) -> WriteReport {
    let mut report = WriteReport::default();

    for candidate in candidates {
        let summary = event_summary(candidate);

        let outcome = match build_event_resource(candidate, time_zone) {
            Ok(resource) => match calendar.insert_event(&resource).await {
                Ok(inserted) => InsertOutcome::Created {
                    summary,
                    event_id: inserted.id,
                    html_link: inserted.html_link,
                },
                Err(e) => {
                    error!("Failed to create event '{}': {}", summary, e);
                    InsertOutcome::Failed {
                        summary,
                        reason: e.to_string(),
                    }
                }
            },
            Err(reason) => {
                error!("Skipping event '{}': {}", summary, reason);
                InsertOutcome::Failed { summary, reason }
            }
        };

        report.outcomes.push(outcome);
    }

    info!(
        "Calendar write finished: {} created, {} failed",
        report.created_count(),
        report.failed_count()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(summary: Option<&str>, start: Option<&str>, end: Option<&str>) -> EventCandidate {
        EventCandidate {
            summary: summary.map(str::to_string),
            start_time: start.map(str::to_string),
            end_time: end.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_event_resource_tags_time_zone() {
        let resource = build_event_resource(
            &candidate(Some("Team sync"), Some("2026-01-21T08:00:00"), Some("2026-01-21T08:30:00")),
            "Asia/Taipei",
        )
        .unwrap();
        assert_eq!(resource.summary, "Team sync");
        assert_eq!(resource.start.time_zone, "Asia/Taipei");
        assert_eq!(resource.end.time_zone, "Asia/Taipei");
        assert_eq!(resource.end.date_time, "2026-01-21T08:30:00");
    }

    #[test]
    fn test_build_event_resource_defaults_end_and_title() {
        let resource =
            build_event_resource(&candidate(None, Some("2026-01-21T08:00:00"), None), "UTC").unwrap();
        assert_eq!(resource.start.date_time, "2026-01-21T08:00:00");
        assert_eq!(resource.end.date_time, "2026-01-21T08:00:00");
        assert!(!resource.summary.is_empty());
    }

    #[test]
    fn test_missing_end_uses_start() {
        assert_eq!(
            resolve_end_time("2026-01-21T08:00:00", None),
            "2026-01-21T08:00:00"
        );
        // Blank end counts as missing
        assert_eq!(
            resolve_end_time("2026-01-21T08:00:00", Some("  ")),
            "2026-01-21T08:00:00"
        );
        assert_eq!(resolve_end_time("sometime friday", None), "sometime friday");
        assert_eq!(
            resolve_end_time("2026-01-20T10:00:00", Some("2026-01-20T12:30:00")),
            "2026-01-20T12:30:00"
        );
    }

    #[test]
    fn test_malformed_candidate_is_not_sent() {
        let malformed = EventCandidate::from_value(&serde_json::json!({
            "summary": 42,
            "start_time": "2026-01-21T09:00:00"
        }));
        let err = build_event_resource(&malformed, "UTC").unwrap_err();
        assert!(err.starts_with("malformed event"));
    }

    #[test]
    fn test_build_event_resource_requires_start() {
        assert!(build_event_resource(&candidate(Some("No start"), None, None), "UTC").is_err());
        assert!(build_event_resource(&candidate(Some("Blank"), Some(" "), None), "UTC").is_err());
    }

    #[test]
    fn test_report_counts() {
        let report = WriteReport {
            outcomes: vec![
                InsertOutcome::Created {
                    summary: "a".to_string(),
                    event_id: "1".to_string(),
                    html_link: None,
                },
                InsertOutcome::Failed {
                    summary: "b".to_string(),
                    reason: "boom".to_string(),
                },
            ],
        };
        assert_eq!(report.created_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.outcomes[1].summary(), "b");
    }
}
