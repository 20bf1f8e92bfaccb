use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A calendar entry proposed by the model, not yet inserted
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EventCandidate {
    /// Event title
    #[serde(default, alias = "title")]
    pub summary: Option<String>,
    /// ISO-8601 start
    #[serde(default)]
    pub start_time: Option<String>,
    /// ISO-8601 end, if the model gave one
    #[serde(default)]
    pub end_time: Option<String>,
    /// Why the model's record could not be read as an event
    #[serde(skip)]
    pub malformed: Option<String>,
}

impl EventCandidate {
    /// Read one element of the `events` array.
    ///
    /// An element of the wrong shape still yields a candidate, carrying the
    /// reason, so the rest of the batch is unaffected.
    pub fn from_value(value: &Value) -> Self {
        match EventCandidate::deserialize(value) {
            Ok(candidate) => candidate,
            Err(e) => EventCandidate {
                summary: value
                    .get("summary")
                    .or_else(|| value.get("title"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                malformed: Some(format!("malformed event: {}", e)),
                ..Default::default()
            },
        }
    }
}

/// Parsed model reply
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "lenient_events")]
    pub events: Vec<EventCandidate>,
}

impl AnalysisResult {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

// `events` must be an array (or null); its elements are read one by one
fn lenient_events<'de, D>(deserializer: D) -> Result<Vec<EventCandidate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw.iter().map(EventCandidate::from_value).collect())
}
