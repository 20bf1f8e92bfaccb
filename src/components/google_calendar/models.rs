use serde::{Deserialize, Serialize};

/// Start or end of an event, tagged with an IANA time zone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

/// Body of an `events.insert` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventResource {
    pub summary: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

/// The parts of the created event we care about
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InsertedEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "htmlLink")]
    pub html_link: Option<String>,
}
