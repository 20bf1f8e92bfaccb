use chrono::DateTime;
use chrono_tz::Tz;

/// Upper bound on characters of user content placed in the prompt
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 5000;

const PROMPT_TEMPLATE: &str = "Current time: {now}
Analyze the content below and extract calendar events.

Rules:
1. Convert relative dates and times (tomorrow, Friday, next Wednesday morning) into ISO 8601 timestamps (YYYY-MM-DDTHH:MM:SS), resolved against the current time.
2. If an event has no end time, set it to one hour after the start.
3. Respond with pure JSON only. No explanations, no extra text.

Example:
{ \"events\": [ { \"summary\": \"Title\", \"start_time\": \"2026-01-20T10:00:00\", \"end_time\": \"2026-01-20T11:00:00\" } ] }

Content:
{content}";

/// First `max_chars` characters of `content`
pub fn truncate_chars(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

/// Build the extraction prompt for `content` as seen at `now`
pub fn build_prompt(now: DateTime<Tz>, content: &str, max_chars: usize) -> String {
    let now = now.format("%Y-%m-%d %H:%M:%S").to_string();
    PROMPT_TEMPLATE
        .replace("{now}", &now)
        .replace("{content}", truncate_chars(content, max_chars))
}
