use super::models::AnalysisResult;
use crate::error::{analysis_error, AppResult};
use serde_json::Value;
use tracing::{debug, error};

const FENCE: &str = "```";

/// Remove one leading and one trailing markdown code fence.
///
/// Only the fence markers (and a language tag such as `json` right after the
/// opening fence, even with no break before the payload) are removed; the
/// payload between them is returned untouched.
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix(FENCE) {
        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(rest.len());
        let after_tag = &rest[tag_len..];
        // A bare word such as ```null``` is payload, not a tag
        let tag_ends = after_tag.is_empty()
            || after_tag.starts_with(|c: char| c.is_whitespace() || c == '{' || c == '[');
        text = if tag_ends {
            after_tag
        } else {
            rest
        };
    }

    if let Some(rest) = text.strip_suffix(FENCE) {
        text = rest;
    }

    text.trim()
}

/// Turn the raw model reply into an analysis result.
///
/// A missing `events` key (or a `null` document) is an empty result; malformed
/// JSON or any other shape is an error.
pub fn parse_analysis(raw: &str) -> AppResult<AnalysisResult> {
    let payload = strip_code_fence(raw);
    debug!("Parsing model reply ({} bytes after fence stripping)", payload.len());

    let value: Value = serde_json::from_str(payload).map_err(|e| {
        error!("Model reply is not valid JSON: {}", e);
        analysis_error(&format!("reply is not valid JSON: {}", e))
    })?;

    match value {
        Value::Null => Ok(AnalysisResult::default()),
        Value::Object(_) => serde_json::from_value(value).map_err(|e| {
            error!("Model reply has an unexpected shape: {}", e);
            analysis_error(&format!("unexpected reply shape: {}", e))
        }),
        other => Err(analysis_error(&format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::analyzer::EventCandidate;
    use crate::error::Error;

    const PAYLOAD: &str = r#"{"events": [{"summary": "科務會議", "start_time": "2026-01-21T08:00:00", "end_time": "2026-01-21T09:00:00"}]}"#;

    #[test]
    fn test_strip_variants() {
        let wrapped = [
            format!("```json\n{}\n```", PAYLOAD),
            format!("```JSON\n{}\n```\n", PAYLOAD),
            format!("```\n{}\n```", PAYLOAD),
            format!("  ```json {}```  ", PAYLOAD),
            format!("{}\n```", PAYLOAD),
            format!("```json{}```", PAYLOAD),
            PAYLOAD.to_string(),
        ];
        for input in &wrapped {
            assert_eq!(strip_code_fence(input), PAYLOAD, "input: {:?}", input);
        }
    }

    #[test]
    fn test_strip_keeps_inner_backticks() {
        let payload = r#"{"events": [{"summary": "Review ```code``` blocks", "start_time": "2026-01-21T08:00:00"}]}"#;
        let wrapped = format!("```json\n{}\n```", payload);
        assert_eq!(strip_code_fence(&wrapped), payload);
        let parsed = parse_analysis(&wrapped).unwrap();
        assert_eq!(parsed.events[0].summary.as_deref(), Some("Review ```code``` blocks"));
    }

    #[test]
    fn test_strip_inline_payload_without_tag() {
        assert_eq!(strip_code_fence("```null```"), "null");
        assert_eq!(strip_code_fence("```{\"events\": []}```"), "{\"events\": []}");
    }

    #[test]
    fn test_fenced_and_bare_parse_the_same() {
        let bare = parse_analysis(PAYLOAD).unwrap();
        let fenced = parse_analysis(&format!("```json\n{}\n```", PAYLOAD)).unwrap();
        assert_eq!(bare, fenced);
        assert_eq!(bare.events.len(), 1);
        assert_eq!(bare.events[0].summary.as_deref(), Some("科務會議"));
    }

    #[test]
    fn test_missing_or_null_events_is_empty() {
        assert!(parse_analysis("{}").unwrap().is_empty());
        assert!(parse_analysis(r#"{"events": null}"#).unwrap().is_empty());
        assert!(parse_analysis(r#"{"events": []}"#).unwrap().is_empty());
        assert!(parse_analysis("null").unwrap().is_empty());
        assert!(parse_analysis(r#"{"note": "nothing scheduled"}"#).unwrap().is_empty());
    }

    #[test]
    fn test_optional_fields_and_title_alias() {
        let parsed = parse_analysis(
            r#"{"events": [{"title": "Checkup", "start_time": "2026-02-01T09:00:00"}, {}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.events[0].summary.as_deref(), Some("Checkup"));
        assert!(parsed.events[0].end_time.is_none());
        assert_eq!(parsed.events[1], EventCandidate::default());
    }

    #[test]
    fn test_glued_language_tag_parses() {
        let parsed = parse_analysis(&format!("```json{}```", PAYLOAD)).unwrap();
        assert_eq!(parsed.events.len(), 1);
        assert_eq!(parsed.events[0].summary.as_deref(), Some("科務會議"));
    }

    #[test]
    fn test_bad_element_does_not_fail_the_reply() {
        let parsed = parse_analysis(
            r#"{"events": [
                {"summary": "Ward round", "start_time": "2026-01-21T07:30:00"},
                {"summary": 42, "start_time": "2026-01-21T09:00:00"},
                "lunch at noon",
                {"title": "Board meeting", "start_time": 20260121},
                {"summary": "Case review", "start_time": "2026-01-22T14:00:00"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(parsed.events.len(), 5);
        assert!(parsed.events[0].malformed.is_none());
        assert!(parsed.events[1].malformed.is_some());
        assert!(parsed.events[1].summary.is_none());
        assert!(parsed.events[2].malformed.is_some());
        assert!(parsed.events[3].malformed.is_some());
        assert_eq!(parsed.events[3].summary.as_deref(), Some("Board meeting"));
        assert!(parsed.events[4].malformed.is_none());
    }

    #[test]
    fn test_malformed_replies_are_analysis_errors() {
        let bad = [
            "Sorry, I could not find any events.",
            "```json\n{\"events\": [\n```",
            "[1, 2, 3]",
            "\"events\"",
            r#"{"events": "tomorrow"}"#,
            "",
        ];
        for input in bad {
            let err = parse_analysis(input).unwrap_err();
            assert!(matches!(err, Error::Analysis(_)), "input: {:?}", input);
        }
    }
}
