//! Layered JSON recovery for free-text model output.
//!
//! Tier 1 parses the (fence-stripped) body as a JSON object. Tier 2 scans for
//! top-level balanced `{...}` spans with a brace stack that skips string literals,
//! and parses the first span that is an object. Braces nested inside a rejected span
//! are never tried on their own. Callers treat `None` as the third tier.

use serde_json::{Map, Value};

use crate::llm_client::strip_json_fences;

/// Upper bound on the opening braces tried by the scan.
const MAX_BRACE_CANDIDATES: usize = 16;

pub fn extract_json_object(raw: &str) -> Option<Map<String, Value>> {
    parse_object(strip_json_fences(raw)).or_else(|| {
        top_level_spans(raw)
            .take(MAX_BRACE_CANDIDATES)
            .find_map(parse_object)
    })
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Yields top-level balanced `{...}` spans, left to right. Each span resumes the
/// scan after its closing brace; an unclosed `{` ends the scan.
fn top_level_spans(text: &str) -> impl Iterator<Item = &str> + '_ {
    let mut cursor = 0;
    std::iter::from_fn(move || {
        let start = cursor + text.get(cursor..)?.find('{')?;
        let end = match_closing_brace(text, start)?;
        cursor = end + 1;
        Some(&text[start..=end])
    })
}

/// Returns the byte index of the `}` closing the `{` at `start`, if any.
fn match_closing_brace(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json_object() {
        let map = extract_json_object(r#"{"strengths": ["clear"]}"#).unwrap();
        assert!(map.contains_key("strengths"));
    }

    #[test]
    fn test_fenced_json_object() {
        let map = extract_json_object("```json\n{\"overall_impression\": \"ok\"}\n```").unwrap();
        assert_eq!(map["overall_impression"], "ok");
    }

    #[test]
    fn test_object_embedded_in_prose() {
        let raw = "Here is my analysis:\n{\"ats_score\": 61, \"weaknesses\": []}\nHope it helps!";
        let map = extract_json_object(raw).unwrap();
        assert_eq!(map["ats_score"], 61);
    }

    #[test]
    fn test_scan_stops_at_first_object_instead_of_last_brace() {
        // A greedy first-to-last brace match would swallow the prose between objects.
        let raw = r#"First {"ats_score": 40} then {"ats_score": 90}"#;
        let map = extract_json_object(raw).unwrap();
        assert_eq!(map["ats_score"], 40);
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let raw = r#"Result: {"overall_impression": "uses } and { freely \" ok", "ats_score": 55} trailing"#;
        let map = extract_json_object(raw).unwrap();
        assert_eq!(map["ats_score"], 55);
    }

    #[test]
    fn test_malformed_first_span_falls_through_to_next() {
        let raw = r#"{not json} {"ats_score": 70}"#;
        let map = extract_json_object(raw).unwrap();
        assert_eq!(map["ats_score"], 70);
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        assert!(extract_json_object("[1, 2, 3]").is_none());
        assert!(extract_json_object("\"just a string\"").is_none());
    }

    #[test]
    fn test_no_json_at_all() {
        assert!(extract_json_object("I cannot evaluate this resume.").is_none());
        assert!(extract_json_object("unbalanced { brace").is_none());
        assert!(extract_json_object("").is_none());
    }

    #[test]
    fn test_nested_object_inside_broken_outer_is_not_used() {
        let raw = r#"{"ats_score": 72, "score_breakdown": {"skills": 12}, "strengths": ["x"],}"#;
        assert!(extract_json_object(raw).is_none());
    }

    #[test]
    fn test_unclosed_brace_ends_the_scan() {
        assert!(extract_json_object(r#"{"open": {"ats_score": 1}"#).is_none());
    }

    #[test]
    fn test_scan_tries_a_bounded_number_of_spans() {
        let raw = format!("{}{}", "{x} ".repeat(MAX_BRACE_CANDIDATES), r#"{"ats_score": 1}"#);
        assert!(extract_json_object(&raw).is_none());
        let raw = format!("{}{}", "{x} ".repeat(MAX_BRACE_CANDIDATES - 1), r#"{"ats_score": 1}"#);
        assert_eq!(extract_json_object(&raw).unwrap()["ats_score"], 1);
    }

    #[test]
    fn test_top_level_spans_skip_nested_braces() {
        let spans: Vec<&str> = top_level_spans(r#"a {"b": {"c": 1}} d {} e"#).collect();
        assert_eq!(spans, vec![r#"{"b": {"c": 1}}"#, "{}"]);
    }

    #[test]
    fn test_match_closing_brace_handles_nesting() {
        let text = r#"{"a": {"b": 1}} tail"#;
        assert_eq!(match_closing_brace(text, 0), Some(14));
    }
}
