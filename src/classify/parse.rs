//! Extraction of JSON objects from free-form model output.

/// Remove Markdown code fences (```` ```json ```` and ```` ``` ````), case-insensitively.
pub fn strip_code_fences(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find("```") {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 3..];
        if rest
            .get(..4)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("json"))
        {
            rest = &rest[4..];
        }
    }
    out.push_str(rest);

    out.trim().to_string()
}

/// Slice from the first `{` to the last `}`, if both exist in that order.
pub fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse the JSON object embedded in a model completion.
///
/// Returns `None` when no object can be recovered; callers choose their own
/// fallback.
pub fn parse_json_object(raw: &str) -> Option<serde_json::Value> {
    let cleaned = strip_code_fences(raw);
    let candidate = outermost_object(&cleaned).unwrap_or(&cleaned);

    serde_json::from_str::<serde_json::Value>(candidate)
        .ok()
        .filter(serde_json::Value::is_object)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        let raw = "```json\n{\"topic\": \"SSO\"}\n```";
        assert_eq!(strip_code_fences(raw), "{\"topic\": \"SSO\"}");

        let raw = "```JSON\n{}\n```";
        assert_eq!(strip_code_fences(raw), "{}");

        assert_eq!(strip_code_fences("  plain  "), "plain");
    }

    #[test]
    fn test_outermost_object() {
        assert_eq!(
            outermost_object("Sure! {\"a\": {\"b\": 1}} hope that helps"),
            Some("{\"a\": {\"b\": 1}}")
        );
        assert_eq!(outermost_object("no braces"), None);
        assert_eq!(outermost_object("} backwards {"), None);
    }

    #[test]
    fn test_parse_json_object_with_prose_and_fences() {
        let raw = "Here you go:\n```json\n{\"priority\": \"P0\"}\n```";
        let value = parse_json_object(raw).unwrap();
        assert_eq!(value["priority"], "P0");
    }

    #[test]
    fn test_parse_json_object_rejects_garbage() {
        assert!(parse_json_object("I cannot classify this").is_none());
        assert!(parse_json_object("{not json}").is_none());
        assert!(parse_json_object("[1, 2, 3]").is_none());
    }
}
