//! Field helpers for structured logging

use uuid::Uuid;

/// Characters of a query kept in a log preview.
pub const PREVIEW_CHARS: usize = 100;

/// Truncated query preview for logging (privacy-safe)
///
/// Returns `None` unless content logging is enabled, or when the query is
/// blank. Support queries routinely carry personal data, so only the first
/// [`PREVIEW_CHARS`] characters are ever logged.
///
/// # Examples
///
/// ```
/// use triage::logging::query_preview;
///
/// assert_eq!(query_preview("SSO is broken", false), None);
/// assert_eq!(query_preview("SSO is broken", true).as_deref(), Some("SSO is broken"));
/// ```
pub fn query_preview(query: &str, enable_content_logging: bool) -> Option<String> {
    if !enable_content_logging {
        return None;
    }

    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    Some(truncate_string(query, PREVIEW_CHARS))
}

/// Correlation id for one support request (UUID v4).
///
/// Attached to every event the pipeline emits for that request.
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Truncate to at most `max_chars` characters, marking the cut with `...`
fn truncate_string(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}
