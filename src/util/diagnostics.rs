//! Error enrichment: server messages and redacted body snippets.

use crate::{Auth, BodySnippetConfig};

const REDACTED: &str = "<redacted>";

/// The database reports failures as `{"error": "<message>"}`.
pub(crate) fn extract_message(body: &[u8]) -> Option<Box<str>> {
    let value = serde_json::from_slice::<serde_json::Value>(body).ok()?;
    let message = value.get("error")?.as_str()?.trim();
    (!message.is_empty()).then(|| message.into())
}

pub(crate) fn body_snippet(
    body: &[u8],
    config: BodySnippetConfig,
    auth: Option<&Auth>,
) -> Option<Box<str>> {
    if !config.enabled {
        return None;
    }

    let body = String::from_utf8_lossy(body);
    let snippet = truncate_utf8(&body, config.max_bytes).to_owned();
    Some(redact_text(snippet, auth).into_boxed_str())
}

pub(crate) fn truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

pub(crate) fn redact_text(text: String, auth: Option<&Auth>) -> String {
    auth.map(Auth::secrets)
        .unwrap_or_default()
        .into_iter()
        .filter(|secret| !secret.is_empty())
        .fold(text, |text, secret| text.replace(secret, REDACTED))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_message_reads_error_field() {
        let body = br#"{ "error" : "Permission denied" }"#;
        assert_eq!(extract_message(body).as_deref(), Some("Permission denied"));
        assert_eq!(extract_message(b"not json"), None);
    }

    #[test]
    fn extract_message_ignores_blank_and_non_string_errors() {
        assert_eq!(extract_message(br#"{"error":"  "}"#), None);
        assert_eq!(extract_message(br#"{"error":{"code":400}}"#), None);
    }

    #[test]
    fn body_snippet_truncates_on_char_boundary_and_redacts() {
        let auth = Auth::token("tok3n");
        let config = BodySnippetConfig {
            enabled: true,
            max_bytes: 9,
        };
        let snippet = body_snippet("tok3n ééé".as_bytes(), config, Some(&auth)).unwrap();
        assert_eq!(&*snippet, "<redacted> é");
    }
}
