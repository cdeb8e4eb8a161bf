//! Bounded call summaries fed to the assessor

use crate::operation::Arguments;

const ELLIPSIS: &str = "...";

/// `"<operation>: <argument dump>"`, with the dump cut at `max_chars` characters
pub fn summarize(operation_name: &str, arguments: &Arguments, max_chars: usize) -> String {
    let dump = serde_json::to_string(arguments).unwrap_or_default();
    format!("{}: {}", operation_name, truncate_chars(&dump, max_chars))
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: serde_json::Value) -> Arguments {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_short_dump_untouched() {
        let s = summarize("read_file", &args(json!({"path": "a.rs"})), 500);
        assert_eq!(s, r#"read_file: {"path":"a.rs"}"#);
    }

    #[test]
    fn test_long_dump_truncated() {
        let long = "x".repeat(2_000);
        let s = summarize("write", &args(json!({ "body": long })), 20);
        assert!(s.ends_with("..."));
        assert_eq!(s.chars().count(), "write: ".len() + 20 + 3);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll...");
        assert_eq!(truncate_chars("ab", 2), "ab");
    }
}
