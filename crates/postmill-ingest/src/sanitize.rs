//! Field sanitation: metadata values to storage-safe text.

use crate::parsers::ParsedDocument;
use postmill_core::{PostRecord, CATEGORY_MAX_CHARS, TAGS_MAX_CHARS, TITLE_MAX_CHARS};
use serde_yaml::Value;

/// Render a metadata value as text. Lists are joined with ", ".
fn coerce(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => items.iter().map(coerce).collect::<Vec<_>>().join(", "),
        Value::Mapping(_) | Value::Tagged(_) => serde_yaml::to_string(value)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn strip_nul(text: String) -> String {
    if text.contains('\0') {
        text.replace('\0', "")
    } else {
        text
    }
}

fn truncate_chars(text: String, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text,
    }
}

/// Turn a parsed document into a record authored by `author`.
pub fn sanitize(doc: ParsedDocument, author: &str) -> PostRecord {
    let clean = |value: &Value, max: usize| truncate_chars(strip_nul(coerce(value)), max);

    PostRecord {
        title: clean(&doc.title, TITLE_MAX_CHARS),
        tags: clean(&doc.tags, TAGS_MAX_CHARS),
        category: clean(&doc.category, CATEGORY_MAX_CHARS),
        summary: strip_nul(coerce(&doc.summary)),
        body: strip_nul(doc.body),
        author: author.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> ParsedDocument {
        ParsedDocument::body_only("body", "title")
    }

    #[test]
    fn test_tag_list_joined() {
        let mut d = doc();
        d.tags = Value::Sequence(vec![Value::from("a"), Value::from("b")]);

        let record = sanitize(d, "admin");
        assert_eq!(record.tags, "a, b");
        assert_eq!(record.author, "admin");
    }

    #[test]
    fn test_non_string_values() {
        let d = ParsedDocument {
            title: Value::from(2025),
            tags: Value::Sequence(vec![Value::from(1), Value::from(true)]),
            category: Value::Bool(false),
            summary: Value::Null,
            body: String::new(),
        };

        let record = sanitize(d, "admin");
        assert_eq!(record.title, "2025");
        assert_eq!(record.tags, "1, true");
        assert_eq!(record.category, "false");
        assert_eq!(record.summary, "");
    }

    #[test]
    fn test_mapping_rendered_as_yaml() {
        let mut d = doc();
        d.summary = serde_yaml::from_str("lang: en").unwrap();

        assert_eq!(sanitize(d, "admin").summary, "lang: en");
    }

    #[test]
    fn test_strips_nul_from_every_field() {
        // YAML "\0" escapes reach the metadata even after decoding stripped raw NULs
        let d = ParsedDocument {
            title: Value::from("T\0itle"),
            tags: Value::Sequence(vec![Value::from("a\0"), Value::from("b")]),
            category: Value::from("\0cat"),
            summary: Value::from("sum\0"),
            body: "bo\0dy".to_string(),
        };

        let record = sanitize(d, "admin");
        assert_eq!(record.title, "Title");
        assert_eq!(record.tags, "a, b");
        assert_eq!(record.category, "cat");
        assert_eq!(record.summary, "sum");
        assert_eq!(record.body, "body");
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_truncates_on_char_boundaries() {
        let mut d = doc();
        d.title = Value::from("标".repeat(TITLE_MAX_CHARS + 10));
        d.category = Value::from("c".repeat(CATEGORY_MAX_CHARS + 1));

        let record = sanitize(d, "admin");
        assert_eq!(record.title.chars().count(), TITLE_MAX_CHARS);
        assert_eq!(record.category.len(), CATEGORY_MAX_CHARS);
        assert!(record.validate().is_ok());
    }
}
