//! Markdown document parser.

use super::{Extraction, ParsedDocument};
use serde_yaml::{Mapping, Value};
use tracing::debug;

/// Parser for Markdown files with optional YAML frontmatter.
pub struct MarkdownParser {
    /// Whether `.MD` / `.Markdown` count as Markdown.
    case_insensitive: bool,
}

impl MarkdownParser {
    /// Create a new markdown parser.
    pub fn new() -> Self {
        Self {
            case_insensitive: false,
        }
    }

    /// Match extensions regardless of case.
    pub fn case_insensitive(mut self, enabled: bool) -> Self {
        self.case_insensitive = enabled;
        self
    }

    /// Get the supported file extensions.
    pub fn extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    /// Check if a file name carries a Markdown extension.
    pub fn supports(&self, name: &str) -> bool {
        self.extensions().iter().any(|ext| {
            let suffix = format!(".{}", ext);
            if self.case_insensitive {
                name.len() >= suffix.len()
                    && name.is_char_boundary(name.len() - suffix.len())
                    && name[name.len() - suffix.len()..].eq_ignore_ascii_case(&suffix)
            } else {
                name.ends_with(&suffix)
            }
        })
    }

    /// Split decoded text into metadata and body.
    ///
    /// Never fails: anything that is not a well-formed YAML mapping between
    /// `---` lines yields [`Extraction::Fallback`] with the text untouched.
    pub fn extract(&self, text: &str, fallback_title: &str) -> Extraction {
        let Some((block, body)) = split_frontmatter(text) else {
            return Extraction::Fallback(ParsedDocument::body_only(text, fallback_title));
        };

        match serde_yaml::from_str::<Value>(block) {
            Ok(Value::Mapping(map)) => {
                Extraction::Frontmatter(from_mapping(&map, body, fallback_title))
            }
            Ok(Value::Null) => {
                Extraction::Frontmatter(ParsedDocument::body_only(body, fallback_title))
            }
            Ok(other) => {
                debug!("Frontmatter is not a mapping ({:?}), using whole text", other);
                Extraction::Fallback(ParsedDocument::body_only(text, fallback_title))
            }
            Err(e) => {
                debug!("Invalid frontmatter: {}", e);
                Extraction::Fallback(ParsedDocument::body_only(text, fallback_title))
            }
        }
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

fn is_delimiter(line: &str) -> bool {
    let line = line.trim_end();
    line.len() >= 3 && line.bytes().all(|b| b == b'-')
}

/// Locate a leading `---` fenced block. Returns `(yaml, body)`.
fn split_frontmatter(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start_matches('\u{FEFF}').trim_start();
    let mut lines = text.split_inclusive('\n');

    let opening = lines.next()?;
    if !is_delimiter(opening) {
        return None;
    }

    let block_start = opening.len();
    let mut offset = block_start;
    for line in lines {
        if is_delimiter(line) {
            let block = &text[block_start..offset];
            let body = text[offset + line.len()..].trim();
            return Some((block, body));
        }
        offset += line.len();
    }

    None
}

fn from_mapping(map: &Mapping, body: &str, fallback_title: &str) -> ParsedDocument {
    let mut doc = ParsedDocument::body_only(body, fallback_title);

    for (key, slot) in [
        ("title", &mut doc.title),
        ("tags", &mut doc.tags),
        ("category", &mut doc.category),
        ("summary", &mut doc.summary),
    ] {
        match map.get(key) {
            Some(Value::Null) | None => {}
            Some(value) => *slot = value.clone(),
        }
    }

    doc
}
