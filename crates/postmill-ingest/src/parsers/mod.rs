//! Document parsers for imported files.

mod markdown;

pub use markdown::MarkdownParser;

use serde_yaml::Value;

/// Fields pulled out of a document before sanitation.
///
/// Metadata values keep their YAML shape (a tag list stays a list) until
/// [`crate::sanitize`] coerces them to text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub title: Value,
    pub tags: Value,
    pub category: Value,
    pub summary: Value,
    pub body: String,
}

impl ParsedDocument {
    /// A body-only document titled after its file.
    pub fn body_only(body: impl Into<String>, title: &str) -> Self {
        Self {
            title: Value::String(title.to_string()),
            tags: empty(),
            category: empty(),
            summary: empty(),
            body: body.into(),
        }
    }
}

fn empty() -> Value {
    Value::String(String::new())
}

/// Outcome of metadata extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// A frontmatter block was found and parsed.
    Frontmatter(ParsedDocument),
    /// No usable frontmatter; the whole text is the body.
    Fallback(ParsedDocument),
}

impl Extraction {
    pub fn used_fallback(&self) -> bool {
        matches!(self, Extraction::Fallback(_))
    }

    pub fn document(&self) -> &ParsedDocument {
        match self {
            Extraction::Frontmatter(doc) | Extraction::Fallback(doc) => doc,
        }
    }

    pub fn into_document(self) -> ParsedDocument {
        match self {
            Extraction::Frontmatter(doc) | Extraction::Fallback(doc) => doc,
        }
    }
}
