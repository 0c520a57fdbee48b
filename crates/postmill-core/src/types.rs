//! Core domain types for Postmill.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Unique identifier for stored posts.
pub type PostId = String;

/// Identity reference of the authoring user.
pub type AuthorId = String;

/// Maximum length of a post title, in characters.
pub const TITLE_MAX_CHARS: usize = 200;

/// Maximum length of the comma-joined tag string, in characters.
pub const TAGS_MAX_CHARS: usize = 200;

/// Maximum length of a post category, in characters.
pub const CATEGORY_MAX_CHARS: usize = 100;

/// Generate a new unique ID.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Split a comma-separated tag string into trimmed, non-empty tags.
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// An uploaded file payload, either a loose file or an archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, keeping only its file name.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }

    /// File name without any leading directories.
    pub fn base_name(&self) -> &str {
        self.name.rsplit(['/', '\\']).next().unwrap_or(&self.name)
    }
}

/// A normalized post, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub title: String,
    pub body: String,
    pub summary: String,
    pub tags: String,
    pub category: String,
    pub author: AuthorId,
}

impl PostRecord {
    /// Tags as a list.
    pub fn tag_list(&self) -> Vec<String> {
        split_tags(&self.tags)
    }

    /// Check the storage invariants: no NUL characters, bounded title/tags/category.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("title", &self.title),
            ("body", &self.body),
            ("summary", &self.summary),
            ("tags", &self.tags),
            ("category", &self.category),
        ];
        for (name, value) in fields {
            if value.contains('\0') {
                return Err(Error::InvalidRecord(format!("{} contains a NUL character", name)));
            }
        }

        let limits = [
            ("title", &self.title, TITLE_MAX_CHARS),
            ("tags", &self.tags, TAGS_MAX_CHARS),
            ("category", &self.category, CATEGORY_MAX_CHARS),
        ];
        for (name, value, max) in limits {
            if value.chars().count() > max {
                return Err(Error::InvalidRecord(format!(
                    "{} exceeds {} characters",
                    name, max
                )));
            }
        }

        Ok(())
    }
}

/// A persisted blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub author: AuthorId,
    pub tags: String,
    pub category: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Build a published post from an ingested record.
    pub fn from_record(record: PostRecord) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            title: record.title,
            content: record.body,
            summary: record.summary,
            author: record.author,
            tags: record.tags,
            category: record.category,
            is_published: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Tags as a list.
    pub fn tag_list(&self) -> Vec<String> {
        split_tags(&self.tags)
    }
}
