//! Title normalization for uploaded file names.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

lazy_static! {
    /// Page-ID suffix that Notion and similar tools append to exported file names.
    static ref EXPORT_ID_SUFFIX: Regex = Regex::new(r"(?i)\s+[0-9a-f]{32}$").unwrap();
}

/// Derive a human-readable title from a file name.
///
/// Drops any leading directories and the extension, then removes a trailing
/// `<whitespace><32 hex chars>` export suffix. A name that consists of nothing
/// but the suffix keeps it.
pub fn title_from_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let stem = Path::new(base)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(base);

    let stripped = EXPORT_ID_SUFFIX.replace(stem, "");
    if stripped.is_empty() {
        stem.to_string()
    } else {
        stripped.into_owned()
    }
}
