//! ZIP archive staging and entry traversal.

use crate::error::{IngestError, IngestResult};
use postmill_core::RawFile;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use zip::ZipArchive;

/// An uploaded archive staged on disk for extraction.
///
/// The scratch file is deleted when this value is dropped, whichever way the
/// import ends.
pub struct ScratchArchive {
    file: NamedTempFile,
}

impl ScratchArchive {
    /// Write `payload` to a fresh scratch file in `dir` (or the system temp dir).
    pub fn stage(payload: &[u8], dir: Option<&Path>) -> IngestResult<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("postmill-upload-").suffix(".zip");

        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(payload)?;
        file.flush()?;

        Ok(Self { file })
    }

    /// Location of the scratch file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Open the staged archive for reading.
    pub fn open(&self) -> IngestResult<ZipArchive<File>> {
        let handle = self.file.reopen()?;
        ZipArchive::new(handle).map_err(|e| IngestError::Archive(e.to_string()))
    }
}

/// Whether an archive entry name is a Markdown file.
pub fn is_markdown_entry(name: &str, case_insensitive: bool) -> bool {
    crate::parsers::MarkdownParser::new()
        .case_insensitive(case_insensitive)
        .supports(name)
}

fn entry_error(name: impl Into<String>, err: impl ToString) -> IngestError {
    IngestError::ArchiveEntry {
        name: name.into(),
        message: err.to_string(),
    }
}

/// Read the entry at `index` if it is a Markdown file.
///
/// Returns `Ok(None)` for directories and non-Markdown entries without
/// decompressing them.
pub(crate) fn read_markdown_entry(
    archive: &mut ZipArchive<File>,
    index: usize,
    case_insensitive: bool,
) -> IngestResult<Option<RawFile>> {
    // Only Markdown entries are opened, so unsupported compression elsewhere is ignored
    let name = match archive.name_for_index(index) {
        Some(name) if is_markdown_entry(name, case_insensitive) => name.to_string(),
        Some(_) => return Ok(None),
        None => return Err(entry_error(format!("#{}", index), "entry not found")),
    };

    let mut entry = archive
        .by_index(index)
        .map_err(|e| entry_error(name.as_str(), e))?;

    if entry.is_dir() {
        return Ok(None);
    }

    let mut bytes = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| entry_error(name.as_str(), e))?;

    let mut file = RawFile::new(name, bytes);
    file.name = file.base_name().to_string();
    Ok(Some(file))
}
