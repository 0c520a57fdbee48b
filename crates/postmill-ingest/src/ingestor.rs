//! Main ingestion logic.

use crate::archive::{read_markdown_entry, ScratchArchive};
use crate::decode::{decode, SourceEncoding};
use crate::error::IngestResult;
use crate::filename::title_from_filename;
use crate::parsers::MarkdownParser;
use crate::sanitize::sanitize;
use postmill_config::ImportConfig;
use postmill_core::{Post, PostRecord, RawFile};
use postmill_db::Database;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Import behaviour knobs.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Accept `.MD` / `.Markdown` archive entries.
    pub case_insensitive_extensions: bool,
    /// Fail the whole archive when one entry cannot be read.
    pub abort_on_entry_error: bool,
    /// Where archives are staged; the system temp dir when unset.
    pub scratch_dir: Option<PathBuf>,
}

impl IngestOptions {
    /// Build options from the `[import]` config section.
    pub fn from_import_config(config: &ImportConfig) -> Self {
        Self {
            case_insensitive_extensions: config.case_insensitive_extensions,
            abort_on_entry_error: config.abort_on_entry_error,
            scratch_dir: config.scratch_dir.as_ref().map(PathBuf::from),
        }
    }
}

/// The shapes an upload can take.
#[derive(Debug, Clone)]
pub enum Upload {
    Single(RawFile),
    Multiple(Vec<RawFile>),
    Archive(RawFile),
}

/// A record produced by the pipeline, not yet stored.
#[derive(Debug, Clone)]
pub struct PreparedPost {
    pub source_name: String,
    pub record: PostRecord,
    pub encoding: SourceEncoding,
    /// True when no usable frontmatter was found.
    pub used_fallback: bool,
}

/// Result of importing one file.
#[derive(Debug, Clone)]
pub struct IngestedPost {
    pub source_name: String,
    pub post: Post,
    pub encoding: SourceEncoding,
    pub used_fallback: bool,
}

/// Main ingestor for importing Markdown uploads.
pub struct Ingestor {
    db: Database,
    parser: MarkdownParser,
    options: IngestOptions,
}

impl Ingestor {
    /// Create a new ingestor.
    pub fn new(db: Database, options: IngestOptions) -> Self {
        let parser = MarkdownParser::new().case_insensitive(options.case_insensitive_extensions);
        Self {
            db,
            parser,
            options,
        }
    }

    /// Run one file through decode, frontmatter extraction and sanitation.
    pub fn prepare(&self, file: &RawFile, author: &str) -> PreparedPost {
        let decoded = decode(&file.bytes);
        let fallback_title = title_from_filename(&file.name);

        let extraction = self.parser.extract(&decoded.text, &fallback_title);
        let used_fallback = extraction.used_fallback();
        if used_fallback {
            debug!("No frontmatter in {}, using file name as title", file.name);
        }

        PreparedPost {
            source_name: file.name.clone(),
            record: sanitize(extraction.into_document(), author),
            encoding: decoded.encoding,
            used_fallback,
        }
    }

    /// Import a single file as a new post.
    pub fn ingest_file(&self, file: &RawFile, author: &str) -> IngestResult<IngestedPost> {
        let prepared = self.prepare(file, author);
        let post = self.db.create_post(&prepared.record)?;

        info!(
            "Imported {} as \"{}\" ({}, {})",
            prepared.source_name, post.title, post.id, prepared.encoding
        );

        Ok(IngestedPost {
            source_name: prepared.source_name,
            post,
            encoding: prepared.encoding,
            used_fallback: prepared.used_fallback,
        })
    }

    /// Import files in order. Stops at the first storage failure.
    pub fn ingest_files(&self, files: &[RawFile], author: &str) -> IngestResult<usize> {
        for file in files {
            self.ingest_file(file, author)?;
        }
        Ok(files.len())
    }

    /// Import every Markdown entry of a ZIP payload. Returns the number of posts created.
    pub fn ingest_archive(&self, payload: &[u8], author: &str) -> IngestResult<usize> {
        let posts = self.archive_entries(payload, |file| self.ingest_file(&file, author))?;
        Ok(posts.len())
    }

    /// Import an upload of any shape. Returns the number of posts created.
    pub fn ingest_upload(&self, upload: &Upload, author: &str) -> IngestResult<usize> {
        match upload {
            Upload::Single(file) => self.ingest_file(file, author).map(|_| 1),
            Upload::Multiple(files) => self.ingest_files(files, author),
            Upload::Archive(file) => self.ingest_archive(&file.bytes, author),
        }
    }

    /// Import an upload and report every created post.
    pub fn import(&self, upload: &Upload, author: &str) -> IngestResult<Vec<IngestedPost>> {
        match upload {
            Upload::Single(file) => Ok(vec![self.ingest_file(file, author)?]),
            Upload::Multiple(files) => files
                .iter()
                .map(|file| self.ingest_file(file, author))
                .collect(),
            Upload::Archive(file) => {
                self.archive_entries(&file.bytes, |entry| self.ingest_file(&entry, author))
            }
        }
    }

    /// Run the pipeline over an upload without storing anything.
    pub fn preview(&self, upload: &Upload, author: &str) -> IngestResult<Vec<PreparedPost>> {
        match upload {
            Upload::Single(file) => Ok(vec![self.prepare(file, author)]),
            Upload::Multiple(files) => Ok(files.iter().map(|f| self.prepare(f, author)).collect()),
            Upload::Archive(file) => {
                self.archive_entries(&file.bytes, |entry| Ok(self.prepare(&entry, author)))
            }
        }
    }

    /// Stage an archive and feed each Markdown entry to `visit`, in archive order.
    fn archive_entries<T, F>(&self, payload: &[u8], mut visit: F) -> IngestResult<Vec<T>>
    where
        F: FnMut(RawFile) -> IngestResult<T>,
    {
        let scratch = ScratchArchive::stage(payload, self.options.scratch_dir.as_deref())?;
        debug!("Staged archive at {}", scratch.path().display());

        let mut archive = scratch.open()?;
        let mut results = Vec::new();
        let mut skipped = 0;

        for index in 0..archive.len() {
            match read_markdown_entry(&mut archive, index, self.options.case_insensitive_extensions)
            {
                Ok(Some(file)) => results.push(visit(file)?),
                Ok(None) => {}
                Err(e) if !self.options.abort_on_entry_error => {
                    warn!("Skipping entry: {}", e);
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Archive processed: {} of {} entries imported, {} skipped",
            results.len(),
            archive.len(),
            skipped
        );
        Ok(results)
    }
}
