//! Postmill Ingest - Markdown import pipeline.
//!
//! This crate provides:
//! - Byte decoding with an ordered legacy-encoding fallback
//! - Title normalization for exported file names
//! - YAML frontmatter extraction and field sanitation
//! - Single-file, multi-file and ZIP archive imports

mod archive;
mod decode;
mod error;
mod filename;
mod ingestor;
mod parsers;
mod sanitize;

pub use archive::{is_markdown_entry, ScratchArchive};
pub use decode::{decode, decode_text, Decoded, SourceEncoding, DECODE_ORDER};
pub use error::{IngestError, IngestResult};
pub use filename::title_from_filename;
pub use ingestor::{IngestOptions, IngestedPost, Ingestor, PreparedPost, Upload};
pub use parsers::{Extraction, MarkdownParser, ParsedDocument};
pub use sanitize::sanitize;
