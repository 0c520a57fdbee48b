//! Import command implementation.

use super::{expand_path, get_database, get_paths, short_id};
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use postmill_config::Config;
use postmill_core::RawFile;
use postmill_db::Database;
use postmill_ingest::{is_markdown_entry, IngestOptions, Ingestor, Upload};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Import files, directories or a ZIP archive.
pub fn run(paths: &[String], author: Option<String>, dry_run: bool, json: bool) -> Result<()> {
    let app_paths = get_paths()?;
    let config = Config::load_from(&app_paths.config_file).context("Failed to load config")?;
    let author = author.unwrap_or_else(|| config.import.default_author.clone());

    let inputs: Vec<PathBuf> = paths.iter().map(|p| expand_path(p)).collect();
    let upload = build_upload(&inputs, config.import.case_insensitive_extensions)?;

    if let Upload::Multiple(files) = &upload {
        if files.is_empty() {
            println!("{}", "No Markdown files found.".yellow());
            return Ok(());
        }
    }

    let mut options = IngestOptions::from_import_config(&config.import);
    if options.scratch_dir.is_none() && app_paths.scratch_dir.is_dir() {
        options.scratch_dir = Some(app_paths.scratch_dir.clone());
    }
    debug!(
        "Import of {} as {} (dry run: {})",
        describe(&upload),
        author,
        dry_run
    );

    if dry_run {
        // The pipeline needs a store handle even though nothing is written
        let ingestor = Ingestor::new(Database::open_in_memory()?, options);
        return preview(&ingestor, &upload, &author, json);
    }

    let ingestor = Ingestor::new(get_database()?, options);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Importing {}", describe(&upload)));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = ingestor.import(&upload, &author);
    pb.finish_and_clear();
    let posts = result?;

    if json {
        let out: Vec<_> = posts
            .iter()
            .map(|p| {
                json!({
                    "id": p.post.id,
                    "title": p.post.title,
                    "source": p.source_name,
                    "encoding": p.encoding,
                    "frontmatter": !p.used_fallback,
                    "tags": p.post.tag_list(),
                    "category": p.post.category,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for p in &posts {
        println!(
            "  {} {} {} {}",
            "✓".green(),
            p.post.title.white().bold(),
            format!("[{}]", short_id(&p.post.id)).dimmed(),
            p.source_name.dimmed()
        );
    }
    println!(
        "\n{} {} posts by {}",
        "Imported:".green().bold(),
        posts.len(),
        author
    );

    Ok(())
}

fn preview(ingestor: &Ingestor, upload: &Upload, author: &str, json: bool) -> Result<()> {
    let prepared = ingestor.preview(upload, author)?;

    if json {
        let out: Vec<_> = prepared
            .iter()
            .map(|p| {
                json!({
                    "title": p.record.title,
                    "source": p.source_name,
                    "encoding": p.encoding,
                    "frontmatter": !p.used_fallback,
                    "tags": p.record.tag_list(),
                    "category": p.record.category,
                    "summary": p.record.summary,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for p in &prepared {
        println!("{} {}", "Would import:".cyan(), p.record.title.white().bold());
        println!("  Source: {} ({})", p.source_name, p.encoding);
        if !p.record.tags.is_empty() {
            println!("  Tags: {}", p.record.tags);
        }
        if p.used_fallback {
            println!("  {}", "No frontmatter, titled from file name".dimmed());
        }
    }
    println!(
        "\n{}",
        format!("Dry run - {} posts would be imported.", prepared.len()).cyan()
    );

    Ok(())
}

fn describe(upload: &Upload) -> String {
    match upload {
        Upload::Single(file) => file.name.clone(),
        Upload::Multiple(files) => format!("{} files", files.len()),
        Upload::Archive(file) => format!("archive {}", file.name),
    }
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("zip"))
        .unwrap_or(false)
}

fn read_file(path: &Path) -> Result<RawFile> {
    RawFile::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Decide the upload shape for the given inputs.
///
/// One file is a single upload (an archive if it ends in `.zip`); anything
/// else becomes a multi-file upload of Markdown files, with directories
/// expanded. Archives must be imported on their own.
fn build_upload(inputs: &[PathBuf], case_insensitive: bool) -> Result<Upload> {
    for path in inputs {
        if !path.exists() {
            anyhow::bail!("Path does not exist: {}", path.display());
        }
    }

    if let [only] = inputs {
        if only.is_file() {
            let file = read_file(only)?;
            return Ok(if is_zip(only) {
                Upload::Archive(file)
            } else {
                Upload::Single(file)
            });
        }
    }

    let mut files = Vec::new();
    for path in inputs {
        if path.is_dir() {
            for entry in markdown_files(path, case_insensitive) {
                files.push(read_file(&entry)?);
            }
        } else if is_zip(path) {
            anyhow::bail!(
                "Archives must be imported on their own: {}",
                path.display()
            );
        } else if !is_markdown_path(path, case_insensitive) {
            warn!("Skipping non-Markdown file {}", path.display());
        } else {
            files.push(read_file(path)?);
        }
    }

    Ok(Upload::Multiple(files))
}

fn is_markdown_path(path: &Path, case_insensitive: bool) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| is_markdown_entry(n, case_insensitive))
        .unwrap_or(false)
}

/// Markdown files under `dir`, sorted by name, hidden files skipped.
fn markdown_files(dir: &Path, case_insensitive: bool) -> Vec<PathBuf> {
    walkdir::WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.file_name()
                .to_str()
                .map(|n| !n.starts_with('.') && is_markdown_entry(n, case_insensitive))
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_file_upload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.md");
        std::fs::write(&path, "# Hello").unwrap();

        match build_upload(&[path], false).unwrap() {
            Upload::Single(file) => {
                assert_eq!(file.name, "hello.md");
                assert_eq!(file.bytes, b"# Hello");
            }
            _ => panic!("expected a single upload"),
        }
    }

    #[test]
    fn test_zip_is_archive_upload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Export.ZIP");
        std::fs::write(&path, b"PK").unwrap();

        assert!(matches!(
            build_upload(&[path], false).unwrap(),
            Upload::Archive(_)
        ));
    }

    #[test]
    fn test_directory_expands_to_markdown() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("b.md"), "b").unwrap();
        std::fs::write(dir.path().join("sub").join("a.markdown"), "a").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        std::fs::write(dir.path().join(".hidden.md"), "x").unwrap();
        std::fs::write(dir.path().join("LOUD.MD"), "x").unwrap();

        match build_upload(&[dir.path().to_path_buf()], false).unwrap() {
            Upload::Multiple(files) => {
                let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
                assert_eq!(names, vec!["b.md", "a.markdown"]);
            }
            _ => panic!("expected a multi-file upload"),
        }

        match build_upload(&[dir.path().to_path_buf()], true).unwrap() {
            Upload::Multiple(files) => assert_eq!(files.len(), 3),
            _ => panic!("expected a multi-file upload"),
        }
    }

    #[test]
    fn test_multiple_inputs_skip_non_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let post = dir.path().join("post.md");
        let notes = dir.path().join("notes.txt");
        std::fs::write(&post, "# Post").unwrap();
        std::fs::write(&notes, "plain").unwrap();

        match build_upload(&[post, notes], false).unwrap() {
            Upload::Multiple(files) => {
                assert_eq!(files.len(), 1);
                assert_eq!(files[0].name, "post.md");
            }
            _ => panic!("expected a multi-file upload"),
        }
    }

    #[test]
    fn test_archive_among_multiple_inputs_fails() {
        let dir = tempfile::tempdir().unwrap();
        let post = dir.path().join("post.md");
        let archive = dir.path().join("export.zip");
        std::fs::write(&post, "# Post").unwrap();
        std::fs::write(&archive, b"PK").unwrap();

        let err = build_upload(&[post, archive], false).unwrap_err();
        assert!(err.to_string().contains("export.zip"));
    }

    #[test]
    fn test_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(build_upload(&[dir.path().join("missing.md")], false).is_err());
    }
}
