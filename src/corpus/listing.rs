//! Deterministic corpus listing.
//!
//! Files are collected recursively, hidden files (name starting with `.`) are
//! dropped and the result is sorted, so that document ordinals are stable
//! between runs regardless of the order the filesystem returns entries in.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::corpus::CorpusDocument;
use crate::corpus::cranfield::parse_cranfield;
use crate::error::{Result, TermStatError};

/// List every corpus file under `root`, sorted.
pub fn list_corpus<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(TermStatError::corpus(format!(
            "'{}' is not a directory",
            root.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('.') {
            debug!(path = %entry.path().display(), "skipping hidden file");
            continue;
        }
        files.push(entry.into_path());
    }

    files.sort();
    Ok(files)
}

/// List and parse the whole corpus. Ordinals follow the sorted listing.
pub fn load_corpus<P: AsRef<Path>>(root: P) -> Result<Vec<CorpusDocument>> {
    let root = root.as_ref();
    let files = list_corpus(root)?;
    info!(corpus = %root.display(), files = files.len(), "listed corpus");

    files
        .iter()
        .enumerate()
        .map(|(ordinal, path)| -> Result<CorpusDocument> {
            let text = fs::read_to_string(path)?;
            Ok(parse_cranfield(&text, ordinal))
        })
        .collect()
}
