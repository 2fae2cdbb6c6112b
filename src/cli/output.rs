//! Output formatting for CLI commands.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::backend::{BackendOpen, SearchHit};
use crate::error::Result;
use crate::indexing::IndexingSummary;
use crate::stats::TermStatistics;

/// Result structure for the index command.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResult {
    pub index: PathBuf,
    pub reused: bool,
    pub summary: Option<IndexingSummary>,
}

/// Term statistics in JSON form.
#[derive(Debug, Serialize, Deserialize)]
pub struct TermReport {
    pub field: String,
    pub total_documents: usize,
    pub entries: Vec<TermStatistics>,
    pub missing: Vec<String>,
}

/// Describe the outcome of the index command.
pub fn output_index_result<W: Write>(out: &mut W, result: &IndexResult) -> Result<()> {
    match &result.summary {
        Some(summary) => {
            writeln!(
                out,
                "Indexed {} documents into {}",
                summary.documents,
                result.index.display()
            )?;
            if !summary.growth_files.is_empty() {
                writeln!(
                    out,
                    "Wrote vocabulary growth for {} documents ({} tokens)",
                    summary.growth_files.len(),
                    summary.tokens
                )?;
            }
        }
        None => writeln!(
            out,
            "Using existing index at {} (use --regen to rebuild)",
            result.index.display()
        )?,
    }
    Ok(())
}

impl IndexResult {
    pub fn new(index: &Path, state: BackendOpen, summary: Option<IndexingSummary>) -> Self {
        IndexResult {
            index: index.to_path_buf(),
            reused: state == BackendOpen::Existing,
            summary,
        }
    }
}

/// Print search hits as `ID : Score : Title` rows.
pub fn output_hits<W: Write>(out: &mut W, hits: &[SearchHit]) -> Result<()> {
    writeln!(out, "{:>7} : {:>10} : {}", "ID", "Score", "Title")?;
    for hit in hits {
        writeln!(
            out,
            "Doc {:>3} : {:>10.6} : {}",
            hit.ordinal,
            hit.score,
            hit.title.as_deref().unwrap_or("")
        )?;
    }
    Ok(())
}

/// Print a term report as JSON to `out`, and to `destination` if given.
pub fn output_term_json<W: Write>(
    out: &mut W,
    report: &TermReport,
    destination: Option<&Path>,
) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json}")?;
    if let Some(path) = destination {
        fs::write(path, format!("{json}\n"))?;
    }
    Ok(())
}
