//! Command line argument parsing for the termstat CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::TermStatConfig;
use crate::error::Result;
use crate::query::ParserKind;

/// termstat - term statistics and vocabulary growth over a text corpus
#[derive(Parser, Debug, Clone)]
#[command(name = "termstat")]
#[command(about = "Term statistics and Heaps' law vocabulary growth over a text corpus")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TermStatArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// JSON configuration file
    #[arg(short, long, env = "TERMSTAT_CONFIG", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Index directory
    #[arg(short, long, value_name = "DIR", global = true)]
    pub index: Option<PathBuf>,

    /// Field statistics and vocabulary growth are computed over
    #[arg(long, global = true)]
    pub field: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl TermStatArgs {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Load the configuration file, if any, and apply the global overrides.
    pub fn load_config(&self) -> Result<TermStatConfig> {
        let mut config = match &self.config {
            Some(path) => TermStatConfig::from_file(path)?,
            None => TermStatConfig::default(),
        };
        if let Some(index) = &self.index {
            config.index_dir = index.clone();
        }
        if let Some(field) = &self.field {
            config.field = field.clone();
        }
        Ok(config)
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Index a corpus, optionally recording vocabulary growth
    Index(IndexArgs),

    /// Print term statistics
    Term(TermArgs),

    /// Search the index
    Search(SearchArgs),

    /// Explain how a document scores against a query
    Explain(ExplainArgs),
}

/// Arguments for indexing a corpus
#[derive(Parser, Debug, Clone)]
pub struct IndexArgs {
    /// Corpus directory
    #[arg(value_name = "CORPUS")]
    pub corpus: PathBuf,

    /// Delete any existing index and rebuild it
    #[arg(long)]
    pub regen: bool,

    /// Record Heaps' law data into this directory
    #[arg(long, value_name = "DIR")]
    pub heap: Option<PathBuf>,

    /// Word removed by the analyzer (repeatable)
    #[arg(long = "stop-word", value_name = "WORD")]
    pub stop_words: Vec<String>,
}

/// Arguments for term statistics
#[derive(Parser, Debug, Clone)]
pub struct TermArgs {
    /// Terms to report individually
    #[arg(value_name = "TERM")]
    pub terms: Vec<String>,

    /// Report the N terms with the highest collection frequency
    #[arg(long, value_name = "N", conflicts_with = "all")]
    pub top: Option<usize>,

    /// Report every term
    #[arg(long)]
    pub all: bool,

    /// Also write the report to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub format: OutputFormat,
}

impl TermArgs {
    /// Number of separate reports requested.
    pub fn request_count(&self) -> usize {
        self.terms.len() + usize::from(self.top.is_some()) + usize::from(self.all)
    }
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Query text
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Query parsing strategy
    #[arg(short, long)]
    pub parser: Option<ParserKind>,

    /// Maximum number of hits
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for explaining a score
#[derive(Parser, Debug, Clone)]
pub struct ExplainArgs {
    /// Document ordinal
    #[arg(value_name = "DOC")]
    pub doc: usize,

    /// Query text
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Query parsing strategy
    #[arg(short, long)]
    pub parser: Option<ParserKind>,
}

/// Output format for term statistics
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Fixed-width columns
    #[default]
    Human,
    /// JSON
    Json,
}
