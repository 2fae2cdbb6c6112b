//! Error types for the termstat library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`TermStatError`] enum. The variants mirror the failure families of the
//! system: a bad document ordinal handed to the vocabulary tracker, a failure
//! inside the search backend, a failed write of vocabulary-growth data, and
//! the usual I/O, configuration and corpus problems.
//!
//! Looking up a term that is not in the statistics table is *not* an error;
//! see [`crate::stats::report::ReportOutcome`].
//!
//! # Examples
//!
//! ```
//! use termstat::error::{Result, TermStatError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(TermStatError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The main error type for termstat operations.
#[derive(Error, Debug)]
pub enum TermStatError {
    /// I/O errors (file operations, directory listing, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A document ordinal outside the range tracked so far.
    #[error("Invalid document: ordinal {ordinal} is out of range ({tracked} documents tracked)")]
    InvalidDocument { ordinal: usize, tracked: usize },

    /// The search backend reported an inconsistent or failed state.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Errors raised by the tantivy index.
    #[error("Backend error: {0}")]
    Tantivy(#[from] tantivy::TantivyError),

    /// Query text rejected by the strict query parser.
    #[error("Backend error: query parse failed: {0}")]
    QueryParser(#[from] tantivy::query::QueryParserError),

    /// The index directory could not be opened.
    #[error("Backend error: {0}")]
    OpenDirectory(#[from] tantivy::directory::error::OpenDirectoryError),

    /// Writing vocabulary-growth data failed.
    #[error("Persistence error: failed to write {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Corpus listing or document parsing errors
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Directory traversal errors
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with TermStatError.
pub type Result<T> = std::result::Result<T, TermStatError>;

impl TermStatError {
    /// Create a new invalid document error.
    pub fn invalid_document(ordinal: usize, tracked: usize) -> Self {
        TermStatError::InvalidDocument { ordinal, tracked }
    }

    /// Create a new backend error.
    pub fn backend<S: Into<String>>(msg: S) -> Self {
        TermStatError::Backend(msg.into())
    }

    /// Create a new persistence error for the given file.
    pub fn persistence<P, E>(path: P, source: E) -> Self
    where
        P: AsRef<Path>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        TermStatError::Persistence {
            path: path.as_ref().to_path_buf(),
            source: source.into(),
        }
    }

    /// Create a new corpus error.
    pub fn corpus<S: Into<String>>(msg: S) -> Self {
        TermStatError::Corpus(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        TermStatError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        TermStatError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        TermStatError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        TermStatError::Other(format!("Internal error: {}", msg.into()))
    }

    /// Whether this error originated in the search backend.
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            TermStatError::Backend(_)
                | TermStatError::Tantivy(_)
                | TermStatError::QueryParser(_)
                | TermStatError::OpenDirectory(_)
        )
    }

    /// Whether this error is a failed write of vocabulary-growth data.
    pub fn is_persistence(&self) -> bool {
        matches!(self, TermStatError::Persistence { .. })
    }
}
