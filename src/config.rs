//! Run configuration.
//!
//! A [`TermStatConfig`] can be loaded from a JSON file and then overridden by
//! command line flags. Every field has a default, so an empty JSON object is
//! a valid configuration.
//!
//! ```
//! use termstat::config::TermStatConfig;
//!
//! let config: TermStatConfig = serde_json::from_str(r#"{ "field": "title" }"#).unwrap();
//! assert_eq!(config.field, "title");
//! assert!(config.heap_dir.is_none());
//! config.validate().unwrap();
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::backend::schema::CorpusSchema;
use crate::error::{Result, TermStatError};
use crate::query::ParserKind;

/// The smallest writer heap tantivy accepts for a single indexing thread.
pub const MIN_WRITER_MEMORY_BYTES: usize = 15_000_000;

/// Configuration for one termstat run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermStatConfig {
    /// Where the index lives on disk.
    pub index_dir: PathBuf,

    /// Directory for Heaps' law CSV files. `None` disables growth tracking.
    pub heap_dir: Option<PathBuf>,

    /// Field over which statistics and vocabulary growth are computed.
    pub field: String,

    /// Discard any existing index and rebuild it from the corpus.
    pub regenerate: bool,

    /// Memory budget for the index writer.
    pub writer_memory_bytes: usize,

    /// Words removed by the analyzer. Empty by default.
    pub stop_words: Vec<String>,

    /// Tokens longer than this many bytes are dropped by the analyzer.
    pub max_token_length: usize,

    /// Query parsing strategy for search and explain.
    pub parser: ParserKind,

    /// Maximum number of hits printed by a search.
    pub result_limit: usize,
}

impl Default for TermStatConfig {
    fn default() -> Self {
        TermStatConfig {
            index_dir: PathBuf::from("./index"),
            heap_dir: None,
            field: CorpusSchema::CONTENT.to_string(),
            regenerate: false,
            writer_memory_bytes: 50_000_000,
            stop_words: Vec::new(),
            max_token_length: 40,
            parser: ParserKind::Classic,
            result_limit: 100,
        }
    }
}

impl TermStatConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: TermStatConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Whether vocabulary growth should be tracked during corpus processing.
    pub fn tracks_growth(&self) -> bool {
        self.heap_dir.is_some()
    }

    /// Check the configuration for values the backend cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !CorpusSchema::TEXT_FIELDS.contains(&self.field.as_str()) {
            return Err(TermStatError::config(format!(
                "unknown field '{}', expected one of: {}",
                self.field,
                CorpusSchema::TEXT_FIELDS.join(", ")
            )));
        }
        if self.writer_memory_bytes < MIN_WRITER_MEMORY_BYTES {
            return Err(TermStatError::config(format!(
                "writer_memory_bytes must be at least {MIN_WRITER_MEMORY_BYTES}"
            )));
        }
        if self.max_token_length == 0 {
            return Err(TermStatError::config("max_token_length must be positive"));
        }
        if self.result_limit == 0 {
            return Err(TermStatError::config("result_limit must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = TermStatConfig::default();
        assert_eq!(config.field, "content");
        assert!(!config.tracks_growth());
        assert!(config.stop_words.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TermStatConfig =
            serde_json::from_str(r#"{ "heap_dir": "heaps", "parser": "lenient" }"#).unwrap();

        assert_eq!(config.heap_dir, Some(PathBuf::from("heaps")));
        assert_eq!(config.parser, ParserKind::Lenient);
        assert_eq!(config.result_limit, 100);
        assert!(config.tracks_growth());
    }

    #[test]
    fn test_validate_rejects_unknown_field() {
        let config = TermStatConfig {
            field: "abstract".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, TermStatError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_small_writer_budget() {
        let config = TermStatConfig {
            writer_memory_bytes: 1_000,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("termstat.json");
        fs::write(&path, r#"{ "field": "title", "regenerate": true }"#).unwrap();

        let config = TermStatConfig::from_file(&path).unwrap();
        assert_eq!(config.field, "title");
        assert!(config.regenerate);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = TermStatConfig::from_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, TermStatError::Anyhow(_)));
    }
}
