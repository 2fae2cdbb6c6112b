//! # termstat
//!
//! Term statistics and Heaps' law vocabulary growth over a text corpus.
//!
//! ## Features
//!
//! - Corpus indexing through tantivy
//! - Per-document vocabulary growth, saved as CSV
//! - Document, collection and inverse document frequencies per term
//! - Fixed-width and JSON reports
//! - Search and score explanation with interchangeable query parsers

pub mod backend;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod indexing;
pub mod query;
pub mod stats;
pub mod vocabulary;

pub mod prelude {
    pub use crate::backend::{DocumentSink, TantivyBackend, TermSource};
    pub use crate::config::TermStatConfig;
    pub use crate::error::{Result, TermStatError};
    pub use crate::stats::{StatisticsReportWriter, StatisticsSession, TermStatisticsTable};
    pub use crate::vocabulary::VocabularyTracker;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
