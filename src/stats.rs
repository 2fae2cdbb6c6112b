//! Corpus term statistics.
//!
//! - [`table`] builds the deduplicated term table from a [`TermSource`].
//! - [`session`] caches one table per backend reader generation.
//! - [`report`] prints tables in fixed-width columns.
//!
//! [`TermSource`]: crate::backend::TermSource

pub mod report;
pub mod session;
pub mod table;

pub use report::{ReportOutcome, StatisticsReportWriter, format_entry, format_header};
pub use session::StatisticsSession;
pub use table::{TermStatistics, TermStatisticsTable};
