//! Fixed-width statistics reports.
//!
//! ```text
//!                 Term    DF     CF        IDF    TF
//!                  dog     2      3   0.000000     1     2
//!                  cat     1      2   0.301030     2     0
//! ```
//!
//! Lines go to the console writer and, when a destination path is given, to
//! that file as well. The file is truncated when a report starts and closed
//! when it ends, whether the report succeeded or not.

use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{Result, TermStatError};
use crate::stats::table::{TermStatistics, TermStatisticsTable};

/// What a report call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// This many entry lines were written.
    Written { entries: usize },
    /// The requested term is not in the table.
    TermNotFound { term: String },
}

/// The column header line.
pub fn format_header() -> String {
    format!("{:>20} {:>5} {:>6} {:>10} {:>5}", "Term", "DF", "CF", "IDF", "TF")
}

/// One entry line.
pub fn format_entry(entry: &TermStatistics) -> String {
    let mut line = format!(
        "{:>20} {:>5} {:>6} {:>10.6}",
        entry.term,
        entry.document_frequency,
        entry.collection_frequency,
        entry.inverse_document_frequency
    );
    for frequency in &entry.term_frequencies {
        line.push_str(&format!(" {frequency:>5}"));
    }
    line
}

/// Writes statistics reports to a console writer and an optional file.
pub struct StatisticsReportWriter<W: Write> {
    console: W,
}

impl StatisticsReportWriter<Stdout> {
    /// A writer printing to standard output.
    pub fn stdout() -> Self {
        StatisticsReportWriter::new(io::stdout())
    }
}

impl<W: Write> StatisticsReportWriter<W> {
    pub fn new(console: W) -> Self {
        StatisticsReportWriter { console }
    }

    /// Report a single term, without header.
    ///
    /// An absent term prints a notice on the console only.
    pub fn report_one(
        &mut self,
        table: &TermStatisticsTable,
        term: &str,
        destination: Option<&Path>,
    ) -> Result<ReportOutcome> {
        let mut file = open_destination(destination)?;

        let Some(entry) = table.lookup(term) else {
            writeln!(self.console, "The index doesn't contain '{term}'")?;
            return Ok(ReportOutcome::TermNotFound {
                term: term.to_string(),
            });
        };

        self.emit(&mut file, &format_entry(entry))?;
        finish(file)?;
        Ok(ReportOutcome::Written { entries: 1 })
    }

    /// Report the `n` most frequent terms under a header.
    pub fn report_top(
        &mut self,
        table: &TermStatisticsTable,
        n: usize,
        destination: Option<&Path>,
    ) -> Result<ReportOutcome> {
        self.report_entries(table.top_n(n), destination)
    }

    /// Report every term under a header.
    pub fn report_all(
        &mut self,
        table: &TermStatisticsTable,
        destination: Option<&Path>,
    ) -> Result<ReportOutcome> {
        self.report_entries(table.all(), destination)
    }

    /// Give back the console writer.
    pub fn into_inner(self) -> W {
        self.console
    }

    fn report_entries(
        &mut self,
        entries: &[TermStatistics],
        destination: Option<&Path>,
    ) -> Result<ReportOutcome> {
        let mut file = open_destination(destination)?;

        self.emit(&mut file, &format_header())?;
        for entry in entries {
            self.emit(&mut file, &format_entry(entry))?;
        }

        finish(file)?;
        debug!(entries = entries.len(), "wrote statistics report");
        Ok(ReportOutcome::Written {
            entries: entries.len(),
        })
    }

    fn emit(&mut self, file: &mut Option<ReportFile<'_>>, line: &str) -> Result<()> {
        writeln!(self.console, "{line}")?;
        if let Some(file) = file {
            file.write_line(line)?;
        }
        Ok(())
    }
}

/// A report destination. Dropping it closes the file.
struct ReportFile<'a> {
    path: &'a Path,
    writer: BufWriter<File>,
}

impl ReportFile<'_> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}").map_err(|e| self.error(e))
    }

    fn error(&self, source: io::Error) -> TermStatError {
        TermStatError::other(format!(
            "failed to write report to {}: {source}",
            self.path.display()
        ))
    }
}

fn open_destination(destination: Option<&Path>) -> Result<Option<ReportFile<'_>>> {
    let Some(path) = destination else {
        return Ok(None);
    };
    let file = File::create(path).map_err(|e| {
        TermStatError::other(format!("failed to open report file {}: {e}", path.display()))
    })?;
    Ok(Some(ReportFile {
        path,
        writer: BufWriter::new(file),
    }))
}

fn finish(file: Option<ReportFile<'_>>) -> Result<()> {
    if let Some(mut file) = file {
        file.writer.flush().map_err(|e| file.error(e))?;
    }
    Ok(())
}
