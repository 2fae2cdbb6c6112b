//! CSV files of vocabulary growth points.
//!
//! One file per document, named after its ordinal:
//!
//! ```text
//! ttl,unique
//! 1,1
//! 2,2
//! 3,2
//!
//! ```
//!
//! The header is followed by one line per point and a trailing blank line.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Terminator, WriterBuilder};
use tracing::{debug, info};

use crate::error::{Result, TermStatError};
use crate::vocabulary::tracker::{GrowthPoint, VocabularyTracker};

const HEADER: [&str; 2] = ["ttl", "unique"];

/// File name of the growth data for a document ordinal.
pub fn growth_file_name(doc: usize) -> String {
    format!("heap-{doc}.csv")
}

impl VocabularyTracker {
    /// Write every document's growth points to `directory`.
    ///
    /// The directory is created if needed. Existing files are overwritten.
    /// Returns the paths written, in ordinal order. Any failure is reported
    /// as a persistence error naming the file involved; the tracker is left
    /// untouched so the write can be retried.
    pub fn persist<P: AsRef<Path>>(&self, directory: P) -> Result<Vec<PathBuf>> {
        let directory = directory.as_ref();
        fs::create_dir_all(directory)
            .map_err(|e| TermStatError::persistence(directory, e))?;

        let mut written = Vec::with_capacity(self.document_count());
        for (doc, points) in self.iter() {
            let path = directory.join(growth_file_name(doc));
            write_growth_csv(&path, points)?;
            debug!(path = %path.display(), points = points.len(), "wrote growth data");
            written.push(path);
        }

        info!(
            directory = %directory.display(),
            documents = written.len(),
            "persisted vocabulary growth"
        );
        Ok(written)
    }
}

fn write_growth_csv(path: &Path, points: &[GrowthPoint]) -> Result<()> {
    let file = File::create(path).map_err(|e| TermStatError::persistence(path, e))?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(BufWriter::new(file));

    writer
        .write_record(HEADER)
        .map_err(|e| TermStatError::persistence(path, e))?;
    for point in points {
        writer
            .serialize(point)
            .map_err(|e| TermStatError::persistence(path, e))?;
    }

    let mut inner = writer
        .into_inner()
        .map_err(|e| TermStatError::persistence(path, e.into_error()))?;
    inner
        .write_all(b"\n")
        .and_then(|()| inner.flush())
        .map_err(|e| TermStatError::persistence(path, e))
}

/// Read a growth file back into points.
pub fn read_growth_csv<P: AsRef<Path>>(path: P) -> Result<Vec<GrowthPoint>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| TermStatError::persistence(path, e))?;

    reader
        .deserialize()
        .map(|row| row.map_err(|e| TermStatError::persistence(path, e)))
        .collect()
}
