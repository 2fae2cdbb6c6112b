//! Lazily built, reusable statistics table.

use tracing::debug;

use crate::backend::TermSource;
use crate::error::{Result, TermStatError};
use crate::stats::table::TermStatisticsTable;

#[derive(Debug)]
struct CachedTable {
    generation: u64,
    table: TermStatisticsTable,
}

/// Owns the statistics table of one field for a run.
///
/// The table is built on the first request and handed out again for later
/// requests, as long as the source's reader generation has not changed.
/// A failed build leaves nothing cached.
#[derive(Debug)]
pub struct StatisticsSession {
    field: String,
    cached: Option<CachedTable>,
}

impl StatisticsSession {
    pub fn new<S: Into<String>>(field: S) -> Self {
        StatisticsSession {
            field: field.into(),
            cached: None,
        }
    }

    /// The table for the source's current generation, building it if needed.
    pub fn table<S>(&mut self, source: &S) -> Result<&TermStatisticsTable>
    where
        S: TermSource + ?Sized,
    {
        let generation = source.generation();
        let fresh = self
            .cached
            .as_ref()
            .is_some_and(|cached| cached.generation == generation);

        if fresh {
            debug!(field = %self.field, generation, "reusing term statistics");
        } else {
            self.cached = None;
            let total_documents = source.total_documents()?;
            let table = TermStatisticsTable::build(source, total_documents, &self.field)?;
            self.cached = Some(CachedTable { generation, table });
        }

        self.cached
            .as_ref()
            .map(|cached| &cached.table)
            .ok_or_else(|| TermStatError::internal("statistics table missing after build"))
    }

    /// Drop the cached table.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Whether a table is currently cached.
    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::StaticTermSource;

    #[test]
    fn test_table_is_reused() {
        let source = StaticTermSource::new("content", &[vec!["cat", "dog", "cat"], vec!["dog"]]);
        let mut session = StatisticsSession::new("content");

        assert_eq!(session.table(&source).unwrap().len(), 2);
        let lookups = source.frequency_lookups();
        assert_eq!(session.table(&source).unwrap().len(), 2);
        assert_eq!(source.frequency_lookups(), lookups);
    }

    #[test]
    fn test_generation_change_rebuilds() {
        let mut source = StaticTermSource::new("content", &[vec!["cat"]]);
        let mut session = StatisticsSession::new("content");

        session.table(&source).unwrap();
        let lookups = source.frequency_lookups();

        source.set_generation(1);
        session.table(&source).unwrap();
        assert!(source.frequency_lookups() > lookups);
    }

    #[test]
    fn test_failed_build_is_not_cached() {
        let source = StaticTermSource::new("content", &[vec!["cat"], vec!["dog"]]).fail_on_document(1);
        let mut session = StatisticsSession::new("content");

        assert!(session.table(&source).is_err());
        assert!(!session.is_cached());
    }

    #[test]
    fn test_invalidate() {
        let source = StaticTermSource::new("content", &[vec!["cat"]]);
        let mut session = StatisticsSession::new("content");

        session.table(&source).unwrap();
        assert!(session.is_cached());
        session.invalidate();
        assert!(!session.is_cached());
    }
}
