//! Interchangeable query parsing strategies.
//!
//! A [`QueryStrategy`] turns user text into a tantivy query. Which one is used
//! is chosen by [`ParserKind`] in the configuration or on the command line.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tantivy::query::{Query, QueryParser};
use tracing::warn;

use crate::error::Result;

/// Selects a [`QueryStrategy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    /// Full query syntax; malformed input is rejected.
    #[default]
    Classic,
    /// Full query syntax, but malformed parts are dropped instead of failing.
    Lenient,
}

impl ParserKind {
    /// Wrap `parser` in the strategy this kind names.
    pub fn strategy(self, parser: QueryParser) -> Box<dyn QueryStrategy> {
        match self {
            ParserKind::Classic => Box::new(ClassicQueryStrategy::new(parser)),
            ParserKind::Lenient => Box::new(LenientQueryStrategy::new(parser)),
        }
    }
}

/// Capability to parse query text.
pub trait QueryStrategy: Send + Sync {
    /// Parse `text` into a query.
    fn parse(&self, text: &str) -> Result<Box<dyn Query>>;

    /// Short name, for logs.
    fn name(&self) -> &'static str;
}

/// Strict parsing: any syntax error is returned to the caller.
pub struct ClassicQueryStrategy {
    parser: QueryParser,
}

impl ClassicQueryStrategy {
    pub fn new(parser: QueryParser) -> Self {
        ClassicQueryStrategy { parser }
    }
}

impl QueryStrategy for ClassicQueryStrategy {
    fn parse(&self, text: &str) -> Result<Box<dyn Query>> {
        Ok(self.parser.parse_query(text)?)
    }

    fn name(&self) -> &'static str {
        "classic"
    }
}

/// Best-effort parsing: recoverable errors are logged and skipped.
pub struct LenientQueryStrategy {
    parser: QueryParser,
}

impl LenientQueryStrategy {
    pub fn new(parser: QueryParser) -> Self {
        LenientQueryStrategy { parser }
    }
}

impl QueryStrategy for LenientQueryStrategy {
    fn parse(&self, text: &str) -> Result<Box<dyn Query>> {
        let (query, errors) = self.parser.parse_query_lenient(text);
        for error in errors {
            warn!(query = text, %error, "ignored part of query");
        }
        Ok(query)
    }

    fn name(&self) -> &'static str {
        "lenient"
    }
}
