//! Command implementations for the termstat CLI.

use std::io::{self, Write};

use tracing::{debug, info, warn};

use crate::backend::{BackendOpen, TantivyBackend};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::TermStatConfig;
use crate::error::{Result, TermStatError};
use crate::indexing::process_corpus;
use crate::query::QueryStrategy;
use crate::stats::{ReportOutcome, StatisticsReportWriter, StatisticsSession};

/// Execute a CLI command.
pub fn execute_command(args: TermStatArgs) -> Result<()> {
    let config = args.load_config()?;
    match &args.command {
        Command::Index(index_args) => index_corpus(index_args, config),
        Command::Term(term_args) => report_terms(term_args, config),
        Command::Search(search_args) => search_index(search_args, config),
        Command::Explain(explain_args) => explain_score(explain_args, config),
    }
}

/// Build the index from a corpus, or reuse the one already there.
fn index_corpus(args: &IndexArgs, mut config: TermStatConfig) -> Result<()> {
    config.regenerate |= args.regen;
    if let Some(heap) = &args.heap {
        config.heap_dir = Some(heap.clone());
    }
    config.stop_words.extend(args.stop_words.iter().cloned());
    config.validate()?;

    let (mut backend, state) = TantivyBackend::open(&config)?;
    let summary = match state {
        BackendOpen::Created => Some(process_corpus(&mut backend, &args.corpus, &config)?),
        BackendOpen::Existing => {
            if config.tracks_growth() {
                warn!("index already exists, vocabulary growth is only recorded while indexing");
            }
            info!(index = %config.index_dir.display(), "reusing existing index");
            None
        }
    };

    let result = IndexResult::new(&config.index_dir, state, summary);
    output_index_result(&mut io::stdout().lock(), &result)
}

/// Print statistics for individual terms, the top N, or all terms.
fn report_terms(args: &TermArgs, config: TermStatConfig) -> Result<()> {
    config.validate()?;
    match args.request_count() {
        0 => {
            return Err(TermStatError::invalid_argument(
                "give at least one term, --top N or --all",
            ));
        }
        1 => {}
        _ if args.output.is_some() => {
            return Err(TermStatError::invalid_argument(
                "--output takes a single term, --top N or --all",
            ));
        }
        _ => {}
    }

    let backend = open_existing(&config)?;
    let mut session = StatisticsSession::new(config.field.clone());
    let destination = args.output.as_deref();

    if args.format == OutputFormat::Json {
        let table = session.table(&backend)?;
        let mut report = TermReport {
            field: table.field().to_string(),
            total_documents: table.total_documents(),
            entries: Vec::new(),
            missing: Vec::new(),
        };
        for term in &args.terms {
            match table.lookup(term) {
                Some(entry) => report.entries.push(entry.clone()),
                None => report.missing.push(term.clone()),
            }
        }
        if let Some(n) = args.top {
            report.entries.extend_from_slice(table.top_n(n));
        }
        if args.all {
            report.entries.extend_from_slice(table.all());
        }
        return output_term_json(&mut io::stdout().lock(), &report, destination);
    }

    let mut writer = StatisticsReportWriter::stdout();
    for term in &args.terms {
        let outcome = writer.report_one(session.table(&backend)?, term, destination)?;
        if let ReportOutcome::TermNotFound { term } = outcome {
            debug!(term = %term, "term not in index");
        }
    }
    if let Some(n) = args.top {
        writer.report_top(session.table(&backend)?, n, destination)?;
    }
    if args.all {
        writer.report_all(session.table(&backend)?, destination)?;
    }
    writer.into_inner().flush()?;
    Ok(())
}

/// Run a query and print the best hits.
fn search_index(args: &SearchArgs, mut config: TermStatConfig) -> Result<()> {
    if let Some(parser) = args.parser {
        config.parser = parser;
    }
    if let Some(limit) = args.limit {
        config.result_limit = limit;
    }
    config.validate()?;

    let backend = open_existing(&config)?;
    let strategy = query_strategy(&backend, &config)?;
    let query = strategy.parse(&args.query)?;
    let hits = backend.search(query.as_ref(), config.result_limit)?;
    info!(parser = strategy.name(), hits = hits.len(), "search finished");

    output_hits(&mut io::stdout().lock(), &hits)
}

/// Print the score explanation of one document.
fn explain_score(args: &ExplainArgs, mut config: TermStatConfig) -> Result<()> {
    if let Some(parser) = args.parser {
        config.parser = parser;
    }
    config.validate()?;

    let backend = open_existing(&config)?;
    let strategy = query_strategy(&backend, &config)?;
    let query = strategy.parse(&args.query)?;
    let explanation = backend.explain(query.as_ref(), args.doc)?;

    writeln!(io::stdout().lock(), "{explanation}")?;
    Ok(())
}

fn open_existing(config: &TermStatConfig) -> Result<TantivyBackend> {
    if !TantivyBackend::exists(&config.index_dir) {
        return Err(TermStatError::config(format!(
            "no index at {}; run `termstat index <CORPUS>` first",
            config.index_dir.display()
        )));
    }
    let config = TermStatConfig {
        regenerate: false,
        ..config.clone()
    };
    let (backend, state) = TantivyBackend::open(&config)?;
    if state == BackendOpen::Created {
        return Err(TermStatError::config(format!(
            "index at {} holds no committed documents; run `termstat index <CORPUS>`",
            config.index_dir.display()
        )));
    }
    Ok(backend)
}

fn query_strategy(
    backend: &TantivyBackend,
    config: &TermStatConfig,
) -> Result<Box<dyn QueryStrategy>> {
    let parser = backend.query_parser(&config.field)?;
    Ok(config.parser.strategy(parser))
}
