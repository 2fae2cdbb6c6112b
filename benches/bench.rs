//! Criterion benchmarks for termstat.
//!
//! Covers the two analytic layers over synthetic data:
//! - building the term statistics table from a fixed term source
//! - feeding tokens through the vocabulary tracker

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use termstat::backend::StaticTermSource;
use termstat::stats::{StatisticsReportWriter, TermStatisticsTable};
use termstat::vocabulary::VocabularyTracker;

/// Generate token lists for benchmarking.
fn generate_test_documents(count: usize) -> Vec<Vec<String>> {
    let words = [
        "wing", "flow", "lift", "drag", "mach", "shock", "boundary", "layer", "pressure",
        "velocity", "laminar", "turbulent", "heat", "transfer", "nozzle", "supersonic",
        "subsonic", "airfoil", "vortex", "separation", "cylinder", "plate", "cone", "slender",
    ];

    let mut documents = Vec::with_capacity(count);
    for i in 0..count {
        let doc_length = 50 + (i % 100); // Variable length documents
        let mut doc_words = Vec::with_capacity(doc_length);

        for j in 0..doc_length {
            let word_idx = (i * 7 + j * 13) % words.len(); // Pseudo-random distribution
            doc_words.push(format!("{}{}", words[word_idx], j % 5));
        }

        documents.push(doc_words);
    }

    documents
}

/// Benchmark building and reporting term statistics.
fn bench_term_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("term_statistics");

    let documents = generate_test_documents(500);
    let source = StaticTermSource::new("content", &documents);

    group.throughput(Throughput::Elements(documents.len() as u64));
    group.bench_function("build_table", |b| {
        b.iter(|| {
            let table = TermStatisticsTable::build(black_box(&source), documents.len(), "content");
            black_box(table)
        })
    });

    let table = TermStatisticsTable::build(&source, documents.len(), "content").unwrap();
    group.bench_function("report_top_20", |b| {
        b.iter(|| {
            let mut writer = StatisticsReportWriter::new(Vec::with_capacity(64 * 1024));
            let outcome = writer.report_top(black_box(&table), 20, None);
            black_box((outcome, writer.into_inner()))
        })
    });

    group.finish();
}

/// Benchmark vocabulary growth tracking.
fn bench_vocabulary_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("vocabulary_growth");

    let documents = generate_test_documents(100);
    let tokens: u64 = documents.iter().map(|d| d.len() as u64).sum();

    group.throughput(Throughput::Elements(tokens));
    group.bench_function("track_tokens", |b| {
        b.iter(|| {
            let mut tracker = VocabularyTracker::new();
            for terms in &documents {
                let doc = tracker.new_document();
                for term in terms {
                    let _ = tracker.record_token(doc, black_box(term));
                }
            }
            black_box(tracker)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_term_statistics, bench_vocabulary_growth);
criterion_main!(benches);
