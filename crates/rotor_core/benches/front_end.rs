//! Criterion benchmarks for the front-end pipeline.
//!
//! Run with: `cargo bench --package rotor_core`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use rotor_core::source::{Scheme, SourceUrl};
use rotor_core::{lex_text, parse_text, Pipeline};

fn url() -> SourceUrl {
    SourceUrl::new(Scheme::File, "/bench.js")
}

/// A realistic source: member calls, strings, comments, punctuation.
fn sample_source(statements: usize) -> String {
    let mut source = String::new();
    for i in 0..statements {
        source.push_str(&format!(
            "console.log(\"line {i}\", data.items, f(a, b,)); // trace\n"
        ));
    }
    source
}

// ---------------------------------------------------------------------------
// Lexing throughput
// ---------------------------------------------------------------------------

fn bench_lex(c: &mut Criterion) {
    let source = sample_source(100);
    c.bench_function("lex_100_statements", |b| {
        b.iter(|| {
            let tokens = lex_text(url(), black_box(&source)).unwrap();
            black_box(tokens);
        });
    });
}

// ---------------------------------------------------------------------------
// Full-pipeline throughput
// ---------------------------------------------------------------------------

fn bench_parse(c: &mut Criterion) {
    let source = sample_source(100);
    c.bench_function("parse_100_statements", |b| {
        b.iter(|| {
            let statements = parse_text(url(), black_box(&source)).unwrap();
            black_box(statements);
        });
    });
}

fn bench_parse_small_chunks(c: &mut Criterion) {
    let source = sample_source(100);
    let bytes = source.as_bytes();
    c.bench_function("parse_100_statements_64_byte_chunks", |b| {
        b.iter(|| {
            let mut pipeline = Pipeline::new(url());
            let mut statements = Vec::new();
            for chunk in bytes.chunks(64) {
                statements.extend(pipeline.feed(black_box(chunk)).unwrap());
            }
            statements.extend(pipeline.finish().unwrap());
            black_box(statements);
        });
    });
}

criterion_group!(benches, bench_lex, bench_parse, bench_parse_small_chunks);
criterion_main!(benches);
