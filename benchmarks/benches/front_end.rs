//! Benchmarks du front end Charon (Criterion)
//!
//! ▶ Paramètres via variables d'environnement :
//!   - CRIT_SAMPLES    (def=60)   : taille d'échantillon Criterion
//!   - CRIT_WARMUP_MS  (def=300)  : warmup en ms
//!   - CRIT_MEASURE_MS (def=1000) : fenêtre de mesure en ms
//!
//! Suites :
//!   1) lex    : sources synthétiques de 1, 16 et 256 KiB
//!   2) parse  : mêmes sources, tokens pré-calculés
//!   3) chunk  : écritures d'octets et de constantes

use std::{fmt::Write as _, time::Duration};

use charon_core::{Chunk, OpCode};
use charon_lexer::{strip_trivia, tokenize};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key).ok().and_then(|s| s.parse::<u64>().ok()).unwrap_or(default)
}

/// Declarations, comments and stray statements, repeated up to `kib` KiB.
fn synthetic_source(kib: usize) -> String {
    let mut s = String::with_capacity(kib * 1024);
    let mut i = 0usize;
    while s.len() < kib * 1024 {
        let _ = match i % 4 {
            0 => writeln!(s, "let value = {i} + other * {i};"),
            1 => writeln!(s, "/// doc {i}\nconst name = \"text {i}\""),
            2 => writeln!(s, "// plain comment {i}\nlet spread = a...b || c && d"),
            _ => writeln!(s, "\tcall(x) | y"),
        };
        i += 1;
    }
    s
}

const SIZES_KIB: &[usize] = &[1, 16, 256];

fn bench_lex(c: &mut Criterion) {
    let mut g = c.benchmark_group("lex");
    for &kib in SIZES_KIB {
        let src = synthetic_source(kib);
        g.throughput(Throughput::Bytes(src.len() as u64));
        g.bench_with_input(BenchmarkId::from_parameter(format!("{kib}KiB")), &src, |b, src| {
            b.iter(|| black_box(tokenize(black_box(src))).len());
        });
    }
    g.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut g = c.benchmark_group("parse");
    for &kib in SIZES_KIB {
        let tokens = strip_trivia(tokenize(&synthetic_source(kib)));
        g.throughput(Throughput::Elements(tokens.len() as u64));
        g.bench_with_input(BenchmarkId::from_parameter(format!("{kib}KiB")), &tokens, |b, tokens| {
            b.iter(|| black_box(charon_parser::parse(black_box(tokens))).nodes.len());
        });
    }
    g.finish();
}

fn bench_chunk(c: &mut Criterion) {
    let mut g = c.benchmark_group("chunk");
    g.bench_function("write_4096_returns", |b| {
        b.iter(|| {
            let mut chunk = Chunk::new();
            for _ in 0..4096 {
                chunk.write_op(black_box(OpCode::Return));
            }
            chunk.len()
        });
    });
    g.bench_function("write_256_constants", |b| {
        b.iter(|| {
            let mut chunk = Chunk::new();
            for i in 0..256u32 {
                let _ = chunk.write_constant(black_box(f64::from(i)));
            }
            chunk.len()
        });
    });
    g.finish();
}

fn config() -> Criterion {
    Criterion::default()
        .sample_size(usize::try_from(env_u64("CRIT_SAMPLES", 60)).unwrap_or(60))
        .warm_up_time(Duration::from_millis(env_u64("CRIT_WARMUP_MS", 300)))
        .measurement_time(Duration::from_millis(env_u64("CRIT_MEASURE_MS", 1000)))
}

criterion_group! {
    name = benches;
    config = config();
    targets = bench_lex, bench_parse, bench_chunk
}
criterion_main!(benches);
