//! Benchmarks for template inference and header parsing
//!
//! Inference runs once per deck, header parsing once per file; both should
//! stay negligible next to provider calls.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vocadeck_core::{ColumnTag, Header, UnknownColumnPolicy};
use vocadeck_infer::TemplateEngine;

fn tag_sets() -> Vec<(&'static str, Vec<ColumnTag>)> {
    use ColumnTag::*;
    vec![
        ("base", vec![Vocab, Translation]),
        ("sound_reverse", vec![Vocab, Translation, Sound, Reverse]),
        (
            "listen_full",
            vec![Vocab, Translation, Listen, Sound, Image, Phonetics, Remark, Reverse],
        ),
        (
            "qa_full",
            vec![Vocab, Translation, QAndA, Sound, Image, Phonetics, Remark, Reverse],
        ),
    ]
}

fn bench_infer(c: &mut Criterion) {
    let mut group = c.benchmark_group("infer");
    let engine = TemplateEngine::default();

    for (name, tags) in tag_sets() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &tags, |b, tags| {
            b.iter(|| engine.infer(black_box(tags.iter().copied())).unwrap())
        });
    }

    group.finish();
}

fn bench_header_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("header_parse");
    let names = [
        "Word", "Meaning", "Sound", "Image", "Phonetics", "Remark", "Reverse", "Notes",
    ];

    group.bench_function("tolerant/8_columns", |b| {
        b.iter(|| Header::parse(black_box(&names[..]), UnknownColumnPolicy::Tolerant).unwrap())
    });
    group.bench_function("strict/7_columns", |b| {
        b.iter(|| Header::parse(black_box(&names[..7]), UnknownColumnPolicy::Strict).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_infer, bench_header_parse);
criterion_main!(benches);
