//! Benchmarks for docpdf conversion performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks classify and synthesize synthetic documents.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use docpdf::model::{StyleConfig, TextBlock};
use docpdf::pdf::{build, LayoutConfig, PageAssets};

/// Creates plain text with one title, then `sections` heading + body pairs.
fn create_test_text(sections: usize) -> String {
    let mut text = String::from("Quarterly Operations Review");
    for i in 0..sections {
        text.push_str(&format!(
            "\n\n{}. Section Heading\n\nParagraph {} covers results, staffing and next steps. \
             It is long enough to wrap across several lines of the text column, \
             which exercises the word wrapper: 1. first point 2. second point.",
            i + 1,
            i
        ));
    }
    text
}

/// Benchmark paragraph classification.
fn bench_classify(c: &mut Criterion) {
    let text = create_test_text(50);

    c.bench_function("classify_50_sections", |b| {
        b.iter(|| docpdf::classify::classify(black_box(&text)));
    });
}

/// Benchmark PDF synthesis at various sizes.
fn bench_synthesis(c: &mut Criterion) {
    let mut group = c.benchmark_group("pdf_synthesis");
    let style = StyleConfig::default();
    let layout = LayoutConfig::default();
    let assets = PageAssets::house();

    for sections in [1, 10, 100].iter() {
        let blocks: Vec<TextBlock> = docpdf::classify::classify(&create_test_text(*sections));

        group.bench_function(format!("{}_sections", sections), |b| {
            b.iter(|| build(black_box(&blocks), &style, &layout, &assets));
        });
    }

    group.finish();
}

/// Benchmark the whole text-to-PDF path.
fn bench_convert(c: &mut Criterion) {
    let text = create_test_text(20);

    c.bench_function("convert_txt_20_sections", |b| {
        b.iter(|| docpdf::convert_bytes("bench.txt", black_box(text.as_bytes())).unwrap());
    });
}

criterion_group!(benches, bench_classify, bench_synthesis, bench_convert);
criterion_main!(benches);
