//! Benchmarks for docstrum segmentation performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks segment synthetic two-column pages of monospaced text.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use docstrum::{
    Bounds, Chunk, DocstrumSegmenter, Document, HierarchicalReadingOrderResolver, Page,
    SegmenterOptions,
};

const TEXT: &str = "document layout analysis groups glyphs into words lines and zones \
                    using nearest neighbor distances between connected components";

/// Creates a page with two columns of `lines` lines each, one chunk per character.
fn create_test_page(number: u32, lines: usize) -> Page {
    let words: Vec<&str> = TEXT.split_whitespace().collect();
    let mut chunks = Vec::new();
    let mut next = 0;

    for column_x in [50.0, 310.0] {
        for row in 0..lines {
            let top = 60.0 + row as f64 * 14.0;
            let mut cursor = column_x;
            loop {
                let word = words[next % words.len()];
                let width = word.len() as f64 * 6.0;
                if cursor + width > column_x + 230.0 {
                    break;
                }
                for ch in word.chars() {
                    chunks.push(Chunk::new(Bounds::new(cursor, top, 6.0, 10.0), ch.to_string()));
                    cursor += 6.0;
                }
                cursor += 4.0;
                next += 1;
            }
        }
    }

    Page::from_chunks(number, chunks)
}

fn create_test_document(page_count: u32) -> Document {
    let mut doc = Document::new();
    for number in 1..=page_count {
        doc.add_page(create_test_page(number, 50));
    }
    doc
}

/// Benchmark single-page segmentation at various densities.
fn bench_page_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_segmentation");
    let segmenter = DocstrumSegmenter::default();

    for lines in [10, 25, 50].iter() {
        let page = create_test_page(1, *lines);

        group.bench_function(format!("{}_lines", lines), |b| {
            b.iter(|| segmenter.segment_page(black_box(&page)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark parallel against sequential document segmentation.
fn bench_document_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_segmentation");
    let doc = create_test_document(8);

    let parallel = DocstrumSegmenter::new(SegmenterOptions::default());
    group.bench_function("8_pages_parallel", |b| {
        b.iter(|| parallel.segment_document(black_box(&doc)).unwrap());
    });

    let sequential = DocstrumSegmenter::new(SegmenterOptions::default().sequential());
    group.bench_function("8_pages_sequential", |b| {
        b.iter(|| sequential.segment_document(black_box(&doc)).unwrap());
    });

    group.finish();
}

/// Benchmark reading-order resolution of a segmented page.
fn bench_reading_order(c: &mut Criterion) {
    let page = DocstrumSegmenter::default()
        .segment_page(&create_test_page(1, 50))
        .unwrap();
    let resolver = HierarchicalReadingOrderResolver::default();

    c.bench_function("reading_order", |b| {
        b.iter(|| {
            let mut page = page.clone();
            resolver.resolve_page(black_box(&mut page)).unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_page_segmentation,
    bench_document_segmentation,
    bench_reading_order,
);
criterion_main!(benches);
