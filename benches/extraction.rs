//! Performance benchmarks for rs-readability.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rs_readability::{parse, parse_with_options, Options};

const SAMPLE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Sample Article | Example Site</title>
    <meta name="author" content="Jane Doe">
    <meta property="og:description" content="A sample article for benchmarking.">
</head>
<body>
    <nav class="menu">
        <a href="/">Home</a>
        <a href="/about">About</a>
    </nav>
    <article>
        <h1>Sample Article Title</h1>
        <p class="byline">By Jane Doe</p>
        <p>This is the first paragraph of the article. It contains meaningful
        content that the extraction pass should keep, with commas, and the
        sentence rhythms of ordinary prose writing.</p>
        <p>Here is a second paragraph with more content. The extraction should
        preserve the text while removing navigation and other boilerplate from
        the page, which is the whole point of the exercise.</p>
        <p>A third paragraph ensures we have enough content for a meaningful
        benchmark of extraction performance on small documents.</p>
    </article>
    <aside class="sidebar">
        <h3>Related Articles</h3>
        <ul>
            <li><a href="/1">Related article 1</a></li>
            <li><a href="/2">Related article 2</a></li>
        </ul>
    </aside>
    <footer class="site-footer">
        <p>Copyright 2024</p>
    </footer>
</body>
</html>"#;

fn bench_parse_default(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(SAMPLE_HTML.len() as u64));
    group.bench_function("default", |b| {
        b.iter(|| parse(black_box(SAMPLE_HTML), "https://example.com/sample"));
    });
    group.finish();
}

fn bench_parse_with_options(c: &mut Criterion) {
    let options = Options { char_threshold: 100, keep_classes: true, ..Options::default() };
    c.bench_function("parse_with_options", |b| {
        b.iter(|| {
            parse_with_options(
                black_box(SAMPLE_HTML),
                "https://example.com/sample",
                options.clone(),
            )
        });
    });
}

fn bench_large_document(c: &mut Criterion) {
    let paragraphs: String = (0..200)
        .map(|i| {
            format!(
                "<p>Paragraph number {i} of the large synthetic document, written with \
                 enough words, commas, and clauses to resemble real article prose.</p>"
            )
        })
        .collect();
    let html = format!(
        "<html><body><div class=\"article-body\">{paragraphs}</div></body></html>"
    );

    let mut group = c.benchmark_group("parse_large");
    group.throughput(Throughput::Bytes(html.len() as u64));
    group.bench_function("200_paragraphs", |b| {
        b.iter(|| parse(black_box(&html), "https://example.com/large"));
    });
    group.finish();
}

criterion_group!(benches, bench_parse_default, bench_parse_with_options, bench_large_document);
criterion_main!(benches);
