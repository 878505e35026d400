use criterion::{black_box, criterion_group, criterion_main, Criterion};
use link_preview::{classify, synthesize_fallback, FaviconResolver, MetadataExtractor, UrlValidator};
use std::time::Duration;
use url::Url;

const MOCK_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Test Page</title>
    <meta property="og:title" content="Test Title">
    <meta property="og:description" content="Test Description">
    <meta property="og:image" content="/images/card.jpg">
    <meta property="og:type" content="article">
    <link rel="icon" href="https://example.com/favicon.ico">
</head>
<body>
    <main><h1>Test Content</h1><img src="/hero.png"></main>
</body>
</html>"#;

const BARE_HTML: &str = r#"<html><body><article><p>Plain</p><img src="figure.png"></article></body></html>"#;

fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");

    group
        .sample_size(50)
        .measurement_time(Duration::from_secs(10))
        .warm_up_time(Duration::from_secs(3));

    let extractor = MetadataExtractor::new();
    let page = Url::parse("https://example.com/blog/post").unwrap();

    group.bench_function("open_graph_page", |b| {
        b.iter(|| black_box(extractor.extract(black_box(MOCK_HTML), &page)))
    });

    group.bench_function("content_image_fallback", |b| {
        b.iter(|| black_box(extractor.extract(black_box(BARE_HTML), &page)))
    });

    group.finish();
}

fn bench_url_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("url_stages");

    let validator = UrlValidator::with_default_config();
    let favicons = FaviconResolver::default();
    let page = Url::parse("https://github.com/acme/widget/releases").unwrap();

    group.bench_function("validate", |b| {
        b.iter(|| black_box(validator.validate(black_box("https://example.com/a/b?c=d"))))
    });

    group.bench_function("classify", |b| {
        b.iter(|| black_box(classify(black_box(&page), "object")))
    });

    group.bench_function("fallback", |b| {
        b.iter(|| {
            black_box(synthesize_fallback(
                black_box("https://example.com/blog/some-long_article-title.html"),
                &favicons,
            ))
        })
    });

    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(10));
    targets = bench_extraction, bench_url_stages
);
criterion_main!(benches);
