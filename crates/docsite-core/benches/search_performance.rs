//! Benchmarks for query ranking, snippets and markdown parsing
#![allow(clippy::unwrap_used)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use docsite_core::{
    Corpus, Heading, MarkdownParser, QueryEngine, SearchDocument, extract_snippet, strip_markdown,
};
use std::hint::black_box;
use std::time::Duration;

const BASE_CONTENT: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
                            Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. \
                            Ut enim ad minim veniam, quis nostrud exercitation ullamco laboris \
                            nisi ut aliquip ex ea commodo consequat.";

const TOPICS: [&str; 5] = [
    "installation setup requirements ",
    "theming colors palette typography ",
    "routing navigation breadcrumbs ",
    "search index cache snapshot ",
    "deployment hosting static export ",
];

fn create_documents(count: usize, content_size: usize) -> Vec<SearchDocument> {
    (0..count)
        .map(|i| {
            let topic = TOPICS[i % TOPICS.len()];
            let mut content = String::new();
            while content.len() < content_size {
                content.push_str(BASE_CONTENT);
                content.push(' ');
                content.push_str(topic);
            }
            content.truncate(content_size);

            let section = format!("section-{}", i % 10);
            SearchDocument {
                path: format!("/docs/{section}/page-{i}"),
                title: format!("Page {i} {}", topic.split(' ').next().unwrap_or_default()),
                description: format!("About {topic}"),
                keywords: topic.trim().replace(' ', ", "),
                section,
                content,
                headings: vec![Heading {
                    level: 2,
                    text: "Overview".to_string(),
                    id: "overview".to_string(),
                }],
            }
        })
        .collect()
}

fn bench_search_scaling(c: &mut Criterion) {
    let engine = QueryEngine::default();
    let mut group = c.benchmark_group("search_scaling");

    for &count in &[10, 100, 500, 1000] {
        let corpus = Corpus::new(create_documents(count, 500));
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("exact", count), &corpus, |b, corpus| {
            b.iter(|| black_box(engine.search(corpus, black_box("palette"))));
        });
        group.bench_with_input(BenchmarkId::new("fuzzy", count), &corpus, |b, corpus| {
            b.iter(|| black_box(engine.search(corpus, black_box("instalation"))));
        });
    }

    group.finish();
}

fn bench_snippet(c: &mut Criterion) {
    let content = create_documents(1, 2_000).remove(0).content;

    c.bench_function("snippet_found", |b| {
        b.iter(|| black_box(extract_snippet(black_box(&content), "palette")));
    });
    c.bench_function("snippet_missing", |b| {
        b.iter(|| black_box(extract_snippet(black_box(&content), "zzz")));
    });
}

fn bench_parse(c: &mut Criterion) {
    let mut markdown = String::from("---\ntitle: Bench\n---\n");
    for i in 0..50 {
        markdown.push_str(&format!(
            "## Section {i}\n\nSome **bold** text with a [link](/docs/x) and `code`.\n\n```rust\nfn main() {{}}\n```\n\n"
        ));
    }

    let mut parser = MarkdownParser::new().unwrap();
    let mut group = c.benchmark_group("markdown");
    group.throughput(Throughput::Bytes(markdown.len() as u64));

    group.bench_function("parse", |b| {
        b.iter(|| black_box(parser.parse(black_box(&markdown)).unwrap().headings.len()));
    });
    group.bench_function("strip", |b| {
        b.iter(|| black_box(strip_markdown(black_box(&markdown))));
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(5));
    targets = bench_search_scaling, bench_snippet, bench_parse
}
criterion_main!(benches);
