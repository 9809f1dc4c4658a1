//! Benchmarks for the generation hot path outside the network
//!
//! This benchmark measures:
//! - Prompt construction for every category
//! - Reply parsing at different reply sizes
//! - Chat request serialization

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use namegen::parser::parse_names;
use namegen::prompt::{build_prompt, SYSTEM_PROMPT};
use namegen::types::{ChatCompletionRequest, Message, NameCategory, Settings};

fn reply_with(n: usize) -> String {
    (0..n)
        .map(|i| format!(" Name{} ", i))
        .collect::<Vec<_>>()
        .join(",")
}

fn bench_prompt_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("prompt_building");

    for category in NameCategory::all() {
        let settings = Settings::default().with_category(category);
        group.bench_with_input(
            BenchmarkId::new("category", category.as_str()),
            &settings,
            |b, s| b.iter(|| build_prompt(black_box(s))),
        );
    }

    let described = Settings::default().with_custom_prompt("a cozy bakery in a small mountain town");
    group.bench_function("custom_description", |b| {
        b.iter(|| build_prompt(black_box(&described)))
    });

    group.finish();
}

fn bench_reply_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("reply_parsing");

    for size in [5usize, 30, 200] {
        let reply = reply_with(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("names", size), &reply, |b, r| {
            b.iter(|| parse_names(black_box(r), 30))
        });
    }

    group.finish();
}

fn bench_request_serialization(c: &mut Criterion) {
    let prompt = build_prompt(&Settings::default().with_category(NameCategory::Business));
    let request = ChatCompletionRequest {
        model: "google/gemini-flash-1.5-exp".to_string(),
        messages: vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)],
        temperature: 0.7,
        max_tokens: 1000,
    };

    c.bench_function("serialize_chat_request", |b| {
        b.iter(|| serde_json::to_string(black_box(&request)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_prompt_building,
    bench_reply_parsing,
    bench_request_serialization,
);
criterion_main!(benches);
