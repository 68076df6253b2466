//! Benchmarks for HeartBot classification and reply selection.
//!
//! Measures the per-message cost of walking the keyword table for short
//! prompts, long rambling messages that fall through to the default topic,
//! and the full classify-then-select path.

use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use heartspace_chat::{IntentClassifier, ResponseSelector, SUGGESTED_PROMPTS};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A long message with no keyword from any rule, so every rule is checked.
fn generate_unmatched_message(index: usize) -> String {
    format!(
        "So today I went to the market and bought some apples, then walked \
         along the river for a while and watched the ducks. Later I read a few \
         chapters of a novel about sailors crossing an ocean, cooked some soup, \
         and sat by the window listening to the rain. Entry number {}.",
        index
    )
}

fn bench_classify(c: &mut Criterion) {
    let classifier = IntentClassifier::new();
    let unmatched: Vec<String> = (0..100).map(generate_unmatched_message).collect();

    let mut group = c.benchmark_group("classify");
    group.sample_size(200);
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("suggested_prompts", |b| {
        let mut idx = 0usize;
        b.iter(|| {
            let topic = classifier.classify(SUGGESTED_PROMPTS[idx % SUGGESTED_PROMPTS.len()]);
            idx += 1;
            topic
        });
    });

    group.bench_function("unmatched_long_message", |b| {
        let mut idx = 0usize;
        b.iter(|| {
            let topic = classifier.classify(&unmatched[idx % unmatched.len()]);
            idx += 1;
            topic
        });
    });

    group.finish();
}

fn bench_classify_and_select(c: &mut Criterion) {
    let classifier = IntentClassifier::new();
    let selector = ResponseSelector::new();
    let mut rng = StdRng::seed_from_u64(17);

    c.bench_function("classify_and_select", |b| {
        let mut idx = 0usize;
        b.iter(|| {
            let prompt = SUGGESTED_PROMPTS[idx % SUGGESTED_PROMPTS.len()];
            idx += 1;
            selector.select_reply(classifier.classify(prompt), &mut rng)
        });
    });
}

criterion_group!(benches, bench_classify, bench_classify_and_select);
criterion_main!(benches);
