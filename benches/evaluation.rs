//! Evaluation loop benchmarks
//!
//! Measures feature construction and the repeated train/evaluate loop on a
//! synthetic corpus, sequential against parallel trials.
//!
//! Run with: cargo bench --bench evaluation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spamtree::classifier::DecisionTreeFactory;
use spamtree::config::Execution;
use spamtree::dataset::{Dataset, EmailRecord};
use spamtree::evaluation::Evaluator;
use spamtree::features::FeatureBuilder;

const SPAM_WORDS: [&str; 8] = ["free", "win", "prize", "cash", "offer", "click", "deal", "bonus"];
const HAM_WORDS: [&str; 8] = [
    "meeting", "budget", "report", "team", "review", "schedule", "project", "notes",
];

/// Deterministic corpus: mostly class words with some cross-talk.
fn synthetic_dataset(rows: usize) -> Dataset {
    let records = (0..rows)
        .map(|i| {
            let spam = i % 3 == 0;
            let (own, other) = if spam {
                (&SPAM_WORDS, &HAM_WORDS)
            } else {
                (&HAM_WORDS, &SPAM_WORDS)
            };
            let body = format!(
                "{} {} {} {}",
                own[i % 8],
                own[(i * 7) % 8],
                other[(i * 5) % 8],
                own[(i / 3) % 8]
            );
            let length = i64::try_from(body.len()).unwrap_or(0);
            EmailRecord::new(body, format!("sender{}@mail.test", i % 40), spam)
                .with_body_length(length)
        })
        .collect();
    Dataset::new(records, true)
}

fn bench_feature_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("feature_build");

    for rows in [500, 2_000] {
        let dataset = synthetic_dataset(rows);
        group.bench_with_input(BenchmarkId::new("tfidf_500", rows), &dataset, |b, data| {
            b.iter(|| FeatureBuilder::for_dataset(data, 500).build(black_box(data)));
        });
    }

    group.finish();
}

fn bench_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluation_50_runs");
    group.sample_size(10);

    let dataset = synthetic_dataset(1_000);
    let (_, matrix) = FeatureBuilder::for_dataset(&dataset, 500)
        .build(&dataset)
        .expect("synthetic features");
    let factory = DecisionTreeFactory::new(Some(10));

    for (name, execution) in [
        ("sequential", Execution::Sequential),
        ("parallel", Execution::Parallel),
    ] {
        let evaluator = Evaluator::new(50, 0.3)
            .expect("valid evaluator")
            .with_seed(42)
            .with_execution(execution);
        group.bench_function(name, |b| {
            b.iter(|| evaluator.evaluate(black_box(&matrix), &factory));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_feature_build, bench_evaluation);
criterion_main!(benches);
