use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use response_eval::ensemble::DisagreementDetector;
use response_eval::prelude::*;

const PARAGRAPH: &str = "First, we examine the evidence from several regions. Based on the \
data, revenue grew 12% because demand increased, therefore the hypothesis holds. However, \
we verify the result by cross-checking last year's figures. Finally, in conclusion, the \
analysis suggests a comprehensive strategy focused on demand.\n\n";

fn evaluate_benchmarks(c: &mut Criterion) {
    let evaluator = Evaluator::new(EvalConfig::default()).expect("valid default config");
    let mut group = c.benchmark_group("evaluate");

    for paragraphs in [1usize, 10, 100] {
        let text = PARAGRAPH.repeat(paragraphs);
        group.bench_with_input(BenchmarkId::from_parameter(paragraphs), &text, |b, text| {
            b.iter(|| evaluator.evaluate(black_box(text), Some("analysis")))
        });
    }
    group.finish();
}

fn ensemble_benchmarks(c: &mut Criterion) {
    let evaluator = Evaluator::new(EvalConfig::default()).expect("valid default config");
    let strategies = evaluator.config().strategies.clone();
    let text = PARAGRAPH.repeat(5);
    let detector = DisagreementDetector::new(evaluator.config().disagreement.clone());

    c.bench_function("ensemble_consensus", |b| {
        b.iter(|| {
            let results = evaluator.evaluate_ensemble(black_box(&text), Some("analysis"), &strategies);
            detector.detect_disagreement(&results)
        })
    });
}

criterion_group!(benches, evaluate_benchmarks, ensemble_benchmarks);
criterion_main!(benches);
