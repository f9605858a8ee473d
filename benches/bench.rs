//! Criterion benchmarks for CareerLens.
//!
//! Covers the hot paths of training and serving:
//! - Text analysis (tokenize, lowercase, shingle)
//! - TF-IDF fitting and transformation
//! - Logistic regression fitting and batch prediction

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use careerlens::analysis::analyzer::Analyzer;
use careerlens::analysis::analyzer::standard::StandardAnalyzer;
use careerlens::config::TrainingConfig;
use careerlens::dataset::TrainingRow;
use careerlens::ml::{TfIdfVectorizer, VectorizerConfig};
use careerlens::pipeline::{Trainer, predict};
use std::hint::black_box;

const LABELS: &[&str] = &[
    "Data Scientist",
    "Nurse",
    "Software Engineer",
    "Teacher",
    "Accountant",
];

/// Generate synthetic profiles, each biased towards one label's vocabulary.
fn generate_profiles(count: usize) -> Vec<TrainingRow> {
    let words: &[&[&str]] = &[
        &["python", "sql", "statistics", "machine", "learning", "data"],
        &["patient", "care", "clinical", "hospital", "nursing", "first"],
        &["rust", "java", "systems", "backend", "testing", "cloud"],
        &["teaching", "classroom", "curriculum", "students", "english", "history"],
        &["finance", "audit", "tax", "ledger", "excel", "reporting"],
    ];
    let shared = ["graduate", "masters", "diploma", "team", "communication"];

    (0..count)
        .filter_map(|i| {
            let class = i % LABELS.len();
            let vocab = words[class];
            let mut text = Vec::with_capacity(12);
            for j in 0..10 {
                text.push(vocab[(i * 7 + j * 13) % vocab.len()]);
            }
            text.push(shared[i % shared.len()]);
            TrainingRow::new(&text.join(" "), LABELS[class])
        })
        .collect()
}

/// Benchmark text analysis.
fn bench_text_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_analysis");

    let analyzer = StandardAnalyzer::new().unwrap();
    let rows = generate_profiles(100);

    group.bench_function("analyze_single_profile", |b| {
        b.iter(|| {
            let tokens: Vec<_> = analyzer.analyze(black_box(&rows[0].text)).unwrap().collect();
            black_box(tokens)
        })
    });

    group.finish();
}

/// Benchmark TF-IDF fitting and transformation.
fn bench_tfidf(c: &mut Criterion) {
    let mut group = c.benchmark_group("tfidf");

    let rows = generate_profiles(2000);
    let texts: Vec<&str> = rows.iter().map(|row| row.text.as_str()).collect();

    group.throughput(Throughput::Elements(texts.len() as u64));
    group.bench_function("fit_2000_profiles", |b| {
        b.iter(|| {
            let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig::default()).unwrap();
            vectorizer.fit(black_box(&texts)).unwrap();
            black_box(vectorizer.vocabulary_size())
        })
    });

    let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig::default()).unwrap();
    vectorizer.fit(&texts).unwrap();
    group.bench_function("transform_2000_profiles", |b| {
        b.iter(|| black_box(vectorizer.transform(black_box(&texts)).unwrap()))
    });

    group.finish();
}

/// Benchmark classifier training and inference.
fn bench_classifier(c: &mut Criterion) {
    let mut group = c.benchmark_group("classifier");
    group.sample_size(10);

    let rows = generate_profiles(500);
    let trainer = Trainer::new(TrainingConfig::default()).unwrap();

    group.bench_function("fit_500_profiles", |b| {
        b.iter(|| black_box(trainer.fit_rows(black_box(&rows)).unwrap()))
    });

    let (bundle, _) = trainer.fit_rows(&rows).unwrap();
    let queries: Vec<&str> = rows.iter().take(100).map(|row| row.text.as_str()).collect();
    group.throughput(Throughput::Elements(queries.len() as u64));
    group.bench_function("predict_top3_batch_100", |b| {
        b.iter(|| black_box(predict(&bundle, black_box(&queries), 3).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_text_analysis, bench_tfidf, bench_classifier);

criterion_main!(benches);
