use criterion::{Criterion, black_box, criterion_group, criterion_main};
use indexmap::IndexMap;
use rubricate_core::catalog::Catalog;
use rubricate_core::seed::{self, CONFIG_CODE_FOCUS, RUBRIC_ACCURACY, RUBRIC_CODE_QUALITY};
use rubricate_core::templates;
use rubricate_core::{
    ConsolidationMode, EvaluationService, NormalizationMethod, ScoreConsolidator, ScoreInput,
    WeightConfigBuilder, normalize,
};

fn weights(n: usize) -> IndexMap<String, f64> {
    (0..n).map(|i| (format!("k{i}"), (i + 1) as f64)).collect()
}

fn bench_normalize(c: &mut Criterion) {
    let small = weights(4);
    let large = weights(256);

    c.bench_function("normalize_4", |b| b.iter(|| normalize(black_box(&small))));
    c.bench_function("normalize_256", |b| b.iter(|| normalize(black_box(&large))));
}

fn bench_consolidate(c: &mut Criterion) {
    let mut builder = WeightConfigBuilder::new(NormalizationMethod::WeightedAverage);
    let mut scores = ScoreInput::new();
    for i in 0..32 {
        builder = builder.rubric(format!("r{i}"), (i % 5 + 1) as f64);
        scores.insert(format!("r{i}"), 50.0 + i as f64);
    }
    let config = builder.build().expect("valid config");
    let geometric = config.with_method(NormalizationMethod::GeometricMean);

    let strict = ScoreConsolidator::strict();
    c.bench_function("consolidate_weighted_average_32", |b| {
        b.iter(|| strict.consolidate(black_box(&config), black_box(&scores)))
    });
    c.bench_function("consolidate_geometric_mean_32", |b| {
        b.iter(|| strict.consolidate(black_box(&geometric), black_box(&scores)))
    });

    let mut partial = scores.clone();
    partial.truncate(16);
    let renormalize = ScoreConsolidator::new(ConsolidationMode::Renormalize);
    c.bench_function("consolidate_renormalize_16_of_32", |b| {
        b.iter(|| renormalize.consolidate(black_box(&config), black_box(&partial)))
    });
}

fn bench_catalog(c: &mut Criterion) {
    let catalog = seed::default_catalog().expect("seed catalog");
    let service = EvaluationService::default();
    let scores: ScoreInput = [(RUBRIC_CODE_QUALITY, 72.0), (RUBRIC_ACCURACY, 88.0)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

    c.bench_function("service_consolidate_seeded", |b| {
        b.iter(|| service.consolidate(&catalog, black_box(CONFIG_CODE_FOCUS), black_box(&scores)))
    });

    c.bench_function("rubrics_for_domain_lookup", |b| {
        b.iter(|| catalog.rubrics_for_domain(black_box("domain_coding")).len())
    });

    c.bench_function("templates_for_domain", |b| {
        b.iter(|| templates::rubrics_for_domain(black_box("domain_python_programming")))
    });
}

criterion_group!(benches, bench_normalize, bench_consolidate, bench_catalog);
criterion_main!(benches);
