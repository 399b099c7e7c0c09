//! End-to-end tests: build rubrics and weight configs, store them in a
//! catalog, persist it, and consolidate scores through the service.

use pretty_assertions::assert_eq;
use rubricate_core::{
    CatalogError, CatalogSpec, ConsolidationMode, CriterionSpec, EvaluationDimension,
    EvaluationService, MemoryCatalog, NormalizationMethod, RubricType, RubricateError,
    ScoreInput, ScoringError, ScoringScale, WeightConfigBuilder, build_rubric, consolidate,
};

fn scores(pairs: &[(&str, f64)]) -> ScoreInput {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn test_build_rubric_normalizes_example_weights() {
    let rubric = build_rubric(
        Some("domain_coding"),
        RubricType::CodeQuality,
        EvaluationDimension::ResponseQuality,
        vec![CriterionSpec::new("A", "", 1.0), CriterionSpec::new("B", "", 3.0)],
    )
    .unwrap();

    let weights = rubric.weights();
    assert!((weights["A"] - 0.25).abs() < 1e-9);
    assert!((weights["B"] - 0.75).abs() < 1e-9);
    assert!(rubric.id.starts_with("rubric_"));
}

#[test]
fn test_build_rubric_duplicate_name() {
    let err = build_rubric(
        None,
        RubricType::Clarity,
        EvaluationDimension::ResponseQuality,
        vec![CriterionSpec::new("A", "", 1.0), CriterionSpec::new("A", "", 2.0)],
    )
    .unwrap_err();
    assert_eq!(err, ScoringError::DuplicateCriterion { name: "A".into() });
}

#[test]
fn test_every_method_on_reference_scores() {
    let config = WeightConfigBuilder::new(NormalizationMethod::WeightedAverage)
        .rubric("r1", 0.4)
        .rubric("r2", 0.6)
        .build()
        .unwrap();
    let input = scores(&[("r1", 80.0), ("r2", 90.0)]);

    let expected = [
        (NormalizationMethod::WeightedAverage, 86.0),
        (NormalizationMethod::WeightedSum, 86.0),
        (NormalizationMethod::Max, 90.0),
        (NormalizationMethod::Min, 80.0),
        (
            NormalizationMethod::GeometricMean,
            80f64.powf(0.4) * 90f64.powf(0.6),
        ),
    ];
    for (method, value) in expected {
        let result = consolidate(&config.with_method(method), &input, true).unwrap();
        assert!(
            (result.final_score - value).abs() < 1e-9,
            "{method}: {} != {value}",
            result.final_score
        );
    }
}

#[test]
fn test_workspace_catalog_roundtrip_and_consolidation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".rubricate").join("catalog.json");

    let mut catalog = rubricate_core::seed::default_catalog().unwrap();
    let rubric = build_rubric(
        Some("domain_math"),
        RubricType::MathematicalCorrectness,
        EvaluationDimension::ResponseQuality,
        vec![
            CriterionSpec::new("Calculation", "", 2.0),
            CriterionSpec::new("Presentation", "", 1.0),
        ],
    )
    .unwrap();
    let rubric_id = rubric.id.clone();
    catalog.insert_rubric(rubric).unwrap();

    let config = WeightConfigBuilder::new(NormalizationMethod::GeometricMean)
        .id("weight_config_math")
        .domain("domain_math")
        .rubric(rubric_id.clone(), 3.0)
        .rubric("rubric_accuracy", 1.0)
        .build()
        .unwrap();
    catalog.add_weight_config(config).unwrap();
    catalog.save(&path).unwrap();

    let loaded = MemoryCatalog::load(&path).unwrap().unwrap();
    let result = EvaluationService::default()
        .consolidate(
            &loaded,
            "weight_config_math",
            &scores(&[(rubric_id.as_str(), 64.0), ("rubric_accuracy", 100.0)]),
        )
        .unwrap();
    let expected = 64f64.powf(0.75) * 100f64.powf(0.25);
    assert!((result.final_score - expected).abs() < 1e-9);
}

#[test]
fn test_foreign_rubric_rejected_for_domain_config() {
    let mut catalog = rubricate_core::seed::default_catalog().unwrap();
    let config = WeightConfigBuilder::new(NormalizationMethod::WeightedAverage)
        .domain("domain_math")
        .rubric("rubric_code_quality", 1.0)
        .build()
        .unwrap();
    let err = catalog.add_weight_config(config).unwrap_err();
    assert_eq!(
        err,
        CatalogError::ForeignRubric {
            rubric_id: "rubric_code_quality".into(),
            domain_id: "domain_math".into(),
        }
    );
}

#[test]
fn test_toml_import_then_consolidate_with_renormalization() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.toml");
    std::fs::write(
        &path,
        r#"
[[rubrics]]
id = "rubric_summary"
rubric_type = "completeness"
scoring_scale = { min_score = 1.0, max_score = 5.0, step = 1.0 }

[[rubrics.criteria]]
name = "Coverage"
weight = 1

[[weight_configs]]
id = "weight_config_summary"
normalization_method = "weighted_sum"

[[weight_configs.rubric_weights]]
rubric_id = "rubric_summary"
weight = 1

[[weight_configs.rubric_weights]]
rubric_id = "rubric_accuracy"
weight = 3

[[weight_configs.rubric_weights]]
rubric_id = "rubric_reasoning"
weight = 5
enabled = false
"#,
    )
    .unwrap();

    let mut catalog = rubricate_core::seed::default_catalog().unwrap();
    let spec = CatalogSpec::from_file(&path).unwrap();
    catalog.import(spec, ScoringScale::default()).unwrap();

    let config = rubricate_core::Catalog::weight_config(&catalog, "weight_config_summary").unwrap();
    assert_eq!(config.weights().len(), 2);
    assert!((config.weight("rubric_accuracy").unwrap() - 0.75).abs() < 1e-9);

    let service = EvaluationService::new(ConsolidationMode::Renormalize);
    let result = service
        .consolidate(
            &catalog,
            "weight_config_summary",
            &scores(&[("rubric_summary", 40.0), ("rubric_unrelated", 10.0)]),
        )
        .unwrap();
    assert!((result.final_score - 40.0).abs() < 1e-9);
    assert_eq!(result.excluded, vec!["rubric_accuracy".to_string()]);

    let strict = EvaluationService::new(ConsolidationMode::Strict)
        .consolidate(
            &catalog,
            "weight_config_summary",
            &scores(&[("rubric_summary", 40.0)]),
        )
        .unwrap_err();
    assert!(matches!(
        strict,
        RubricateError::Scoring(ScoringError::MissingScore { .. })
    ));
}
