//! Property-based tests for core components using proptest.

use indexmap::IndexMap;
use proptest::prelude::*;

use rubricate_core::normalize::{WEIGHT_EPSILON, is_normalized};
use rubricate_core::{
    ConsolidationMode, CriterionSpec, EvaluationDimension, NormalizationMethod, RubricBuilder,
    RubricType, ScoreConsolidator, ScoreInput, ScoringError, WeightConfigBuilder, normalize,
};

fn keyed(values: &[f64]) -> IndexMap<String, f64> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (format!("k{i}"), *v))
        .collect()
}

fn method_strategy() -> impl Strategy<Value = NormalizationMethod> {
    prop::sample::select(NormalizationMethod::ALL.to_vec())
}

// --- Normalization properties ---

proptest! {
    #[test]
    fn normalized_weights_sum_to_one(
        weights in prop::collection::vec(0.001f64..1000.0, 1..20)
    ) {
        let result = normalize(&keyed(&weights)).unwrap();
        prop_assert!(is_normalized(result.values()));
    }

    #[test]
    fn normalization_preserves_ratios(
        weights in prop::collection::vec(0.01f64..100.0, 2..10)
    ) {
        let raw = keyed(&weights);
        let result = normalize(&raw).unwrap();
        let raw_ratio = raw["k0"] / raw["k1"];
        let ratio = result["k0"] / result["k1"];
        prop_assert!((raw_ratio - ratio).abs() <= raw_ratio * 1e-9);
    }

    #[test]
    fn normalization_preserves_key_order(
        weights in prop::collection::vec(0.01f64..100.0, 1..10)
    ) {
        let raw = keyed(&weights);
        let result = normalize(&raw).unwrap();
        prop_assert!(raw.keys().eq(result.keys()));
    }

    #[test]
    fn any_negative_weight_is_rejected(
        mut weights in prop::collection::vec(0.0f64..100.0, 1..10),
        index in any::<prop::sample::Index>(),
        negative in -100.0f64..-0.0001,
    ) {
        let i = index.index(weights.len());
        weights[i] = negative;
        let is_invalid_weight = matches!(
            normalize(&keyed(&weights)),
            Err(ScoringError::InvalidWeight { .. })
        );
        prop_assert!(is_invalid_weight);
    }
}

// --- Consolidation properties ---

proptest! {
    #[test]
    fn consolidated_score_is_bounded_by_inputs(
        pairs in prop::collection::vec((0.01f64..10.0, 0.5f64..=100.0), 1..8),
        method in method_strategy(),
    ) {
        let mut builder = WeightConfigBuilder::new(method);
        let mut scores = ScoreInput::new();
        for (i, (weight, score)) in pairs.iter().enumerate() {
            builder = builder.rubric(format!("r{i}"), *weight);
            scores.insert(format!("r{i}"), *score);
        }
        let config = builder.build().unwrap();

        let result = ScoreConsolidator::strict().consolidate(&config, &scores).unwrap();
        let lo = pairs.iter().map(|(_, s)| *s).fold(f64::INFINITY, f64::min);
        let hi = pairs.iter().map(|(_, s)| *s).fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(result.final_score >= lo - 1e-6, "{} < {}", result.final_score, lo);
        prop_assert!(result.final_score <= hi + 1e-6, "{} > {}", result.final_score, hi);
        prop_assert!(is_normalized(result.weights_used.values()));
    }

    #[test]
    fn consolidation_is_idempotent(
        scores in prop::collection::vec(1.0f64..=100.0, 3),
        method in method_strategy(),
    ) {
        let config = WeightConfigBuilder::new(method)
            .rubric("a", 0.2)
            .rubric("b", 0.3)
            .rubric("c", 0.5)
            .build()
            .unwrap();
        let input: ScoreInput = ["a", "b", "c"]
            .iter()
            .zip(&scores)
            .map(|(k, s)| (k.to_string(), *s))
            .collect();
        let consolidator = ScoreConsolidator::strict();
        let first = consolidator.consolidate(&config, &input).unwrap();
        let second = consolidator.consolidate(&config, &input).unwrap();
        prop_assert_eq!(first.final_score.to_bits(), second.final_score.to_bits());
    }

    #[test]
    fn renormalizing_matches_config_over_available_subset(
        weights in prop::collection::vec(0.01f64..10.0, 2..6),
        scores in prop::collection::vec(0.0f64..=100.0, 6),
        method in prop::sample::select(vec![
            NormalizationMethod::WeightedAverage,
            NormalizationMethod::WeightedSum,
            NormalizationMethod::Max,
            NormalizationMethod::Min,
        ]),
    ) {
        let mut full = WeightConfigBuilder::new(method);
        for (i, w) in weights.iter().enumerate() {
            full = full.rubric(format!("r{i}"), *w);
        }
        let full = full.build().unwrap();

        // Drop the last rubric's score.
        let kept = weights.len() - 1;
        let mut subset = WeightConfigBuilder::new(method);
        let mut input = ScoreInput::new();
        for i in 0..kept {
            subset = subset.rubric(format!("r{i}"), weights[i]);
            input.insert(format!("r{i}"), scores[i]);
        }
        let subset = subset.build().unwrap();

        let renormalized = ScoreConsolidator::new(ConsolidationMode::Renormalize)
            .consolidate(&full, &input)
            .unwrap();
        let expected = ScoreConsolidator::strict().consolidate(&subset, &input).unwrap();
        prop_assert!((renormalized.final_score - expected.final_score).abs() < 1e-6);
        prop_assert!(renormalized.renormalized);
        prop_assert_eq!(renormalized.excluded, vec![format!("r{kept}")]);
    }
}

// --- Rubric properties ---

proptest! {
    #[test]
    fn built_rubric_weights_sum_to_one(
        weights in prop::collection::vec(0.001f64..50.0, 1..12)
    ) {
        let rubric = RubricBuilder::new(RubricType::Custom, EvaluationDimension::OverallQuality)
            .criteria(
                weights
                    .iter()
                    .enumerate()
                    .map(|(i, w)| CriterionSpec::new(format!("c{i}"), "", *w)),
            )
            .build()
            .unwrap();
        let sum: f64 = rubric.criteria().iter().map(|c| c.normalized_weight).sum();
        prop_assert!((sum - 1.0).abs() < WEIGHT_EPSILON);
    }

    #[test]
    fn rubric_score_is_a_percentage(
        scores in prop::collection::vec(0.0f64..=10.0, 3)
    ) {
        let rubric = RubricBuilder::new(RubricType::Clarity, EvaluationDimension::ResponseQuality)
            .criterion(CriterionSpec::new("a", "", 1.0))
            .criterion(CriterionSpec::new("b", "", 2.0))
            .criterion(CriterionSpec::new("c", "", 3.0))
            .build()
            .unwrap();
        let input: IndexMap<String, f64> = ["a", "b", "c"]
            .iter()
            .zip(&scores)
            .map(|(k, s)| (k.to_string(), *s))
            .collect();
        let scored = rubric.score(&input).unwrap();
        prop_assert!((0.0..=100.0).contains(&scored.score));
    }
}
