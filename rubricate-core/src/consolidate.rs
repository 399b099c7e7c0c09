//! Score consolidation.
//!
//! Combines per-rubric scores (0–100) into a single score using the weights
//! and normalization method of a [`WeightConfig`]. Rubrics are always visited
//! in the order they appear in the configuration, so identical inputs produce
//! bit-identical results.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::normalize::WeightNormalizer;
use crate::types::NormalizationMethod;
use crate::weight_config::WeightConfig;

/// Lowest accepted rubric score.
pub const MIN_SCORE: f64 = 0.0;
/// Highest accepted rubric score.
pub const MAX_SCORE: f64 = 100.0;

/// Caller-supplied rubric scores keyed by rubric id.
pub type ScoreInput = IndexMap<String, f64>;

/// How to treat configured rubrics that have no score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsolidationMode {
    /// Every configured rubric needs a score; unknown score keys are rejected.
    #[default]
    Strict,
    /// Rubrics without a score are dropped and the remaining weights are
    /// renormalized. Unknown score keys are ignored.
    Renormalize,
}

impl ConsolidationMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Renormalize }
    }
}

impl std::fmt::Display for ConsolidationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsolidationMode::Strict => write!(f, "strict"),
            ConsolidationMode::Renormalize => write!(f, "renormalize"),
        }
    }
}

/// Outcome of a consolidation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedResult {
    pub config_id: String,
    pub domain_id: Option<String>,
    pub method: NormalizationMethod,
    pub final_score: f64,
    /// Term each rubric contributed before aggregation: `wᵢ·sᵢ` for the
    /// weighted methods, `sᵢ` for max/min, `sᵢ^wᵢ` for geometric mean.
    pub per_rubric_contribution: IndexMap<String, f64>,
    /// Normalized weights actually applied.
    pub weights_used: IndexMap<String, f64>,
    /// Configured rubrics dropped for lack of a score.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<String>,
    pub renormalized: bool,
}

/// Combines rubric scores under a weight configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreConsolidator {
    mode: ConsolidationMode,
}

impl ScoreConsolidator {
    pub fn new(mode: ConsolidationMode) -> Self {
        Self { mode }
    }

    pub fn strict() -> Self {
        Self::new(ConsolidationMode::Strict)
    }

    pub fn renormalizing() -> Self {
        Self::new(ConsolidationMode::Renormalize)
    }

    pub fn mode(&self) -> ConsolidationMode {
        self.mode
    }

    /// Consolidate `scores` under `config`.
    ///
    /// All validation happens before any value is computed; on error nothing
    /// is returned.
    pub fn consolidate(
        &self,
        config: &WeightConfig,
        scores: &ScoreInput,
    ) -> Result<ConsolidatedResult, ScoringError> {
        let mut available: IndexMap<&str, f64> = IndexMap::with_capacity(config.weights().len());
        let mut excluded = Vec::new();
        for (rubric_id, &weight) in config.weights() {
            if scores.contains_key(rubric_id) {
                available.insert(rubric_id.as_str(), weight);
            } else if self.mode == ConsolidationMode::Strict {
                return Err(ScoringError::missing_score(rubric_id.clone()));
            } else {
                tracing::debug!(rubric_id = %rubric_id, "No score, dropping rubric from consolidation");
                excluded.push(rubric_id.clone());
            }
        }

        for rubric_id in scores.keys() {
            if config.weight(rubric_id).is_none() {
                if self.mode == ConsolidationMode::Strict {
                    return Err(ScoringError::UnknownRubric {
                        rubric_id: rubric_id.clone(),
                    });
                }
                tracing::debug!(rubric_id = %rubric_id, "Ignoring score for rubric outside config");
            }
        }

        if available.is_empty() {
            let first = config.rubric_ids().next().unwrap_or_default();
            return Err(ScoringError::missing_score(first));
        }

        for rubric_id in available.keys() {
            let score = scores[*rubric_id];
            if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
                return Err(ScoringError::ScoreRange {
                    key: rubric_id.to_string(),
                    score,
                    min: MIN_SCORE,
                    max: MAX_SCORE,
                });
            }
        }

        // Stored weights are already normalized; only a subset needs rescaling.
        let weights = if excluded.is_empty() {
            available
        } else {
            WeightNormalizer.normalize(&available)?
        };
        let method = config.normalization_method;

        if method == NormalizationMethod::GeometricMean {
            if let Some(rubric_id) = weights.keys().find(|id| scores[**id] <= 0.0) {
                return Err(ScoringError::InvalidScoreForMethod {
                    rubric_id: rubric_id.to_string(),
                    score: scores[*rubric_id],
                    method: method.to_string(),
                    reason: "geometric mean requires strictly positive scores".into(),
                });
            }
        }

        let (final_score, contributions) = aggregate(method, &weights, scores);

        Ok(ConsolidatedResult {
            config_id: config.id.clone(),
            domain_id: config.domain_id.clone(),
            method,
            final_score,
            per_rubric_contribution: contributions,
            weights_used: weights
                .into_iter()
                .map(|(id, w)| (id.to_string(), w))
                .collect(),
            renormalized: !excluded.is_empty(),
            excluded,
        })
    }
}

fn aggregate(
    method: NormalizationMethod,
    weights: &IndexMap<&str, f64>,
    scores: &ScoreInput,
) -> (f64, IndexMap<String, f64>) {
    let mut contributions = IndexMap::with_capacity(weights.len());
    let final_score = match method {
        NormalizationMethod::WeightedAverage | NormalizationMethod::WeightedSum => {
            let mut weighted = 0.0;
            let mut weight_total = 0.0;
            for (&rubric_id, &w) in weights {
                let term = w * scores[rubric_id];
                weighted += term;
                weight_total += w;
                contributions.insert(rubric_id.to_string(), term);
            }
            if method == NormalizationMethod::WeightedAverage {
                weighted / weight_total
            } else {
                weighted
            }
        }
        NormalizationMethod::Max | NormalizationMethod::Min => {
            let mut extreme: Option<f64> = None;
            for &rubric_id in weights.keys() {
                let s = scores[rubric_id];
                contributions.insert(rubric_id.to_string(), s);
                extreme = Some(match (extreme, method) {
                    (None, _) => s,
                    (Some(e), NormalizationMethod::Max) => e.max(s),
                    (Some(e), _) => e.min(s),
                });
            }
            extreme.unwrap_or(MIN_SCORE)
        }
        NormalizationMethod::GeometricMean => {
            let mut product = 1.0;
            for (&rubric_id, &w) in weights {
                let term = scores[rubric_id].powf(w);
                product *= term;
                contributions.insert(rubric_id.to_string(), term);
            }
            product
        }
    };
    (final_score, contributions)
}

/// Consolidate `scores` under `config`; `strict` selects [`ConsolidationMode`].
pub fn consolidate(
    config: &WeightConfig,
    scores: &ScoreInput,
    strict: bool,
) -> Result<ConsolidatedResult, ScoringError> {
    ScoreConsolidator::new(ConsolidationMode::from_strict(strict)).consolidate(config, scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weight_config::WeightConfigBuilder;

    fn config(method: NormalizationMethod) -> WeightConfig {
        WeightConfigBuilder::new(method)
            .id("cfg")
            .domain("domain_coding")
            .rubric("r1", 0.4)
            .rubric("r2", 0.6)
            .build()
            .unwrap()
    }

    fn scores(pairs: &[(&str, f64)]) -> ScoreInput {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn run(method: NormalizationMethod) -> ConsolidatedResult {
        consolidate(&config(method), &scores(&[("r1", 80.0), ("r2", 90.0)]), true).unwrap()
    }

    #[test]
    fn test_weighted_average() {
        let result = run(NormalizationMethod::WeightedAverage);
        assert!((result.final_score - 86.0).abs() < 1e-9);
        assert!((result.per_rubric_contribution["r1"] - 32.0).abs() < 1e-9);
        assert!((result.per_rubric_contribution["r2"] - 54.0).abs() < 1e-9);
        assert!(!result.renormalized);
    }

    #[test]
    fn test_weighted_sum_matches_average() {
        let sum = run(NormalizationMethod::WeightedSum);
        let avg = run(NormalizationMethod::WeightedAverage);
        assert!((sum.final_score - 86.0).abs() < 1e-9);
        assert!((sum.final_score - avg.final_score).abs() < 1e-9);
    }

    #[test]
    fn test_max_and_min() {
        let max = run(NormalizationMethod::Max);
        let min = run(NormalizationMethod::Min);
        assert_eq!(max.final_score, 90.0);
        assert_eq!(min.final_score, 80.0);
        assert_eq!(max.per_rubric_contribution["r1"], 80.0);
    }

    #[test]
    fn test_geometric_mean() {
        let result = run(NormalizationMethod::GeometricMean);
        let expected = 80f64.powf(0.4) * 90f64.powf(0.6);
        assert!((result.final_score - expected).abs() < 1e-9);
        assert!((result.final_score - 85.86).abs() < 0.01);
        assert!((result.per_rubric_contribution["r2"] - 90f64.powf(0.6)).abs() < 1e-9);
    }

    #[test]
    fn test_geometric_mean_zero_score_fails() {
        let err = consolidate(
            &config(NormalizationMethod::GeometricMean),
            &scores(&[("r1", 0.0), ("r2", 90.0)]),
            true,
        )
        .unwrap_err();
        match err {
            ScoringError::InvalidScoreForMethod { rubric_id, score, .. } => {
                assert_eq!(rubric_id, "r1");
                assert_eq!(score, 0.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_zero_score_is_fine_for_other_methods() {
        let result = consolidate(
            &config(NormalizationMethod::WeightedAverage),
            &scores(&[("r1", 0.0), ("r2", 100.0)]),
            true,
        )
        .unwrap();
        assert!((result.final_score - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_strict_missing_score_fails() {
        let err = consolidate(
            &config(NormalizationMethod::WeightedAverage),
            &scores(&[("r1", 80.0)]),
            true,
        )
        .unwrap_err();
        assert_eq!(err, ScoringError::missing_score("r2"));
    }

    #[test]
    fn test_renormalize_missing_score() {
        let result = consolidate(
            &config(NormalizationMethod::WeightedAverage),
            &scores(&[("r2", 90.0)]),
            false,
        )
        .unwrap();
        assert!((result.final_score - 90.0).abs() < 1e-9);
        assert_eq!(result.excluded, vec!["r1".to_string()]);
        assert!(result.renormalized);
        assert!((result.weights_used["r2"] - 1.0).abs() < 1e-9);
        assert!(!result.per_rubric_contribution.contains_key("r1"));
    }

    #[test]
    fn test_renormalize_three_rubrics() {
        let config = WeightConfigBuilder::new(NormalizationMethod::WeightedSum)
            .rubric("a", 0.5)
            .rubric("b", 0.25)
            .rubric("c", 0.25)
            .build()
            .unwrap();
        let result = consolidate(&config, &scores(&[("a", 60.0), ("c", 90.0)]), false).unwrap();
        // a: 0.5/0.75, c: 0.25/0.75
        assert!((result.weights_used["a"] - 2.0 / 3.0).abs() < 1e-9);
        assert!((result.final_score - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_renormalize_with_no_scores_fails() {
        let err = consolidate(
            &config(NormalizationMethod::WeightedAverage),
            &ScoreInput::new(),
            false,
        )
        .unwrap_err();
        assert_eq!(err, ScoringError::missing_score("r1"));
    }

    #[test]
    fn test_strict_unknown_rubric_fails() {
        let err = consolidate(
            &config(NormalizationMethod::WeightedAverage),
            &scores(&[("r1", 80.0), ("r2", 90.0), ("r9", 10.0)]),
            true,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ScoringError::UnknownRubric {
                rubric_id: "r9".into()
            }
        );
    }

    #[test]
    fn test_renormalize_ignores_unknown_rubric() {
        let result = consolidate(
            &config(NormalizationMethod::WeightedAverage),
            &scores(&[("r1", 80.0), ("r2", 90.0), ("r9", 500.0)]),
            false,
        )
        .unwrap();
        assert!((result.final_score - 86.0).abs() < 1e-9);
        assert!(!result.per_rubric_contribution.contains_key("r9"));
    }

    #[test]
    fn test_score_out_of_range_fails() {
        for bad in [-1.0, 100.5, f64::NAN] {
            let err = consolidate(
                &config(NormalizationMethod::Max),
                &scores(&[("r1", 80.0), ("r2", bad)]),
                true,
            )
            .unwrap_err();
            assert!(matches!(err, ScoringError::ScoreRange { ref key, .. } if key == "r2"));
        }
    }

    #[test]
    fn test_boundary_scores_accepted() {
        let result = consolidate(
            &config(NormalizationMethod::Min),
            &scores(&[("r1", 0.0), ("r2", 100.0)]),
            true,
        )
        .unwrap();
        assert_eq!(result.final_score, 0.0);
    }

    #[test]
    fn test_contribution_order_follows_config() {
        let result = consolidate(
            &config(NormalizationMethod::WeightedAverage),
            &scores(&[("r2", 90.0), ("r1", 80.0)]),
            true,
        )
        .unwrap();
        let keys: Vec<&str> = result
            .per_rubric_contribution
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["r1", "r2"]);
    }

    #[test]
    fn test_idempotent() {
        let config = config(NormalizationMethod::GeometricMean);
        let input = scores(&[("r1", 73.5), ("r2", 41.25)]);
        let first = consolidate(&config, &input, true).unwrap();
        let second = consolidate(&config, &input, true).unwrap();
        assert_eq!(first.final_score.to_bits(), second.final_score.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn test_result_carries_config_identity() {
        let result = run(NormalizationMethod::Max);
        assert_eq!(result.config_id, "cfg");
        assert_eq!(result.domain_id.as_deref(), Some("domain_coding"));
        assert_eq!(result.method, NormalizationMethod::Max);
    }

    #[test]
    fn test_mode_from_strict() {
        assert_eq!(ConsolidationMode::from_strict(true), ConsolidationMode::Strict);
        assert_eq!(ConsolidationMode::from_strict(false), ConsolidationMode::Renormalize);
        assert_eq!(ScoreConsolidator::renormalizing().mode().to_string(), "renormalize");
    }

    #[test]
    fn test_full_score_set_uses_stored_weights_exactly() {
        let config = WeightConfigBuilder::new(NormalizationMethod::WeightedSum)
            .rubric("a", 1.0)
            .rubric("b", 1.0)
            .rubric("c", 1.0)
            .rubric("d", 7.0)
            .rubric("e", 3.0)
            .build()
            .unwrap();
        let input = scores(&[("a", 10.0), ("b", 20.0), ("c", 30.0), ("d", 40.0), ("e", 50.0)]);
        let result = consolidate(&config, &input, true).unwrap();

        assert_eq!(&result.weights_used, config.weights());
        for (rubric_id, &w) in config.weights() {
            assert_eq!(
                result.per_rubric_contribution[rubric_id].to_bits(),
                (w * input[rubric_id]).to_bits()
            );
        }
    }
}
