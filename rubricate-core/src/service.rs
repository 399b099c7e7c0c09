//! Evaluation service: resolves weight configurations from a catalog and
//! consolidates scores against them.

use indexmap::IndexMap;

use crate::catalog::Catalog;
use crate::config::RubricateConfig;
use crate::consolidate::{ConsolidatedResult, ConsolidationMode, ScoreConsolidator, ScoreInput};
use crate::error::{CatalogError, Result};
use crate::types::NormalizationMethod;
use crate::weight_config::WeightConfig;

/// Criterion scores per rubric: rubric id → criterion name → score on the
/// rubric's own scale.
pub type CriterionScores = IndexMap<String, IndexMap<String, f64>>;

#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluationService {
    consolidator: ScoreConsolidator,
}

impl EvaluationService {
    pub fn new(mode: ConsolidationMode) -> Self {
        Self {
            consolidator: ScoreConsolidator::new(mode),
        }
    }

    pub fn from_config(config: &RubricateConfig) -> Self {
        Self::new(config.consolidation.mode())
    }

    pub fn mode(&self) -> ConsolidationMode {
        self.consolidator.mode()
    }

    /// Consolidate rubric scores (0–100) under the weight config `config_id`.
    pub fn consolidate<C: Catalog + ?Sized>(
        &self,
        catalog: &C,
        config_id: &str,
        scores: &ScoreInput,
    ) -> Result<ConsolidatedResult> {
        self.consolidate_with_method(catalog, config_id, scores, None)
    }

    /// Like [`consolidate`](Self::consolidate), optionally overriding the
    /// config's normalization method for this call.
    pub fn consolidate_with_method<C: Catalog + ?Sized>(
        &self,
        catalog: &C,
        config_id: &str,
        scores: &ScoreInput,
        method: Option<NormalizationMethod>,
    ) -> Result<ConsolidatedResult> {
        let _span = tracing::debug_span!("consolidate", config_id, mode = %self.mode()).entered();

        let config = resolve_config(catalog, config_id)?;
        let config = match method {
            Some(method) if method != config.normalization_method => config.with_method(method),
            _ => config.clone(),
        };

        let result = self.consolidator.consolidate(&config, scores)?;
        tracing::info!(
            config_id,
            method = %result.method,
            final_score = result.final_score,
            excluded = result.excluded.len(),
            "Consolidated scores"
        );
        Ok(result)
    }

    /// Score each rubric from its criterion scores, then consolidate the
    /// resulting 0–100 rubric scores under `config_id`.
    pub fn consolidate_criteria<C: Catalog + ?Sized>(
        &self,
        catalog: &C,
        config_id: &str,
        criterion_scores: &CriterionScores,
    ) -> Result<ConsolidatedResult> {
        let mut scores = ScoreInput::with_capacity(criterion_scores.len());
        for (rubric_id, per_criterion) in criterion_scores {
            let rubric = catalog.rubric(rubric_id).ok_or_else(|| CatalogError::NotFound {
                kind: "Rubric",
                id: rubric_id.clone(),
            })?;
            let scored = rubric.score(per_criterion)?;
            tracing::debug!(rubric_id = %rubric_id, score = scored.score, "Scored rubric");
            scores.insert(rubric_id.clone(), scored.score);
        }
        self.consolidate(catalog, config_id, &scores)
    }
}

/// Fetch `config_id` and check that every rubric it weights still exists
/// and is usable from the config's domain.
fn resolve_config<'a, C: Catalog + ?Sized>(catalog: &'a C, config_id: &str) -> Result<&'a WeightConfig> {
    let config = catalog
        .weight_config(config_id)
        .ok_or_else(|| CatalogError::NotFound {
            kind: "Weight config",
            id: config_id.to_string(),
        })?;
    for rubric_id in config.rubric_ids() {
        let rubric = catalog.rubric(rubric_id).ok_or_else(|| CatalogError::NotFound {
            kind: "Rubric",
            id: rubric_id.to_string(),
        })?;
        if let Some(domain_id) = config.domain_id.as_deref() {
            if !rubric.belongs_to(domain_id) {
                return Err(CatalogError::ForeignRubric {
                    rubric_id: rubric_id.to_string(),
                    domain_id: domain_id.to_string(),
                }
                .into());
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::error::{RubricateError, ScoringError};
    use crate::seed::{self, CONFIG_BALANCED, CONFIG_CODE_FOCUS, RUBRIC_ACCURACY, RUBRIC_CODE_QUALITY};

    fn scores(pairs: &[(&str, f64)]) -> ScoreInput {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn catalog() -> MemoryCatalog {
        seed::default_catalog().unwrap()
    }

    #[test]
    fn test_consolidate_seeded_config() {
        let service = EvaluationService::default();
        let result = service
            .consolidate(
                &catalog(),
                CONFIG_CODE_FOCUS,
                &scores(&[(RUBRIC_CODE_QUALITY, 80.0), (RUBRIC_ACCURACY, 90.0)]),
            )
            .unwrap();
        // 0.6 * 80 + 0.4 * 90
        assert!((result.final_score - 84.0).abs() < 1e-9);
        assert_eq!(result.config_id, CONFIG_CODE_FOCUS);
    }

    #[test]
    fn test_unknown_config() {
        let err = EvaluationService::default()
            .consolidate(&catalog(), "nope", &ScoreInput::new())
            .unwrap_err();
        assert!(matches!(
            err,
            RubricateError::Catalog(CatalogError::NotFound { kind: "Weight config", .. })
        ));
    }

    #[test]
    fn test_deleted_rubric_is_reported() {
        let mut catalog = catalog();
        assert!(catalog.delete_rubric(RUBRIC_ACCURACY));
        let err = EvaluationService::default()
            .consolidate(
                &catalog,
                CONFIG_BALANCED,
                &scores(&[(RUBRIC_ACCURACY, 50.0), ("rubric_reasoning", 50.0)]),
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Catalog error: Rubric 'rubric_accuracy' not found"
        );
    }

    #[test]
    fn test_renormalize_mode_from_config() {
        let mut config = RubricateConfig::default();
        config.consolidation.strict = false;
        let service = EvaluationService::from_config(&config);
        let result = service
            .consolidate(&catalog(), CONFIG_BALANCED, &scores(&[(RUBRIC_ACCURACY, 70.0)]))
            .unwrap();
        assert_eq!(result.final_score, 70.0);
        assert_eq!(result.excluded, vec!["rubric_reasoning".to_string()]);
    }

    #[test]
    fn test_strict_mode_missing_score() {
        let err = EvaluationService::default()
            .consolidate(&catalog(), CONFIG_BALANCED, &scores(&[(RUBRIC_ACCURACY, 70.0)]))
            .unwrap_err();
        assert!(matches!(
            err,
            RubricateError::Scoring(ScoringError::MissingScore { ref key }) if key == "rubric_reasoning"
        ));
    }

    #[test]
    fn test_method_override() {
        let result = EvaluationService::default()
            .consolidate_with_method(
                &catalog(),
                CONFIG_BALANCED,
                &scores(&[(RUBRIC_ACCURACY, 60.0), ("rubric_reasoning", 95.0)]),
                Some(NormalizationMethod::Max),
            )
            .unwrap();
        assert_eq!(result.method, NormalizationMethod::Max);
        assert_eq!(result.final_score, 95.0);
    }

    #[test]
    fn test_consolidate_from_criteria() {
        let mut criteria = CriterionScores::new();
        criteria.insert(
            RUBRIC_CODE_QUALITY.into(),
            [
                ("Syntax Correctness", 10.0),
                ("Logical Correctness", 5.0),
                ("Code Style", 10.0),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        );
        criteria.insert(
            RUBRIC_ACCURACY.into(),
            [("Factual Correctness", 10.0), ("Completeness", 10.0), ("Relevance", 10.0)]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        );

        let result = EvaluationService::default()
            .consolidate_criteria(&catalog(), CONFIG_CODE_FOCUS, &criteria)
            .unwrap();
        // code quality: 0.3*10 + 0.4*5 + 0.3*10 = 8.0 -> 80; accuracy 100.
        assert!((result.final_score - (0.6 * 80.0 + 0.4 * 100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_works_through_trait_object() {
        let catalog = catalog();
        let dyn_catalog: &dyn Catalog = &catalog;
        let result = EvaluationService::default()
            .consolidate(
                dyn_catalog,
                CONFIG_BALANCED,
                &scores(&[(RUBRIC_ACCURACY, 40.0), ("rubric_reasoning", 60.0)]),
            )
            .unwrap();
        assert!((result.final_score - 50.0).abs() < 1e-9);
    }

    /// A catalog that hands out whatever it holds, without reference checks.
    struct LooseCatalog {
        rubrics: Vec<crate::rubric::Rubric>,
        config: WeightConfig,
    }

    impl Catalog for LooseCatalog {
        fn domain(&self, _id: &str) -> Option<&crate::types::Domain> {
            None
        }

        fn rubric(&self, id: &str) -> Option<&crate::rubric::Rubric> {
            self.rubrics.iter().find(|r| r.id == id)
        }

        fn weight_config(&self, id: &str) -> Option<&WeightConfig> {
            (self.config.id == id).then_some(&self.config)
        }

        fn rubrics_for_domain(&self, domain_id: &str) -> Vec<&crate::rubric::Rubric> {
            self.rubrics.iter().filter(|r| r.belongs_to(domain_id)).collect()
        }
    }

    #[test]
    fn test_foreign_rubric_rejected_at_consolidation() {
        let seeded = catalog();
        let moved = crate::rubric::RubricBuilder::from_rubric(seeded.rubric(RUBRIC_CODE_QUALITY).unwrap())
            .domain("domain_math")
            .build()
            .unwrap();
        let loose = LooseCatalog {
            rubrics: vec![moved, seeded.rubric(RUBRIC_ACCURACY).unwrap().clone()],
            config: seeded.weight_config(CONFIG_CODE_FOCUS).unwrap().clone(),
        };

        let err = EvaluationService::default()
            .consolidate(
                &loose,
                CONFIG_CODE_FOCUS,
                &scores(&[(RUBRIC_CODE_QUALITY, 80.0), (RUBRIC_ACCURACY, 90.0)]),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            RubricateError::Catalog(CatalogError::ForeignRubric { ref rubric_id, ref domain_id })
                if rubric_id == RUBRIC_CODE_QUALITY && domain_id == "domain_coding"
        ));
    }
}
