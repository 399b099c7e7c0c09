//! # Rubricate Core
//!
//! Core library for Rubricate, a toolkit for rubric-based LLM evaluation.
//! Provides weight normalization, the rubric and weight-config builders,
//! score consolidation, the catalog of domains and rubrics, standard rubric
//! templates, and configuration.

pub mod catalog;
pub mod config;
pub mod consolidate;
pub mod error;
pub mod normalize;
pub mod persistence;
pub mod rubric;
pub mod seed;
pub mod service;
pub mod templates;
pub mod types;
pub mod weight_config;

// Re-export commonly used types at the crate root.
pub use catalog::{Catalog, CatalogSnapshot, CatalogSpec, ImportSummary, MemoryCatalog, RubricFilter};
pub use config::{RubricateConfig, load_config};
pub use consolidate::{
    ConsolidatedResult, ConsolidationMode, ScoreConsolidator, ScoreInput, consolidate,
};
pub use error::{CatalogError, ConfigError, Result, RubricateError, ScoringError};
pub use normalize::{WeightNormalizer, normalize};
pub use rubric::{
    Criterion, CriterionSpec, Rubric, RubricBuilder, RubricScore, RubricSpec, ScoringScale,
    build_rubric,
};
pub use service::{CriterionScores, EvaluationService};
pub use types::{Domain, DomainCategory, EvaluationDimension, NormalizationMethod, RubricType};
pub use weight_config::{RubricWeightSpec, WeightConfig, WeightConfigBuilder, WeightConfigSpec};
