//! Rubrics and the rubric builder.
//!
//! A rubric is an ordered list of weighted criteria. Criterion weights are
//! supplied raw and normalized on build, so a built [`Rubric`] always carries
//! weights summing to 1.0.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::ScoringError;
use crate::normalize::{WeightNormalizer, is_normalized};
use crate::types::{EvaluationDimension, RubricType};

/// Caller-supplied description of a criterion, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "weight")]
    pub raw_weight: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evaluation_guidelines: Vec<String>,
}

impl CriterionSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, raw_weight: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            raw_weight,
            evaluation_guidelines: Vec::new(),
        }
    }

    pub fn with_guidelines<I, S>(mut self, guidelines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.evaluation_guidelines = guidelines.into_iter().map(Into::into).collect();
        self
    }
}

/// A single named, weighted judgment axis within a rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
    pub description: String,
    pub raw_weight: f64,
    pub normalized_weight: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evaluation_guidelines: Vec<String>,
}

impl Criterion {
    fn to_spec(&self) -> CriterionSpec {
        CriterionSpec {
            name: self.name.clone(),
            description: self.description.clone(),
            raw_weight: self.raw_weight,
            evaluation_guidelines: self.evaluation_guidelines.clone(),
        }
    }
}

/// Range on which individual criterion scores are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringScale {
    pub min_score: f64,
    pub max_score: f64,
    /// Suggested score increment for graders. Advisory: scores between
    /// steps are accepted as long as they lie within the bounds.
    pub step: f64,
}

impl Default for ScoringScale {
    fn default() -> Self {
        Self {
            min_score: 0.0,
            max_score: 10.0,
            step: 0.1,
        }
    }
}

impl ScoringScale {
    pub fn new(min_score: f64, max_score: f64, step: f64) -> Result<Self, ScoringError> {
        let scale = Self {
            min_score,
            max_score,
            step,
        };
        scale.validate()?;
        Ok(scale)
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        if !(self.min_score.is_finite() && self.max_score.is_finite() && self.step.is_finite()) {
            return Err(ScoringError::InvalidScale {
                message: "scale bounds and step must be finite".into(),
            });
        }
        if self.max_score <= self.min_score {
            return Err(ScoringError::InvalidScale {
                message: format!(
                    "max_score ({}) must be greater than min_score ({})",
                    self.max_score, self.min_score
                ),
            });
        }
        if self.step <= 0.0 {
            return Err(ScoringError::InvalidScale {
                message: format!("step ({}) must be positive", self.step),
            });
        }
        Ok(())
    }

    /// Whether `score` lies within `[min_score, max_score]`. `step` is not
    /// checked.
    pub fn contains(&self, score: f64) -> bool {
        score >= self.min_score && score <= self.max_score
    }

    /// Map a value on this scale onto 0–100.
    pub fn to_percent(&self, score: f64) -> f64 {
        ((score - self.min_score) / (self.max_score - self.min_score) * 100.0).clamp(0.0, 100.0)
    }
}

/// A weighted set of criteria used to score one evaluation dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    pub id: String,
    pub name: String,
    /// Owning domain. `None` marks a shared rubric usable from any domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
    pub rubric_type: RubricType,
    pub evaluation_dimension: EvaluationDimension,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    criteria: Vec<Criterion>,
    #[serde(default)]
    pub scoring_scale: ScoringScale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Rubric {
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn criterion(&self, name: &str) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.name == name)
    }

    /// Normalized criterion weights keyed by criterion name, in rubric order.
    pub fn weights(&self) -> IndexMap<String, f64> {
        self.criteria
            .iter()
            .map(|c| (c.name.clone(), c.normalized_weight))
            .collect()
    }

    /// Whether this rubric may be used by configurations of `domain_id`.
    pub fn belongs_to(&self, domain_id: &str) -> bool {
        self.domain_id.as_deref().is_none_or(|d| d == domain_id)
    }

    /// Replace the criteria, renormalizing their weights. Identity and
    /// descriptive fields carry over unchanged.
    pub fn rebuild(&self, criteria: Vec<CriterionSpec>) -> Result<Rubric, ScoringError> {
        RubricBuilder::from_rubric(self).criteria(criteria).build()
    }

    /// Check the invariants a built rubric must satisfy. Used when rubrics are
    /// loaded from a snapshot rather than produced by the builder.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.criteria.is_empty() {
            return Err(ScoringError::EmptyCriteria);
        }
        check_names(self.criteria.iter().map(|c| c.name.as_str()))?;
        self.scoring_scale.validate()?;
        if !is_normalized(self.criteria.iter().map(|c| &c.normalized_weight)) {
            return Err(ScoringError::invalid_weight(format!(
                "criterion weights of rubric '{}' do not sum to 1.0",
                self.id
            )));
        }
        Ok(())
    }

    /// Combine per-criterion scores (on this rubric's scale) into a 0–100
    /// rubric score.
    pub fn score(&self, criterion_scores: &IndexMap<String, f64>) -> Result<RubricScore, ScoringError> {
        for name in criterion_scores.keys() {
            if self.criterion(name).is_none() {
                return Err(ScoringError::UnknownCriterion {
                    rubric_id: self.id.clone(),
                    name: name.clone(),
                });
            }
        }

        let mut contributions = IndexMap::with_capacity(self.criteria.len());
        let mut raw_score = 0.0;
        for criterion in &self.criteria {
            let key = format!("{}/{}", self.id, criterion.name);
            let score = *criterion_scores
                .get(&criterion.name)
                .ok_or_else(|| ScoringError::missing_score(key.clone()))?;
            if !self.scoring_scale.contains(score) {
                return Err(ScoringError::ScoreRange {
                    key,
                    score,
                    min: self.scoring_scale.min_score,
                    max: self.scoring_scale.max_score,
                });
            }
            let contribution = criterion.normalized_weight * score;
            raw_score += contribution;
            contributions.insert(criterion.name.clone(), contribution);
        }

        Ok(RubricScore {
            rubric_id: self.id.clone(),
            raw_score,
            score: self.scoring_scale.to_percent(raw_score),
            per_criterion_contribution: contributions,
        })
    }
}

/// Result of scoring a single rubric from its criterion scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricScore {
    pub rubric_id: String,
    /// Weighted score on the rubric's own scale.
    pub raw_score: f64,
    /// `raw_score` mapped onto 0–100, ready for consolidation.
    pub score: f64,
    pub per_criterion_contribution: IndexMap<String, f64>,
}

fn check_names<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), ScoringError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(ScoringError::InvalidCriterion {
                message: "criterion name must not be empty".into(),
            });
        }
        if !seen.insert(name) {
            return Err(ScoringError::DuplicateCriterion {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

fn generate_rubric_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("rubric_{}", &id[..8])
}

/// Assembles a [`Rubric`] from raw criteria.
#[derive(Debug, Clone)]
pub struct RubricBuilder {
    id: Option<String>,
    name: Option<String>,
    domain_id: Option<String>,
    rubric_type: RubricType,
    evaluation_dimension: EvaluationDimension,
    description: Option<String>,
    criteria: Vec<CriterionSpec>,
    scoring_scale: ScoringScale,
    instructions: Option<String>,
    metadata: HashMap<String, serde_json::Value>,
}

impl RubricBuilder {
    pub fn new(rubric_type: RubricType, evaluation_dimension: EvaluationDimension) -> Self {
        Self {
            id: None,
            name: None,
            domain_id: None,
            rubric_type,
            evaluation_dimension,
            description: None,
            criteria: Vec::new(),
            scoring_scale: ScoringScale::default(),
            instructions: None,
            metadata: HashMap::new(),
        }
    }

    /// Start from an existing rubric, keeping its identity and criteria.
    pub fn from_rubric(rubric: &Rubric) -> Self {
        Self {
            id: Some(rubric.id.clone()),
            name: Some(rubric.name.clone()),
            domain_id: rubric.domain_id.clone(),
            rubric_type: rubric.rubric_type,
            evaluation_dimension: rubric.evaluation_dimension,
            description: rubric.description.clone(),
            criteria: rubric.criteria.iter().map(Criterion::to_spec).collect(),
            scoring_scale: rubric.scoring_scale,
            instructions: rubric.instructions.clone(),
            metadata: rubric.metadata.clone(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn domain(mut self, domain_id: impl Into<String>) -> Self {
        self.domain_id = Some(domain_id.into());
        self
    }

    pub fn maybe_domain(mut self, domain_id: Option<String>) -> Self {
        self.domain_id = domain_id;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn scale(mut self, scale: ScoringScale) -> Self {
        self.scoring_scale = scale;
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn criterion(mut self, criterion: CriterionSpec) -> Self {
        self.criteria.push(criterion);
        self
    }

    /// Replace all criteria.
    pub fn criteria(mut self, criteria: impl IntoIterator<Item = CriterionSpec>) -> Self {
        self.criteria = criteria.into_iter().collect();
        self
    }

    pub fn build(self) -> Result<Rubric, ScoringError> {
        if self.criteria.is_empty() {
            return Err(ScoringError::EmptyCriteria);
        }
        check_names(self.criteria.iter().map(|c| c.name.as_str()))?;
        self.scoring_scale.validate()?;

        let raw: IndexMap<&str, f64> = self
            .criteria
            .iter()
            .map(|c| (c.name.as_str(), c.raw_weight))
            .collect();
        let normalized = WeightNormalizer.normalize(&raw)?;

        let criteria = self
            .criteria
            .iter()
            .map(|spec| Criterion {
                name: spec.name.clone(),
                description: spec.description.clone(),
                raw_weight: spec.raw_weight,
                normalized_weight: normalized[spec.name.as_str()],
                evaluation_guidelines: spec.evaluation_guidelines.clone(),
            })
            .collect();

        let rubric = Rubric {
            id: self.id.unwrap_or_else(generate_rubric_id),
            name: self
                .name
                .unwrap_or_else(|| self.rubric_type.title().to_string()),
            domain_id: self.domain_id,
            rubric_type: self.rubric_type,
            evaluation_dimension: self.evaluation_dimension,
            description: self.description,
            criteria,
            scoring_scale: self.scoring_scale,
            instructions: self.instructions,
            metadata: self.metadata,
        };
        tracing::debug!(
            rubric_id = %rubric.id,
            criteria = rubric.criteria.len(),
            "Built rubric"
        );
        Ok(rubric)
    }
}

/// Build a rubric from raw criteria.
pub fn build_rubric(
    domain_id: Option<&str>,
    rubric_type: RubricType,
    evaluation_dimension: EvaluationDimension,
    criteria: Vec<CriterionSpec>,
) -> Result<Rubric, ScoringError> {
    RubricBuilder::new(rubric_type, evaluation_dimension)
        .maybe_domain(domain_id.map(str::to_string))
        .criteria(criteria)
        .build()
}

/// Declarative rubric definition as found in catalog import files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RubricSpec {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub domain_id: Option<String>,
    pub rubric_type: RubricType,
    #[serde(default)]
    pub evaluation_dimension: EvaluationDimension,
    #[serde(default)]
    pub description: Option<String>,
    pub criteria: Vec<CriterionSpec>,
    #[serde(default)]
    pub scoring_scale: Option<ScoringScale>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl RubricSpec {
    /// Convert into a builder; `default_scale` applies when no scale is set.
    pub fn into_builder(self, default_scale: ScoringScale) -> RubricBuilder {
        let mut builder = RubricBuilder::new(self.rubric_type, self.evaluation_dimension)
            .maybe_domain(self.domain_id)
            .scale(self.scoring_scale.unwrap_or(default_scale))
            .criteria(self.criteria);
        builder.id = self.id;
        builder.name = self.name;
        builder.description = self.description;
        builder.instructions = self.instructions;
        builder.metadata = self.metadata;
        builder
    }
}
