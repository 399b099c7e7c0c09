//! Weight configurations: normalized rubric weights used to consolidate
//! several rubric scores into one.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::ScoringError;
use crate::normalize::{WeightNormalizer, is_normalized};
use crate::types::NormalizationMethod;

fn default_enabled() -> bool {
    true
}

/// Raw weight for one rubric as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricWeightSpec {
    pub rubric_id: String,
    pub weight: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl RubricWeightSpec {
    pub fn new(rubric_id: impl Into<String>, weight: f64) -> Self {
        Self {
            rubric_id: rubric_id.into(),
            weight,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// A normalized mapping of rubric → weight for one domain.
///
/// Only constructible through [`WeightConfigBuilder`], so `weights` always sums
/// to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    pub id: String,
    pub name: String,
    /// Owning domain. `None` means the configuration is not tied to a domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub normalization_method: NormalizationMethod,
    weights: IndexMap<String, f64>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl WeightConfig {
    pub fn weights(&self) -> &IndexMap<String, f64> {
        &self.weights
    }

    pub fn weight(&self, rubric_id: &str) -> Option<f64> {
        self.weights.get(rubric_id).copied()
    }

    pub fn rubric_ids(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(String::as_str)
    }

    /// Same configuration under a different normalization method.
    pub fn with_method(&self, method: NormalizationMethod) -> Self {
        Self {
            normalization_method: method,
            ..self.clone()
        }
    }

    /// Check invariants for configurations loaded from a snapshot.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.weights.is_empty() {
            return Err(ScoringError::invalid_weight(format!(
                "weight config '{}' has no rubric weights",
                self.id
            )));
        }
        if let Some((rubric_id, weight)) = self
            .weights
            .iter()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(ScoringError::invalid_weight(format!(
                "weight for '{rubric_id}' is invalid ({weight})"
            )));
        }
        if !is_normalized(self.weights.values()) {
            return Err(ScoringError::invalid_weight(format!(
                "weights of config '{}' do not sum to 1.0",
                self.id
            )));
        }
        Ok(())
    }
}

fn generate_config_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("weight_config_{}", &id[..8])
}

/// Builds a [`WeightConfig`] from raw rubric weights.
#[derive(Debug, Clone, Default)]
pub struct WeightConfigBuilder {
    id: Option<String>,
    name: Option<String>,
    domain_id: Option<String>,
    description: Option<String>,
    method: NormalizationMethod,
    rubric_weights: Vec<RubricWeightSpec>,
    metadata: HashMap<String, serde_json::Value>,
}

impl WeightConfigBuilder {
    pub fn new(method: NormalizationMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Equal raw weight per rubric unless `weights` is given, in which case it
    /// must have one entry per id.
    pub fn from_rubric_ids<S: AsRef<str>>(
        method: NormalizationMethod,
        rubric_ids: &[S],
        weights: Option<&[f64]>,
    ) -> Result<Self, ScoringError> {
        match weights {
            Some(weights) if weights.len() != rubric_ids.len() => {
                return Err(ScoringError::LengthMismatch {
                    ids: rubric_ids.len(),
                    weights: weights.len(),
                });
            }
            _ => {}
        }
        let mut builder = Self::new(method);
        for (i, id) in rubric_ids.iter().enumerate() {
            let weight = weights.map_or(1.0, |w| w[i]);
            builder = builder.rubric(id.as_ref(), weight);
        }
        Ok(builder)
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

    pub fn method(mut self, method: NormalizationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn rubric(self, rubric_id: impl Into<String>, weight: f64) -> Self {
        self.rubric_weight(RubricWeightSpec::new(rubric_id, weight))
    }

    pub fn rubric_weight(mut self, spec: RubricWeightSpec) -> Self {
        self.rubric_weights.push(spec);
        self
    }

    pub fn build(self) -> Result<WeightConfig, ScoringError> {
        let mut seen = HashSet::new();
        for spec in &self.rubric_weights {
            if !seen.insert(spec.rubric_id.as_str()) {
                return Err(ScoringError::DuplicateRubric {
                    rubric_id: spec.rubric_id.clone(),
                });
            }
        }

        let raw: IndexMap<String, f64> = self
            .rubric_weights
            .iter()
            .filter(|spec| spec.enabled)
            .map(|spec| (spec.rubric_id.clone(), spec.weight))
            .collect();
        if raw.is_empty() && !self.rubric_weights.is_empty() {
            return Err(ScoringError::invalid_weight("at least one rubric must be enabled"));
        }
        let weights = WeightNormalizer.normalize(&raw)?;

        let id = self.id.unwrap_or_else(generate_config_id);
        let config = WeightConfig {
            name: self.name.unwrap_or_else(|| id.clone()),
            id,
            domain_id: self.domain_id,
            description: self.description,
            normalization_method: self.method,
            weights,
            metadata: self.metadata,
        };
        tracing::debug!(
            config_id = %config.id,
            rubrics = config.weights.len(),
            method = %config.normalization_method,
            "Built weight config"
        );
        Ok(config)
    }
}

/// Declarative weight configuration as found in catalog import files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightConfigSpec {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub domain_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub normalization_method: NormalizationMethod,
    pub rubric_weights: Vec<RubricWeightSpec>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl WeightConfigSpec {
    pub fn into_builder(self) -> WeightConfigBuilder {
        WeightConfigBuilder {
            id: self.id,
            name: self.name,
            domain_id: self.domain_id,
            description: self.description,
            method: self.normalization_method,
            rubric_weights: self.rubric_weights,
            metadata: self.metadata,
        }
    }
}
