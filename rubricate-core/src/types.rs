//! Closed enumerations and the domain entity.
//!
//! Every enumeration has a fixed snake_case textual form used by serde, the
//! CLI, and configuration files. Parsing any other value fails with
//! [`ScoringError::InvalidEnumValue`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::ScoringError;

fn parse_closed<T: Copy>(
    kind: &'static str,
    value: &str,
    all: &[T],
    as_str: fn(&T) -> &'static str,
) -> Result<T, ScoringError> {
    let needle = value.trim();
    all.iter()
        .find(|v| as_str(v) == needle)
        .copied()
        .ok_or_else(|| ScoringError::InvalidEnumValue {
            kind,
            value: value.to_string(),
            expected: all.iter().map(as_str).collect::<Vec<_>>().join(", "),
        })
}

/// Kind of rubric, describing what aspect of an output it judges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RubricType {
    Accuracy,
    Reasoning,
    CodeQuality,
    MathematicalCorrectness,
    Clarity,
    Completeness,
    Relevance,
    Coherence,
    FactualCorrectness,
    Creativity,
    Custom,
}

impl RubricType {
    pub const ALL: [RubricType; 11] = [
        RubricType::Accuracy,
        RubricType::Reasoning,
        RubricType::CodeQuality,
        RubricType::MathematicalCorrectness,
        RubricType::Clarity,
        RubricType::Completeness,
        RubricType::Relevance,
        RubricType::Coherence,
        RubricType::FactualCorrectness,
        RubricType::Creativity,
        RubricType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RubricType::Accuracy => "accuracy",
            RubricType::Reasoning => "reasoning",
            RubricType::CodeQuality => "code_quality",
            RubricType::MathematicalCorrectness => "mathematical_correctness",
            RubricType::Clarity => "clarity",
            RubricType::Completeness => "completeness",
            RubricType::Relevance => "relevance",
            RubricType::Coherence => "coherence",
            RubricType::FactualCorrectness => "factual_correctness",
            RubricType::Creativity => "creativity",
            RubricType::Custom => "custom",
        }
    }

    /// Human-readable title, used as the default rubric name.
    pub fn title(&self) -> &'static str {
        match self {
            RubricType::Accuracy => "Accuracy",
            RubricType::Reasoning => "Reasoning",
            RubricType::CodeQuality => "Code Quality",
            RubricType::MathematicalCorrectness => "Mathematical Correctness",
            RubricType::Clarity => "Clarity",
            RubricType::Completeness => "Completeness",
            RubricType::Relevance => "Relevance",
            RubricType::Coherence => "Coherence",
            RubricType::FactualCorrectness => "Factual Correctness",
            RubricType::Creativity => "Creativity",
            RubricType::Custom => "Custom",
        }
    }
}

impl std::fmt::Display for RubricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RubricType {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_closed("rubric_type", s, &Self::ALL, Self::as_str)
    }
}

/// Which side of an interaction a rubric evaluates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationDimension {
    PromptQuality,
    #[default]
    ResponseQuality,
    OverallQuality,
}

impl EvaluationDimension {
    pub const ALL: [EvaluationDimension; 3] = [
        EvaluationDimension::PromptQuality,
        EvaluationDimension::ResponseQuality,
        EvaluationDimension::OverallQuality,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationDimension::PromptQuality => "prompt_quality",
            EvaluationDimension::ResponseQuality => "response_quality",
            EvaluationDimension::OverallQuality => "overall_quality",
        }
    }
}

impl std::fmt::Display for EvaluationDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvaluationDimension {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_closed("evaluation_dimension", s, &Self::ALL, Self::as_str)
    }
}

/// Aggregation formula applied when consolidating rubric scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMethod {
    /// Σ(wᵢ·sᵢ) / Σwᵢ
    #[default]
    WeightedAverage,
    /// Σ(wᵢ·sᵢ)
    WeightedSum,
    /// max(sᵢ); weights validated but ignored.
    Max,
    /// min(sᵢ); weights validated but ignored.
    Min,
    /// ∏(sᵢ^wᵢ); every score must be strictly positive.
    GeometricMean,
}

impl NormalizationMethod {
    pub const ALL: [NormalizationMethod; 5] = [
        NormalizationMethod::WeightedAverage,
        NormalizationMethod::WeightedSum,
        NormalizationMethod::Max,
        NormalizationMethod::Min,
        NormalizationMethod::GeometricMean,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizationMethod::WeightedAverage => "weighted_average",
            NormalizationMethod::WeightedSum => "weighted_sum",
            NormalizationMethod::Max => "max",
            NormalizationMethod::Min => "min",
            NormalizationMethod::GeometricMean => "geometric_mean",
        }
    }

    /// Whether the final value depends on the rubric weights.
    pub fn uses_weights(&self) -> bool {
        !matches!(self, NormalizationMethod::Max | NormalizationMethod::Min)
    }
}

impl std::fmt::Display for NormalizationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NormalizationMethod {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_closed("normalization_method", s, &Self::ALL, Self::as_str)
    }
}

/// Broad subject area a domain belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainCategory {
    General,
    Coding,
    Mathematics,
    Reasoning,
    Language,
    Science,
    Business,
    Medical,
    Legal,
    Education,
    Creative,
    Technical,
    Research,
    Social,
    Custom,
}

impl DomainCategory {
    pub const ALL: [DomainCategory; 15] = [
        DomainCategory::General,
        DomainCategory::Coding,
        DomainCategory::Mathematics,
        DomainCategory::Reasoning,
        DomainCategory::Language,
        DomainCategory::Science,
        DomainCategory::Business,
        DomainCategory::Medical,
        DomainCategory::Legal,
        DomainCategory::Education,
        DomainCategory::Creative,
        DomainCategory::Technical,
        DomainCategory::Research,
        DomainCategory::Social,
        DomainCategory::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DomainCategory::General => "general",
            DomainCategory::Coding => "coding",
            DomainCategory::Mathematics => "mathematics",
            DomainCategory::Reasoning => "reasoning",
            DomainCategory::Language => "language",
            DomainCategory::Science => "science",
            DomainCategory::Business => "business",
            DomainCategory::Medical => "medical",
            DomainCategory::Legal => "legal",
            DomainCategory::Education => "education",
            DomainCategory::Creative => "creative",
            DomainCategory::Technical => "technical",
            DomainCategory::Research => "research",
            DomainCategory::Social => "social",
            DomainCategory::Custom => "custom",
        }
    }
}

impl std::fmt::Display for DomainCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DomainCategory {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_closed("domain_category", s, &Self::ALL, Self::as_str)
    }
}

/// A named subject area that rubrics and weight configurations belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub id: String,
    pub name: String,
    pub category: DomainCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Domain {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: DomainCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            description: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Case-insensitive substring match over name and description.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&query))
    }
}
