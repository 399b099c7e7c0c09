//! Error types for the Rubricate core.
//!
//! Uses `thiserror` for public API error types. Scoring failures are local
//! validation errors that always carry the offending key or value so callers
//! can act on them directly.

/// Top-level error type for the Rubricate core library.
#[derive(Debug, thiserror::Error)]
pub enum RubricateError {
    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Validation failures raised while normalizing weights, building rubrics,
/// or consolidating scores.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("Invalid weight set: {message}")]
    InvalidWeight { message: String },

    #[error("Rubric requires at least one criterion")]
    EmptyCriteria,

    #[error("Duplicate criterion name: '{name}'")]
    DuplicateCriterion { name: String },

    #[error("Invalid criterion: {message}")]
    InvalidCriterion { message: String },

    #[error("No score provided for '{key}'")]
    MissingScore { key: String },

    #[error("Score provided for unknown rubric '{rubric_id}'")]
    UnknownRubric { rubric_id: String },

    #[error("Score provided for unknown criterion '{name}' in rubric '{rubric_id}'")]
    UnknownCriterion { rubric_id: String, name: String },

    #[error("Score {score} for '{key}' is outside the range [{min}, {max}]")]
    ScoreRange {
        key: String,
        score: f64,
        min: f64,
        max: f64,
    },

    #[error("Score {score} for rubric '{rubric_id}' is not valid for method {method}: {reason}")]
    InvalidScoreForMethod {
        rubric_id: String,
        score: f64,
        method: String,
        reason: String,
    },

    #[error("Invalid {kind} value '{value}', expected one of: {expected}")]
    InvalidEnumValue {
        kind: &'static str,
        value: String,
        expected: String,
    },

    #[error("Invalid scoring scale: {message}")]
    InvalidScale { message: String },

    #[error("Got {ids} rubric ids but {weights} weights")]
    LengthMismatch { ids: usize, weights: usize },

    #[error("Rubric '{rubric_id}' listed more than once")]
    DuplicateRubric { rubric_id: String },
}

impl ScoringError {
    pub fn invalid_weight(message: impl Into<String>) -> Self {
        Self::InvalidWeight {
            message: message.into(),
        }
    }

    pub fn missing_score(key: impl Into<String>) -> Self {
        Self::MissingScore { key: key.into() }
    }
}

/// Errors from the catalog (the key-value repository of domains, rubrics,
/// and weight configurations).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} '{id}' already exists")]
    AlreadyExists { kind: &'static str, id: String },

    #[error("Rubric '{rubric_id}' does not belong to domain '{domain_id}'")]
    ForeignRubric {
        rubric_id: String,
        domain_id: String,
    },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },

    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },
}

/// A type alias for results using the top-level `RubricateError`.
pub type Result<T> = std::result::Result<T, RubricateError>;
