//! Weight normalization.
//!
//! Turns an ordered mapping of non-negative raw weights into weights that sum
//! to 1.0. Used by the rubric builder (criterion weights), the weight config
//! builder (rubric weights), and the consolidator (renormalization over the
//! rubrics that actually received a score).

use indexmap::IndexMap;
use std::fmt::Display;
use std::hash::Hash;

use crate::error::ScoringError;

/// Tolerance for "sums to 1.0" checks on normalized weights.
pub const WEIGHT_EPSILON: f64 = 1e-9;

/// Normalizes raw weights so they sum to 1.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightNormalizer;

impl WeightNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize `raw` so every value becomes `raw[k] / Σ raw`.
    ///
    /// Fails when the mapping is empty, when any value is negative or not
    /// finite, or when every value is zero. Output keys keep the input order.
    pub fn normalize<K>(&self, raw: &IndexMap<K, f64>) -> Result<IndexMap<K, f64>, ScoringError>
    where
        K: Clone + Eq + Hash + Display,
    {
        if raw.is_empty() {
            return Err(ScoringError::invalid_weight("no weights supplied"));
        }

        let mut total = 0.0_f64;
        for (key, &weight) in raw {
            if !weight.is_finite() {
                return Err(ScoringError::invalid_weight(format!(
                    "weight for '{key}' is not a finite number ({weight})"
                )));
            }
            if weight < 0.0 {
                return Err(ScoringError::invalid_weight(format!(
                    "weight for '{key}' is negative ({weight})"
                )));
            }
            total += weight;
        }

        if total == 0.0 {
            return Err(ScoringError::invalid_weight(
                "all weights are zero, at least one must be positive",
            ));
        }
        if !total.is_finite() {
            return Err(ScoringError::invalid_weight("sum of weights overflows"));
        }

        Ok(raw
            .iter()
            .map(|(key, &weight)| (key.clone(), weight / total))
            .collect())
    }
}

/// Convenience wrapper around [`WeightNormalizer::normalize`].
pub fn normalize<K>(raw: &IndexMap<K, f64>) -> Result<IndexMap<K, f64>, ScoringError>
where
    K: Clone + Eq + Hash + Display,
{
    WeightNormalizer.normalize(raw)
}

/// Whether `weights` sums to 1.0 within [`WEIGHT_EPSILON`].
pub fn is_normalized<'a>(weights: impl IntoIterator<Item = &'a f64>) -> bool {
    let sum: f64 = weights.into_iter().sum();
    (sum - 1.0).abs() < WEIGHT_EPSILON
}
