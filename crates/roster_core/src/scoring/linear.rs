//! Linear regressor restored from a model snapshot

use super::{finite_or_zero, MatchContext, PlayerStats, ScoringProvider};
use crate::error::{Result, SelectionError};
use serde::{Deserialize, Serialize};

/// `score = bias + Σ weight_i · feature_i`, missing features count as 0.
///
/// Trained offline against rule-based scores at a balanced pitch, so the
/// match context is ignored at prediction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearScorer {
    features: Vec<String>,
    weights: Vec<f64>,
    bias: f64,
}

impl LinearScorer {
    pub fn new(features: Vec<String>, weights: Vec<f64>, bias: f64) -> Result<Self> {
        let scorer = Self {
            features,
            weights,
            bias,
        };
        scorer.validate()?;
        Ok(scorer)
    }

    /// Deserialized snapshots go through this as well.
    pub fn validate(&self) -> Result<()> {
        if self.features.len() != self.weights.len() {
            return Err(SelectionError::invalid(format!(
                "linear scorer has {} features but {} weights",
                self.features.len(),
                self.weights.len()
            )));
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(SelectionError::invalid("linear scorer has non-finite coefficients"));
        }
        Ok(())
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Predict from an already-ordered feature vector.
    pub fn predict(&self, values: &[f64]) -> f64 {
        let sum: f64 = self
            .weights
            .iter()
            .zip(values.iter().chain(std::iter::repeat(&0.0)))
            .map(|(w, v)| w * finite_or_zero(*v))
            .sum();
        finite_or_zero(self.bias + sum)
    }
}

impl ScoringProvider for LinearScorer {
    fn score(&self, stats: &PlayerStats, _ctx: &MatchContext) -> f64 {
        let values: Vec<f64> = self
            .features
            .iter()
            .map(|name| stats.feature(name).unwrap_or(0.0))
            .collect();
        self.predict(&values)
    }
}
