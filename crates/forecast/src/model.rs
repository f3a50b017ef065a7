//! The trained demand model.

use serde::{Deserialize, Serialize};

use crate::error::ForecastError;
use crate::feature::{FEATURE_DIM, FeatureVector, schema_fingerprint};

/// Linear demand estimator: weights over the 8 feature dimensions plus an
/// intercept, tagged with the feature schema it was trained against.
///
/// Immutable once fit. Retraining produces a new value that replaces the
/// old one wholesale; the struct is never partially mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    weights: [f64; FEATURE_DIM],
    bias: f64,
    schema_fingerprint: String,
    trained_examples: usize,
}

impl TrainedModel {
    pub(crate) fn from_parameters(
        weights: [f64; FEATURE_DIM],
        bias: f64,
        trained_examples: usize,
    ) -> Self {
        Self {
            weights,
            bias,
            schema_fingerprint: schema_fingerprint(),
            trained_examples,
        }
    }

    pub fn weights(&self) -> &[f64; FEATURE_DIM] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn trained_examples(&self) -> usize {
        self.trained_examples
    }

    pub fn schema(&self) -> &str {
        &self.schema_fingerprint
    }

    /// Score one feature vector: dot product of weights and features plus
    /// the intercept. Pure: no hidden state, no I/O.
    ///
    /// The raw estimate may be negative for unusual inputs; clamping is a
    /// policy decision left to the risk layer.
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, ForecastError> {
        let runtime = schema_fingerprint();
        if self.schema_fingerprint != runtime {
            return Err(ForecastError::SchemaMismatch {
                model: self.schema_fingerprint.clone(),
                runtime,
            });
        }
        features.validate()?;

        let dot: f64 = self
            .weights
            .iter()
            .zip(features.to_array())
            .map(|(w, x)| w * x)
            .sum();
        Ok(dot + self.bias)
    }
}
