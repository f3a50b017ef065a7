//! Forecasting error taxonomy.
//!
//! Recovery policy lives with the orchestrator: a missing model artifact
//! triggers training, a degenerate corpus is retried once with a fresh
//! seed, everything else propagates with enough context for the caller to
//! log and skip-or-abort.

use thiserror::Error;

use stockcast_core::ProductId;

/// Training failed for the given corpus. Fatal to that attempt; callers
/// may regenerate the corpus with a new seed and retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrainingError {
    #[error("training corpus is empty")]
    EmptyCorpus,

    /// A feature column is constant, which makes the design matrix
    /// singular (the column is collinear with the intercept).
    #[error("feature column '{0}' has zero variance")]
    ZeroVariance(&'static str),

    #[error("design matrix is singular")]
    Singular,
}

/// Failure while persisting or loading a model artifact.
#[derive(Debug, Error)]
pub enum ModelStoreError {
    /// No artifact exists at the given location. Recoverable: the
    /// orchestrator trains a fresh model.
    #[error("model artifact not found at {0}")]
    NotFound(String),

    #[error("model artifact i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("model artifact is malformed: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Top-level error for prediction and fleet forecasting.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// An input value was rejected before feature construction
    /// (negative stock/price, non-finite fields, out-of-range flags).
    #[error("invalid forecast input: {0}")]
    InvalidInput(String),

    /// The loaded model was trained against a different feature schema.
    /// Fatal for the prediction call; feature vectors are never silently
    /// truncated or padded to fit.
    #[error("feature schema mismatch: model was trained on '{model}', runtime expects '{runtime}'")]
    SchemaMismatch { model: String, runtime: String },

    #[error(transparent)]
    Training(#[from] TrainingError),

    #[error(transparent)]
    Store(#[from] ModelStoreError),

    /// Per-item wrapper carrying the offending product id.
    #[error("forecast failed for item {product_id}: {source}")]
    Item {
        product_id: ProductId,
        #[source]
        source: Box<ForecastError>,
    },
}

impl ForecastError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn for_item(product_id: ProductId, source: ForecastError) -> Self {
        Self::Item {
            product_id,
            source: Box::new(source),
        }
    }
}
