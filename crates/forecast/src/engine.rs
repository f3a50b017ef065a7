//! Forecasting orchestrator.
//!
//! Composes prediction, risk classification, and the daily simulator into
//! per-item and fleet-wide forecast reports. The trained model lives in a
//! lock-guarded slot: load-or-train-then-publish happens atomically with
//! respect to concurrent forecast requests, and retraining replaces the
//! model wholesale, so readers never observe a half-built model.

use std::sync::{Arc, RwLock};

use chrono::{NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use stockcast_core::StoreId;
use stockcast_inventory::InventoryItem;

use crate::error::{ForecastError, ModelStoreError};
use crate::feature::FeatureVector;
use crate::model::TrainedModel;
use crate::risk::{self, RiskLevel};
use crate::simulator::{self, DEFAULT_HORIZON_DAYS, DailyForecast};
use crate::store::ModelStore;
use crate::synthetic::{self, DEFAULT_TRAINING_EXAMPLES};
use crate::trainer;

/// Tuning knobs for the engine. Defaults match the production setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Synthetic corpus size for train-on-demand.
    pub training_examples: usize,
    /// Seed for the synthetic corpus (a degenerate corpus is retried once
    /// under a derived seed).
    pub training_seed: u64,
    /// Length of the per-item daily projection.
    pub horizon_days: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            training_examples: DEFAULT_TRAINING_EXAMPLES,
            training_seed: 42,
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

/// Per-item forecast report entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub product_name: String,
    pub store_id: StoreId,
    pub current_stock: u32,
    pub predicted_demand: f64,
    pub days_until_stockout: u32,
    pub risk_level: RiskLevel,
    pub recommended_reorder_quantity: u32,
    pub daily_forecasts: Vec<DailyForecast>,
}

/// Demand forecasting engine over a model store.
///
/// The model slot starts empty; the first forecast request loads the
/// persisted artifact or trains a fresh model. Prediction and
/// classification are pure, so once the slot is populated any number of
/// forecast requests can proceed concurrently against the shared
/// [`TrainedModel`].
#[derive(Debug)]
pub struct ForecastingEngine<S: ModelStore> {
    store: S,
    config: EngineConfig,
    model: RwLock<Option<Arc<TrainedModel>>>,
}

impl<S: ModelStore> ForecastingEngine<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            model: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The currently published model, if any. Never blocks on training.
    pub fn model(&self) -> Option<Arc<TrainedModel>> {
        self.model.read().expect("model slot lock poisoned").clone()
    }

    /// Load-or-train-then-publish.
    ///
    /// Fast path: a published model is returned from a read lock. Slow
    /// path: the write lock is taken, the slot re-checked, and the model
    /// loaded from the store (or trained, when no artifact exists). The
    /// new model becomes visible only after it is fully built.
    pub fn ensure_model(&self) -> Result<Arc<TrainedModel>, ForecastError> {
        if let Some(model) = self.model() {
            return Ok(model);
        }

        let mut slot = self.model.write().expect("model slot lock poisoned");
        if let Some(model) = slot.as_ref() {
            return Ok(Arc::clone(model));
        }

        let model = match self.store.load() {
            Ok(model) => {
                info!(
                    examples = model.trained_examples(),
                    schema = model.schema(),
                    "loaded demand model from artifact store"
                );
                model
            }
            Err(ModelStoreError::NotFound(location)) => {
                info!(%location, "no demand model artifact; training on demand");
                self.train_and_save()?
            }
            Err(err) => return Err(err.into()),
        };

        let model = Arc::new(model);
        *slot = Some(Arc::clone(&model));
        Ok(model)
    }

    /// Discard the published model and train a replacement.
    pub fn retrain(&self) -> Result<Arc<TrainedModel>, ForecastError> {
        let mut slot = self.model.write().expect("model slot lock poisoned");
        let model = Arc::new(self.train_and_save()?);
        *slot = Some(Arc::clone(&model));
        Ok(model)
    }

    fn train_and_save(&self) -> Result<TrainedModel, ForecastError> {
        let today = Utc::now().date_naive();
        let corpus = synthetic::generate(
            self.config.training_examples,
            self.config.training_seed,
            today,
        );

        // At most one silent retry per request, under a derived seed.
        let model = match trainer::fit(&corpus) {
            Ok(model) => model,
            Err(err) => {
                warn!(error = %err, "training failed on synthetic corpus; retrying with a fresh seed");
                let retry = synthetic::generate(
                    self.config.training_examples,
                    self.config.training_seed.wrapping_add(1),
                    today,
                );
                trainer::fit(&retry)?
            }
        };

        info!(
            examples = model.trained_examples(),
            "demand model trained"
        );

        // A save failure is surfaced in the log only; the in-memory model
        // stays usable for this process.
        if let Err(err) = self.store.save(&model) {
            warn!(error = %err, "model artifact could not be persisted; keeping the in-memory model");
        }

        Ok(model)
    }

    /// Forecast a single item as of today, using thread entropy for the
    /// daily walk.
    pub fn forecast(&self, item: &InventoryItem) -> Result<ForecastResult, ForecastError> {
        let model = self.ensure_model()?;
        self.forecast_item(&model, item, Utc::now().date_naive(), &mut rand::thread_rng())
            .map_err(|err| ForecastError::for_item(item.product_id.clone(), err))
    }

    /// Fleet-wide forecast report as of today, ordered by descending risk
    /// severity.
    pub fn all_forecasts(
        &self,
        items: &[InventoryItem],
    ) -> Result<Vec<ForecastResult>, ForecastError> {
        self.forecasts_at(items, Utc::now().date_naive(), &mut rand::thread_rng())
    }

    /// Deterministic variant of [`Self::all_forecasts`]: explicit
    /// reference date and injected random source.
    pub fn forecasts_at<R: Rng + ?Sized>(
        &self,
        items: &[InventoryItem],
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<Vec<ForecastResult>, ForecastError> {
        let model = self.ensure_model()?;

        let mut results = Vec::with_capacity(items.len());
        for item in items {
            let result = self
                .forecast_item(&model, item, today, rng)
                .map_err(|err| ForecastError::for_item(item.product_id.clone(), err))?;
            results.push(result);
        }

        // Stable sort: ties keep input order.
        results.sort_by(|a, b| b.risk_level.cmp(&a.risk_level));
        Ok(results)
    }

    fn forecast_item<R: Rng + ?Sized>(
        &self,
        model: &TrainedModel,
        item: &InventoryItem,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<ForecastResult, ForecastError> {
        let stock = f64::from(item.current_stock);
        let features = FeatureVector::for_inference(today, item.price_point, stock)?;

        let predicted_demand = model.predict(&features)?.max(0.0);
        let assessment = risk::assess(stock, predicted_demand);
        let daily_forecasts = simulator::simulate(
            stock,
            predicted_demand,
            self.config.horizon_days,
            today,
            rng,
        );

        Ok(ForecastResult {
            product_name: item.product_name.clone(),
            store_id: item.store_id.clone(),
            current_stock: item.current_stock,
            predicted_demand,
            days_until_stockout: assessment.days_until_stockout,
            risk_level: assessment.risk,
            recommended_reorder_quantity: assessment.reorder_quantity,
            daily_forecasts,
        })
    }
}
