//! Model artifact persistence.
//!
//! A trained model serializes to a single JSON artifact at a
//! caller-supplied location. The store neither creates directories nor
//! applies retention; artifact placement is the deployment's concern.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::ModelStoreError;
use crate::model::TrainedModel;

/// Durable storage seam for trained models.
///
/// `load(save(m))` must reproduce `m`'s predictions within floating-point
/// tolerance. A missing artifact is [`ModelStoreError::NotFound`], a
/// recoverable condition that the orchestrator answers by training.
pub trait ModelStore: Send + Sync {
    fn save(&self, model: &TrainedModel) -> Result<(), ModelStoreError>;

    fn load(&self) -> Result<TrainedModel, ModelStoreError>;
}

/// File-backed store: one JSON artifact per path.
#[derive(Debug, Clone)]
pub struct FileModelStore {
    path: PathBuf,
}

impl FileModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModelStore for FileModelStore {
    fn save(&self, model: &TrainedModel) -> Result<(), ModelStoreError> {
        let artifact = serde_json::to_vec_pretty(model)?;
        fs::write(&self.path, artifact)?;
        Ok(())
    }

    fn load(&self) -> Result<TrainedModel, ModelStoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ModelStoreError::NotFound(self.path.display().to_string()));
            }
            Err(err) => return Err(ModelStoreError::Io(err)),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// In-memory store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryModelStore {
    slot: Mutex<Option<TrainedModel>>,
}

impl InMemoryModelStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelStore for InMemoryModelStore {
    fn save(&self, model: &TrainedModel) -> Result<(), ModelStoreError> {
        *self.slot.lock().expect("model store lock poisoned") = Some(model.clone());
        Ok(())
    }

    fn load(&self) -> Result<TrainedModel, ModelStoreError> {
        self.slot
            .lock()
            .expect("model store lock poisoned")
            .clone()
            .ok_or_else(|| ModelStoreError::NotFound("in-memory slot".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureVector;
    use crate::synthetic;
    use crate::trainer;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
    }

    fn trained_model() -> TrainedModel {
        trainer::fit(&synthetic::generate(300, 42, today())).unwrap()
    }

    fn probe_set() -> Vec<FeatureVector> {
        [(10.0, 5.0), (25.5, 120.0), (99.0, 700.0)]
            .into_iter()
            .map(|(price, stock)| FeatureVector::for_inference(today(), price, stock).unwrap())
            .collect()
    }

    #[test]
    fn file_round_trip_preserves_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileModelStore::new(dir.path().join("demand-model.json"));

        let model = trained_model();
        store.save(&model).unwrap();
        let loaded = store.load().unwrap();

        for probe in probe_set() {
            let a = model.predict(&probe).unwrap();
            let b = loaded.predict(&probe).unwrap();
            assert!((a - b).abs() < 1e-6, "{a} vs {b}");
        }
    }

    #[test]
    fn missing_artifact_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileModelStore::new(dir.path().join("absent.json"));
        assert!(matches!(store.load(), Err(ModelStoreError::NotFound(_))));
    }

    #[test]
    fn garbage_artifact_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, b"not a model").unwrap();

        let store = FileModelStore::new(path);
        assert!(matches!(store.load(), Err(ModelStoreError::Corrupt(_))));
    }

    #[test]
    fn in_memory_round_trip() {
        let store = InMemoryModelStore::new();
        assert!(matches!(store.load(), Err(ModelStoreError::NotFound(_))));

        let model = trained_model();
        store.save(&model).unwrap();
        assert_eq!(store.load().unwrap(), model);
    }
}
