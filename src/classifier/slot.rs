use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::classifier::Classifier;
use crate::error::ModelLoadError;

/// Classifier loaded on first use and shared afterwards
pub struct ClassifierSlot {
    path: PathBuf,
    // Held across the load so concurrent first callers wait instead of loading twice
    classifier: Mutex<Option<Arc<Classifier>>>,
}

impl ClassifierSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            classifier: Mutex::new(None),
        }
    }

    /// Return the loaded classifier, loading it on the first call.
    /// Failed loads are not remembered; the next call tries again.
    pub fn get(&self) -> Result<Arc<Classifier>, ModelLoadError> {
        let mut guard = self
            .classifier
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(classifier) = guard.as_ref() {
            return Ok(classifier.clone());
        }

        debug!("First use of classifier slot {:?}", self.path);
        let classifier = Arc::new(Classifier::load(&self.path)?);
        *guard = Some(classifier.clone());
        Ok(classifier)
    }

    pub fn is_loaded(&self) -> bool {
        self.classifier
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or_else(|poisoned| poisoned.into_inner().is_some())
    }
}
