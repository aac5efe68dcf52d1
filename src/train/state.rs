//! Training session state shared by all callbacks

use super::logs::LogValue;
use crate::model::Model;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mutable state of one training session
///
/// Owned by the training loop and lent to every hook. `History` fills
/// `epochs`/`history`, `LRHistory` fills `lr_history`, `EarlyStopping`
/// raises `early_stop`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingState {
    /// Indices of completed epochs
    pub epochs: Vec<usize>,
    /// Metric name to recorded values
    pub history: BTreeMap<String, Vec<LogValue>>,
    /// Learning-rate group key to recorded rates
    pub lr_history: BTreeMap<String, Vec<f32>>,
    /// Set when training should halt; polled by the loop
    pub early_stop: bool,
}

impl TrainingState {
    /// Create an empty session state
    pub fn new() -> Self {
        Self::default()
    }

    /// Numeric history of a metric
    pub fn metric_history(&self, name: &str) -> Vec<f32> {
        self.history
            .get(name)
            .map(|values| values.iter().filter_map(LogValue::as_f32).collect())
            .unwrap_or_default()
    }

    /// Export the session state as pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Context passed to every hook: the model and the session state
pub struct CallbackContext<'a> {
    /// Model being trained
    pub model: &'a mut dyn Model,
    /// Session state
    pub state: &'a mut TrainingState,
}

impl<'a> CallbackContext<'a> {
    /// Borrow a model and session state for dispatch
    pub fn new(model: &'a mut dyn Model, state: &'a mut TrainingState) -> Self {
        Self { model, state }
    }
}
