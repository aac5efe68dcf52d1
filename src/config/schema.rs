//! YAML schema for declaring the callback stack

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Deserialize a bool from either a YAML boolean (`true`) or a quoted string (`"true"`)
fn deserialize_bool_lenient<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Str(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::Str(s) => match s.to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected 'true' or 'false', got '{other}'"
            ))),
        },
    }
}

/// Complete callback stack specification
///
/// Every section is optional; absent sections add no callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbacksConfig {
    /// Record per-epoch metrics
    #[serde(default, deserialize_with = "deserialize_bool_lenient")]
    pub history: bool,

    /// Record per-group learning rates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lr_history: Option<LrHistoryConfig>,

    /// Save model snapshots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<CheckpointConfig>,

    /// Stop when the monitored metric plateaus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_stopping: Option<EarlyStoppingConfig>,

    /// Queue length hint for the container
    #[serde(default = "default_queue_length")]
    pub queue_length: usize,
}

impl Default for CallbacksConfig {
    fn default() -> Self {
        Self {
            history: false,
            lr_history: None,
            checkpoint: None,
            early_stopping: None,
            queue_length: default_queue_length(),
        }
    }
}

/// Learning-rate history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LrHistoryConfig {
    /// Number of epochs of the run
    pub n_epochs: usize,
}

/// Checkpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    /// Path prefix of the snapshot files, including their directory
    pub filepath: PathBuf,

    /// Quantity to monitor
    pub monitor: String,

    /// Verbosity level
    pub verbose: usize,

    /// Only save when the monitored quantity improves
    #[serde(deserialize_with = "deserialize_bool_lenient")]
    pub save_best_only: bool,

    /// `auto`, `min` or `max`; unknown values fall back to `auto`
    pub mode: String,

    /// Epochs between checkpoints
    pub period: usize,

    /// Snapshots to keep; zero or negative keeps all
    pub max_save: i64,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            filepath: PathBuf::from("checkpoints/model"),
            monitor: default_monitor(),
            verbose: 0,
            save_best_only: false,
            mode: default_mode(),
            period: 1,
            max_save: -1,
        }
    }
}

/// Early stopping settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarlyStoppingConfig {
    /// Quantity to monitor
    pub monitor: String,

    /// Minimum change counted as improvement
    pub min_delta: f32,

    /// Epochs without improvement before stopping
    pub patience: usize,

    /// Verbosity level
    pub verbose: usize,

    /// `auto`, `min` or `max`; unknown values fall back to `auto`
    pub mode: String,

    /// Value the metric has to beat
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<f32>,

    /// Roll back to the best weights when stopping
    #[serde(deserialize_with = "deserialize_bool_lenient")]
    pub restore_best_weights: bool,
}

impl Default for EarlyStoppingConfig {
    fn default() -> Self {
        Self {
            monitor: default_monitor(),
            min_delta: 0.0,
            patience: 10,
            verbose: 0,
            mode: default_mode(),
            baseline: None,
            restore_best_weights: false,
        }
    }
}

fn default_queue_length() -> usize {
    10
}

fn default_monitor() -> String {
    "val_loss".to_string()
}

fn default_mode() -> String {
    "auto".to_string()
}
