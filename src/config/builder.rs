//! Build the callback container from configuration

use super::schema::{CallbacksConfig, CheckpointConfig, EarlyStoppingConfig};
use crate::error::{Error, Result};
use crate::train::callback::{
    CallbackContainer, CallbackEntry, EarlyStopping, History, LRHistory, ModelCheckpoint,
};
use std::fs;
use std::path::Path;

impl CallbacksConfig {
    /// Parse a configuration from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {e}")))
    }

    /// Load a configuration from a YAML file
    ///
    /// # Example
    ///
    /// ```no_run
    /// use entrenar_callbacks::config::CallbacksConfig;
    ///
    /// let callbacks = CallbacksConfig::from_file("callbacks.yaml")?.build()?;
    /// # Ok::<(), entrenar_callbacks::Error>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Instantiate the configured callbacks
    ///
    /// Order is fixed: History, LRHistory, ModelCheckpoint, EarlyStopping.
    pub fn build(&self) -> Result<CallbackContainer> {
        let mut entries = Vec::new();

        if self.history {
            entries.push(CallbackEntry::of::<History>());
        }
        if let Some(lr) = &self.lr_history {
            entries.push(CallbackEntry::instance(LRHistory::new(lr.n_epochs)));
        }
        if let Some(spec) = &self.checkpoint {
            entries.push(CallbackEntry::instance(build_checkpoint(spec)?));
        }
        if let Some(spec) = &self.early_stopping {
            entries.push(CallbackEntry::instance(build_early_stopping(spec)));
        }

        Ok(CallbackContainer::new(entries, self.queue_length))
    }
}

/// Build a checkpoint callback from configuration
pub fn build_checkpoint(spec: &CheckpointConfig) -> Result<ModelCheckpoint> {
    Ok(ModelCheckpoint::new(&spec.filepath)?
        .with_monitor(spec.monitor.clone())
        .with_verbose(spec.verbose)
        .save_best_only(spec.save_best_only)
        .with_mode(&spec.mode)
        .with_period(spec.period)
        .with_max_save(spec.max_save))
}

/// Build an early stopping callback from configuration
pub fn build_early_stopping(spec: &EarlyStoppingConfig) -> EarlyStopping {
    EarlyStopping::new(spec.monitor.clone())
        .with_min_delta(spec.min_delta)
        .with_patience(spec.patience)
        .with_verbose(spec.verbose)
        .with_mode(&spec.mode)
        .with_baseline(spec.baseline)
        .with_restore_best_weights(spec.restore_best_weights)
}
