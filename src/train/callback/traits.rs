//! Core trait for the callback system
//!
//! This module provides the foundational types for training callbacks:
//! - `Callback` - The trait all callbacks implement
//! - `Params` - Training parameters handed to callbacks before training

use crate::model::Model;
use crate::train::{CallbackContext, Logs};
use crate::Result;
use std::collections::BTreeMap;

/// Training parameters propagated through `set_params`
pub type Params = BTreeMap<String, serde_json::Value>;

/// Trait for training callbacks
///
/// Implement this trait to hook into training events. All hooks have default
/// no-op implementations, so you only need to implement the events you care
/// about. An error returned from a hook aborts dispatch and training.
pub trait Callback: Send {
    /// Receive the training parameters before training starts
    fn set_params(&mut self, _params: &Params) {}

    /// Attach to the model before training starts
    fn set_model(&mut self, _model: &dyn Model) {}

    /// Called before training starts
    fn on_train_begin(&mut self, _logs: &Logs, _ctx: &mut CallbackContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Called after training ends
    fn on_train_end(&mut self, _logs: &Logs, _ctx: &mut CallbackContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Called before each epoch
    fn on_epoch_begin(
        &mut self,
        _epoch: usize,
        _logs: &Logs,
        _ctx: &mut CallbackContext<'_>,
    ) -> Result<()> {
        Ok(())
    }

    /// Called after each epoch
    fn on_epoch_end(
        &mut self,
        _epoch: usize,
        _logs: &Logs,
        _ctx: &mut CallbackContext<'_>,
    ) -> Result<()> {
        Ok(())
    }

    /// Called before each batch
    fn on_batch_begin(
        &mut self,
        _batch: usize,
        _logs: &Logs,
        _ctx: &mut CallbackContext<'_>,
    ) -> Result<()> {
        Ok(())
    }

    /// Called after each batch
    fn on_batch_end(
        &mut self,
        _batch: usize,
        _logs: &Logs,
        _ctx: &mut CallbackContext<'_>,
    ) -> Result<()> {
        Ok(())
    }

    /// Get callback name for logging
    fn name(&self) -> &'static str {
        "Callback"
    }
}
