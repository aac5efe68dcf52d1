//! Callback container for dispatching events to multiple callbacks

use super::traits::{Callback, Params};
use crate::model::Model;
use crate::train::{CallbackContext, Logs};
use crate::Result;

/// Format of the `start_time` entry injected at train begin
pub const START_TIME_FORMAT: &str = "%B %d, %Y - %I:%M%p";

/// A callback handed to [`CallbackContainer::new`]
///
/// Either a ready instance or a zero-argument factory; factories are called
/// once, when the container is built.
pub enum CallbackEntry {
    /// Pre-built callback
    Instance(Box<dyn Callback>),
    /// Zero-argument constructor
    Factory(Box<dyn FnOnce() -> Box<dyn Callback>>),
}

impl CallbackEntry {
    /// Wrap a pre-built callback
    pub fn instance<C: Callback + 'static>(callback: C) -> Self {
        Self::Instance(Box::new(callback))
    }

    /// Factory for a default-constructible callback
    pub fn of<C: Callback + Default + 'static>() -> Self {
        Self::Factory(Box::new(|| Box::new(C::default())))
    }

    fn instantiate(self) -> Box<dyn Callback> {
        match self {
            Self::Instance(cb) => cb,
            Self::Factory(make) => make(),
        }
    }
}

/// Holds callbacks and forwards every hook to each of them in registration
/// order
///
/// Dispatch is synchronous and unguarded: the first callback to return an
/// error stops the remaining ones and the error reaches the training loop.
pub struct CallbackContainer {
    callbacks: Vec<Box<dyn Callback>>,
    queue_length: usize,
}

impl CallbackContainer {
    /// Build a container, instantiating factories eagerly
    pub fn new(entries: impl IntoIterator<Item = CallbackEntry>, queue_length: usize) -> Self {
        Self {
            callbacks: entries.into_iter().map(CallbackEntry::instantiate).collect(),
            queue_length,
        }
    }

    /// Add a callback
    pub fn add<C: Callback + 'static>(&mut self, callback: C) {
        self.callbacks.push(Box::new(callback));
    }

    /// Check if no callbacks are registered
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Get number of callbacks
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Names of the registered callbacks, in dispatch order
    pub fn names(&self) -> Vec<&'static str> {
        self.callbacks.iter().map(|cb| cb.name()).collect()
    }

    /// Queue length hint given at construction
    pub fn queue_length(&self) -> usize {
        self.queue_length
    }

    /// Propagate training parameters
    pub fn set_params(&mut self, params: &Params) {
        for cb in &mut self.callbacks {
            cb.set_params(params);
        }
    }

    /// Attach every callback to the model
    pub fn set_model(&mut self, model: &dyn Model) {
        for cb in &mut self.callbacks {
            cb.set_model(model);
        }
    }

    /// Fire train begin event, adding `start_time` to the logs
    pub fn on_train_begin(
        &mut self,
        logs: Option<Logs>,
        ctx: &mut CallbackContext<'_>,
    ) -> Result<()> {
        let mut logs = logs.unwrap_or_default();
        logs.insert("start_time", current_time());
        for cb in &mut self.callbacks {
            cb.on_train_begin(&logs, ctx)?;
        }
        Ok(())
    }

    /// Fire train end event
    pub fn on_train_end(&mut self, logs: Option<Logs>, ctx: &mut CallbackContext<'_>) -> Result<()> {
        let logs = logs.unwrap_or_default();
        for cb in &mut self.callbacks {
            cb.on_train_end(&logs, ctx)?;
        }
        Ok(())
    }

    /// Fire epoch begin event
    pub fn on_epoch_begin(
        &mut self,
        epoch: usize,
        logs: Option<Logs>,
        ctx: &mut CallbackContext<'_>,
    ) -> Result<()> {
        let logs = logs.unwrap_or_default();
        for cb in &mut self.callbacks {
            cb.on_epoch_begin(epoch, &logs, ctx)?;
        }
        Ok(())
    }

    /// Fire epoch end event
    pub fn on_epoch_end(
        &mut self,
        epoch: usize,
        logs: Option<Logs>,
        ctx: &mut CallbackContext<'_>,
    ) -> Result<()> {
        let logs = logs.unwrap_or_default();
        for cb in &mut self.callbacks {
            cb.on_epoch_end(epoch, &logs, ctx)?;
        }
        Ok(())
    }

    /// Fire batch begin event
    pub fn on_batch_begin(
        &mut self,
        batch: usize,
        logs: Option<Logs>,
        ctx: &mut CallbackContext<'_>,
    ) -> Result<()> {
        let logs = logs.unwrap_or_default();
        for cb in &mut self.callbacks {
            cb.on_batch_begin(batch, &logs, ctx)?;
        }
        Ok(())
    }

    /// Fire batch end event
    pub fn on_batch_end(
        &mut self,
        batch: usize,
        logs: Option<Logs>,
        ctx: &mut CallbackContext<'_>,
    ) -> Result<()> {
        let logs = logs.unwrap_or_default();
        for cb in &mut self.callbacks {
            cb.on_batch_end(batch, &logs, ctx)?;
        }
        Ok(())
    }
}

impl Default for CallbackContainer {
    fn default() -> Self {
        Self::new(Vec::new(), 10)
    }
}

impl std::fmt::Debug for CallbackContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackContainer")
            .field("callbacks", &self.names())
            .field("queue_length", &self.queue_length)
            .finish()
    }
}

fn current_time() -> String {
    chrono::Local::now().format(START_TIME_FORMAT).to_string()
}
