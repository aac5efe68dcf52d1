//! Core Trainer struct and basic methods

use crate::model::Model;
use crate::train::callback::{Callback, CallbackContainer};
use crate::train::{CallbackContext, TrainingState};

/// Training loop owning a model, its callbacks and the session state
pub struct Trainer<M: Model> {
    /// Model being trained
    pub(crate) model: M,

    /// Registered callbacks
    pub(crate) callbacks: CallbackContainer,

    /// Session state written by the callbacks
    pub(crate) state: TrainingState,
}

impl<M: Model> Trainer<M> {
    /// Create a new trainer
    pub fn new(model: M, callbacks: CallbackContainer) -> Self {
        Self {
            model,
            callbacks,
            state: TrainingState::new(),
        }
    }

    /// Add a callback to the trainer
    pub fn add_callback<C: Callback + 'static>(&mut self, callback: C) {
        self.callbacks.add(callback);
    }

    /// Model being trained
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the model
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Consume the trainer, returning the model
    pub fn into_model(self) -> M {
        self.model
    }

    /// Session state of the last run
    pub fn state(&self) -> &TrainingState {
        &self.state
    }

    /// Registered callbacks
    pub fn callbacks(&self) -> &CallbackContainer {
        &self.callbacks
    }

    /// Split borrow of the model and session state for dispatch
    pub(crate) fn context<'a>(
        model: &'a mut M,
        state: &'a mut TrainingState,
    ) -> CallbackContext<'a> {
        CallbackContext::new(model, state)
    }
}

impl<M: Model + std::fmt::Debug> std::fmt::Debug for Trainer<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trainer")
            .field("model", &self.model)
            .field("callbacks", &self.callbacks)
            .field("state", &self.state)
            .finish()
    }
}
