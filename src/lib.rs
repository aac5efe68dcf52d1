//! Entrenar callbacks: auxiliary behaviours for an opaque training loop
//!
//! A training loop calls fixed hooks (train, epoch and batch begin/end) on a
//! [`CallbackContainer`](train::callback::CallbackContainer), which forwards
//! each to its callbacks in registration order. Built-in callbacks:
//!
//! - [`History`](train::History) records per-epoch metrics
//! - [`LRHistory`](train::LRHistory) records per-group learning rates,
//!   including named multi-optimizer setups
//! - [`ModelCheckpoint`](train::ModelCheckpoint) snapshots the weights,
//!   optionally only on improvement and with a cap on retained files
//! - [`EarlyStopping`](train::EarlyStopping) halts training once a metric
//!   plateaus, optionally restoring the best weights
//!
//! Hooks receive a [`CallbackContext`](train::CallbackContext) lending the
//! [`Model`] and the session [`TrainingState`](train::TrainingState).
//!
//! # Example
//!
//! ```no_run
//! use entrenar_callbacks::io::StateDict;
//! use entrenar_callbacks::optim::{OptimizerSet, SchedulerSet, StepDecayLR, SGD};
//! use entrenar_callbacks::train::callback::{
//!     CallbackContainer, CallbackEntry, EarlyStopping, History, LRHistory, ModelCheckpoint,
//! };
//! use entrenar_callbacks::train::{Logs, Trainer};
//! use entrenar_callbacks::ParameterModel;
//!
//! let mut weights = StateDict::new();
//! weights.insert("w", vec![1.0; 8]);
//! let model = ParameterModel::new(weights, OptimizerSet::single(SGD::new(["w"], 0.1)))
//!     .with_scheduler(SchedulerSet::single(StepDecayLR::new(5, 0.5)));
//!
//! let callbacks = CallbackContainer::new(
//!     [
//!         CallbackEntry::of::<History>(),
//!         CallbackEntry::instance(LRHistory::new(20)),
//!         CallbackEntry::instance(ModelCheckpoint::new("checkpoints/model")?.save_best_only(true)),
//!         CallbackEntry::instance(EarlyStopping::new("val_loss").with_patience(3)),
//!     ],
//!     10,
//! );
//!
//! let mut trainer = Trainer::new(model, callbacks);
//! let summary = trainer.fit(20, 10, |_model, _batch| Ok(0.1), |_model| Logs::new().with("val_loss", 0.2))?;
//! println!("ran {} epochs", summary.epochs_run);
//! # Ok::<(), entrenar_callbacks::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod io;
mod model;
pub mod optim;
pub mod train;

pub use error::{Error, Result};
pub use model::{Model, ParameterModel};
pub use train::callback::{
    Callback, CallbackContainer, CallbackEntry, EarlyStopping, History, LRHistory,
    ModelCheckpoint,
};
pub use train::{CallbackContext, FitSummary, LogValue, Logs, Trainer, TrainingState};
