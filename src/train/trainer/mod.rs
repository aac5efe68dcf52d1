//! Reference training loop driving the callback hooks
//!
//! The `Trainer` owns a model, a [`CallbackContainer`](crate::train::callback::CallbackContainer)
//! and the session [`TrainingState`](crate::train::TrainingState). It calls
//! every hook at its defined point:
//! - `set_params` / `set_model` / `on_train_begin`
//! - `on_epoch_begin` with empty logs
//! - `on_batch_begin` / `on_batch_end` around each step, cyclic schedulers
//!   stepped in between
//! - `on_epoch_end` with the epoch metrics, then the early-stop flag is
//!   polled and epoch schedulers stepped
//! - `on_train_end`
//!
//! # Example
//!
//! ```
//! use entrenar_callbacks::io::StateDict;
//! use entrenar_callbacks::optim::{OptimizerSet, SGD};
//! use entrenar_callbacks::train::callback::{CallbackContainer, CallbackEntry, History};
//! use entrenar_callbacks::train::{Logs, Trainer};
//! use entrenar_callbacks::ParameterModel;
//!
//! let mut weights = StateDict::new();
//! weights.insert("w", vec![1.0]);
//! let model = ParameterModel::new(weights, OptimizerSet::single(SGD::new(["w"], 0.1)));
//! let callbacks = CallbackContainer::new([CallbackEntry::of::<History>()], 10);
//!
//! let mut trainer = Trainer::new(model, callbacks);
//! let summary = trainer
//!     .fit(3, 2, |_model, _batch| Ok(0.5), |_model| Logs::new().with("val_loss", 0.4))
//!     .unwrap();
//!
//! assert_eq!(summary.epochs_run, 3);
//! assert_eq!(trainer.state().epochs, vec![0, 1, 2]);
//! ```

mod core;
mod result;
mod train_loop;

pub use core::Trainer;
pub use result::FitSummary;
