//! Training session plumbing
//!
//! This module provides:
//! - Callback hooks and the built-in callbacks
//! - Per-hook logs
//! - Session state shared by the callbacks
//! - A reference training loop driving every hook
//!
//! # Example
//!
//! ```
//! use entrenar_callbacks::train::callback::{CallbackContainer, EarlyStopping, History};
//! use entrenar_callbacks::train::{Logs, TrainingState};
//!
//! let mut callbacks = CallbackContainer::default();
//! callbacks.add(History::new());
//! callbacks.add(EarlyStopping::new("val_loss").with_patience(3));
//!
//! let logs = Logs::new().with("val_loss", 0.25);
//! assert_eq!(logs.metric("val_loss"), Some(0.25));
//! assert!(!TrainingState::new().early_stop);
//! ```

pub mod callback;
mod logs;
mod state;
mod trainer;

pub use callback::{
    Callback, CallbackContainer, CallbackEntry, EarlyStopping, History, LRHistory,
    ModelCheckpoint,
};
pub use logs::{LogValue, Logs};
pub use state::{CallbackContext, TrainingState};
pub use trainer::{FitSummary, Trainer};
