//! Callback system for training events
//!
//! Provides fixed hooks for training loop events, each receiving the current
//! logs and a [`CallbackContext`](crate::train::CallbackContext) lending the
//! model and session state:
//! - `on_train_begin` / `on_train_end`
//! - `on_epoch_begin` / `on_epoch_end`
//! - `on_batch_begin` / `on_batch_end`
//!
//! # Example
//!
//! ```rust
//! use entrenar_callbacks::train::callback::Callback;
//! use entrenar_callbacks::train::{CallbackContext, Logs};
//! use entrenar_callbacks::Result;
//!
//! struct PrintCallback;
//!
//! impl Callback for PrintCallback {
//!     fn on_epoch_end(&mut self, epoch: usize, logs: &Logs, _ctx: &mut CallbackContext<'_>) -> Result<()> {
//!         if let Some(loss) = logs.metric("val_loss") {
//!             println!("Epoch {} finished with val_loss {:.4}", epoch, loss);
//!         }
//!         Ok(())
//!     }
//! }
//! ```

mod checkpoint;
mod container;
mod early_stopping;
mod history;
mod lr_history;
mod mode;
mod traits;

// Re-export all public types
pub use checkpoint::{ModelCheckpoint, CHECKPOINT_EXTENSION};
pub use container::{CallbackContainer, CallbackEntry, START_TIME_FORMAT};
pub use early_stopping::EarlyStopping;
pub use history::History;
pub use lr_history::LRHistory;
pub use mode::{MonitorMode, MonitorOp};
pub use traits::{Callback, Params};
