//! Declarative configuration of the callback stack
//!
//! # Example
//!
//! ```
//! use entrenar_callbacks::config::CallbacksConfig;
//!
//! let yaml = r"
//! history: true
//! lr_history:
//!   n_epochs: 20
//! early_stopping:
//!   monitor: val_loss
//!   patience: 5
//! ";
//!
//! let callbacks = CallbacksConfig::from_yaml_str(yaml)?.build()?;
//! assert_eq!(callbacks.names(), vec!["History", "LRHistory", "EarlyStopping"]);
//! # Ok::<(), entrenar_callbacks::Error>(())
//! ```

mod builder;
mod schema;

pub use builder::{build_checkpoint, build_early_stopping};
pub use schema::{CallbacksConfig, CheckpointConfig, EarlyStoppingConfig, LrHistoryConfig};
