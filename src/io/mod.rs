//! Weight-state persistence
//!
//! Checkpoints are written as SafeTensors files so they can be reloaded by
//! the same operation used for restoring a snapshot.

mod state_dict;

pub use state_dict::StateDict;
