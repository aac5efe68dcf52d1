//! Optimizers and learning-rate schedulers

mod optimizer;
mod scheduler;
mod sgd;

pub use optimizer::{Optimizer, OptimizerSet, ParamGroup};
pub use scheduler::{CyclicLR, LRScheduler, SchedulerSet, StepDecayLR, StepLocation};
pub use sgd::SGD;
