//! Learning rate schedulers
//!
//! Provides learning rate scheduling strategies for training:
//! - `StepDecayLR` - Step decay by factor every N epochs
//! - `CyclicLR` - Triangular cycle, stepped every batch
//!
//! Schedulers scale each parameter group's initial rate, so groups created
//! with different rates keep their ratio. Whether a scheduler steps per batch
//! or per epoch is an explicit capability (`is_cyclic`), not a naming
//! convention.

mod cyclic;
mod step_decay;


pub use cyclic::CyclicLR;
pub use step_decay::StepDecayLR;

use super::{Optimizer, OptimizerSet};
use std::collections::BTreeMap;

/// Point in the training loop at which schedulers are stepped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepLocation {
    /// After every batch (cyclic schedulers)
    BatchEnd,
    /// After every epoch (non-cyclic schedulers)
    EpochEnd,
}

/// Learning rate scheduler trait
pub trait LRScheduler: Send {
    /// Current multiplier applied to each group's initial learning rate
    fn lr_factor(&self) -> f32;

    /// Advance the schedule by one step
    fn step(&mut self);

    /// Whether the rate changes every batch rather than every epoch
    fn is_cyclic(&self) -> bool {
        false
    }

    /// Point in the loop at which this scheduler is stepped
    fn step_location(&self) -> StepLocation {
        if self.is_cyclic() {
            StepLocation::BatchEnd
        } else {
            StepLocation::EpochEnd
        }
    }

    /// Write the current rate into every parameter group of an optimizer
    fn apply(&self, optimizer: &mut dyn Optimizer) {
        let factor = self.lr_factor();
        for group in optimizer.param_groups_mut() {
            group.lr = group.initial_lr * factor;
        }
    }
}

/// The scheduler configuration of a model
pub enum SchedulerSet {
    /// One scheduler driving the single optimizer
    Single(Box<dyn LRScheduler>),
    /// Sub-schedulers keyed by the name of the optimizer they drive
    Multiple(BTreeMap<String, Box<dyn LRScheduler>>),
}

impl SchedulerSet {
    /// Wrap a single scheduler
    pub fn single<S: LRScheduler + 'static>(scheduler: S) -> Self {
        Self::Single(Box::new(scheduler))
    }

    /// Build a named set from `(name, scheduler)` pairs
    pub fn multiple<S, I>(schedulers: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Box<dyn LRScheduler>)>,
    {
        Self::Multiple(
            schedulers
                .into_iter()
                .map(|(name, s)| (name.into(), s))
                .collect(),
        )
    }

    /// Check if the set holds named sub-schedulers
    pub fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple(_))
    }

    /// Whether the single scheduler is cyclic
    ///
    /// Always `false` for a named set; query [`SchedulerSet::is_cyclic_for`].
    pub fn is_cyclic(&self) -> bool {
        match self {
            Self::Single(s) => s.is_cyclic(),
            Self::Multiple(_) => false,
        }
    }

    /// Whether the sub-scheduler for `name` exists and is cyclic
    pub fn is_cyclic_for(&self, name: &str) -> bool {
        match self {
            Self::Single(_) => false,
            Self::Multiple(map) => map.get(name).is_some_and(|s| s.is_cyclic()),
        }
    }

    /// Step every scheduler registered for `location` and write the new rates
    /// into the matching optimizers
    ///
    /// A named set only drives optimizers with the same name; a single
    /// scheduler drives a single optimizer.
    pub fn step(&mut self, location: StepLocation, optimizers: &mut OptimizerSet) {
        match (self, optimizers) {
            (Self::Single(sched), OptimizerSet::Single(opt)) => {
                if sched.step_location() == location {
                    sched.step();
                    sched.apply(opt.as_mut());
                }
            }
            (Self::Multiple(scheds), OptimizerSet::Multiple(opts)) => {
                for (name, sched) in scheds.iter_mut() {
                    if sched.step_location() != location {
                        continue;
                    }
                    if let Some(opt) = opts.get_mut(name) {
                        sched.step();
                        sched.apply(opt.as_mut());
                    }
                }
            }
            (scheds, opts) => log::warn!(
                "LR scheduler shape (multiple: {}) does not match optimizer shape (multiple: {}), skipping step",
                scheds.is_multiple(),
                opts.is_multiple()
            ),
        }
    }
}

impl std::fmt::Debug for SchedulerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(s) => f
                .debug_struct("Single")
                .field("cyclic", &s.is_cyclic())
                .field("lr_factor", &s.lr_factor())
                .finish(),
            Self::Multiple(map) => f
                .debug_map()
                .entries(map.iter().map(|(k, s)| (k, s.is_cyclic())))
                .finish(),
        }
    }
}
