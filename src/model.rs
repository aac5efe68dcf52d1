//! Model collaborator contract
//!
//! Callbacks never own the model. The training loop lends it to every hook
//! through [`CallbackContext`](crate::train::CallbackContext).

use crate::io::StateDict;
use crate::optim::{OptimizerSet, SchedulerSet, StepLocation};
use crate::{Error, Result};

/// What callbacks need from the model being trained
pub trait Model {
    /// Copy of the full weight state
    fn state_dict(&self) -> StateDict;

    /// Replace the weight state
    fn load_state_dict(&mut self, state: &StateDict) -> Result<()>;

    /// Optimizer configuration
    fn optimizer(&self) -> &OptimizerSet;

    /// Learning-rate scheduler, if any
    fn lr_scheduler(&self) -> Option<&SchedulerSet>;

    /// Step the schedulers registered for `location`
    fn step_lr_scheduler(&mut self, location: StepLocation);
}

/// Model holding flat named parameters, an optimizer set and optional schedulers
///
/// # Example
///
/// ```
/// use entrenar_callbacks::io::StateDict;
/// use entrenar_callbacks::optim::{OptimizerSet, SchedulerSet, StepDecayLR, SGD};
/// use entrenar_callbacks::ParameterModel;
///
/// let mut weights = StateDict::new();
/// weights.insert("w", vec![0.0; 4]);
///
/// let model = ParameterModel::new(weights, OptimizerSet::single(SGD::new(["w"], 0.01)))
///     .with_scheduler(SchedulerSet::single(StepDecayLR::new(10, 0.1)));
/// ```
#[derive(Debug)]
pub struct ParameterModel {
    weights: StateDict,
    optimizer: OptimizerSet,
    lr_scheduler: Option<SchedulerSet>,
}

impl ParameterModel {
    /// Create a model without a scheduler
    pub fn new(weights: StateDict, optimizer: OptimizerSet) -> Self {
        Self {
            weights,
            optimizer,
            lr_scheduler: None,
        }
    }

    /// Attach a learning-rate scheduler
    pub fn with_scheduler(mut self, scheduler: SchedulerSet) -> Self {
        self.lr_scheduler = Some(scheduler);
        self
    }

    /// Current weights
    pub fn weights(&self) -> &StateDict {
        &self.weights
    }

    /// Mutable access to the weights
    pub fn weights_mut(&mut self) -> &mut StateDict {
        &mut self.weights
    }

    /// Apply one optimizer step with the given gradients
    pub fn apply_gradients(&mut self, grads: &StateDict) {
        self.optimizer.step(&mut self.weights, grads);
    }
}

impl Model for ParameterModel {
    fn state_dict(&self) -> StateDict {
        self.weights.clone()
    }

    fn load_state_dict(&mut self, state: &StateDict) -> Result<()> {
        let missing: Vec<String> = self
            .weights
            .names()
            .filter(|n| state.get(n).is_none())
            .map(String::from)
            .collect();
        let unexpected: Vec<String> = state
            .names()
            .filter(|n| self.weights.get(n).is_none())
            .map(String::from)
            .collect();

        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(Error::StateMismatch {
                missing,
                unexpected,
            });
        }

        self.weights = state.clone();
        Ok(())
    }

    fn optimizer(&self) -> &OptimizerSet {
        &self.optimizer
    }

    fn lr_scheduler(&self) -> Option<&SchedulerSet> {
        self.lr_scheduler.as_ref()
    }

    fn step_lr_scheduler(&mut self, location: StepLocation) {
        if let Some(scheduler) = &mut self.lr_scheduler {
            scheduler.step(location, &mut self.optimizer);
        }
    }
}
