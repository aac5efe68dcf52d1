//! Optimizer trait and parameter groups

use crate::io::StateDict;
use std::collections::BTreeMap;

/// A partition of the model's parameters sharing one learning rate
#[derive(Debug, Clone, PartialEq)]
pub struct ParamGroup {
    /// Names of the parameters in this group
    pub params: Vec<String>,
    /// Learning rate the group was created with
    pub initial_lr: f32,
    /// Current learning rate
    pub lr: f32,
}

impl ParamGroup {
    /// Create a group with the given learning rate
    pub fn new<S: Into<String>>(params: impl IntoIterator<Item = S>, lr: f32) -> Self {
        Self {
            params: params.into_iter().map(Into::into).collect(),
            initial_lr: lr,
            lr,
        }
    }
}

/// Trait for optimization algorithms
///
/// Optimizers own their parameter groups; schedulers and the learning-rate
/// history read and write the per-group rates through this trait.
pub trait Optimizer: Send {
    /// Parameter groups, in registration order
    fn param_groups(&self) -> &[ParamGroup];

    /// Mutable access to the parameter groups
    fn param_groups_mut(&mut self) -> &mut [ParamGroup];

    /// Perform a single optimization step
    fn step(&mut self, weights: &mut StateDict, grads: &StateDict);

    /// Learning rate of the first group
    fn lr(&self) -> f32 {
        self.param_groups().first().map_or(0.0, |g| g.lr)
    }

    /// Set the learning rate of every group
    fn set_lr(&mut self, lr: f32) {
        for group in self.param_groups_mut() {
            group.lr = lr;
        }
    }
}

/// The optimizer configuration of a model
///
/// Wide-and-deep style models train each component with its own optimizer;
/// those are held by name.
pub enum OptimizerSet {
    /// One optimizer over all parameters
    Single(Box<dyn Optimizer>),
    /// Named optimizers, one per sub-model
    Multiple(BTreeMap<String, Box<dyn Optimizer>>),
}

impl OptimizerSet {
    /// Wrap a single optimizer
    pub fn single<O: Optimizer + 'static>(optimizer: O) -> Self {
        Self::Single(Box::new(optimizer))
    }

    /// Build a named set from `(name, optimizer)` pairs
    pub fn multiple<S, I>(optimizers: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Box<dyn Optimizer>)>,
    {
        Self::Multiple(
            optimizers
                .into_iter()
                .map(|(name, opt)| (name.into(), opt))
                .collect(),
        )
    }

    /// Apply an optimization step with every optimizer in the set
    pub fn step(&mut self, weights: &mut StateDict, grads: &StateDict) {
        match self {
            Self::Single(opt) => opt.step(weights, grads),
            Self::Multiple(opts) => {
                for opt in opts.values_mut() {
                    opt.step(weights, grads);
                }
            }
        }
    }

    /// Check if the set holds named optimizers
    pub fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple(_))
    }
}

impl std::fmt::Debug for OptimizerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(opt) => f
                .debug_tuple("Single")
                .field(&opt.param_groups())
                .finish(),
            Self::Multiple(opts) => f
                .debug_map()
                .entries(opts.iter().map(|(k, v)| (k, v.param_groups())))
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optim::SGD;

    #[test]
    fn test_param_group_new() {
        let group = ParamGroup::new(["w", "b"], 0.1);
        assert_eq!(group.params, vec!["w".to_string(), "b".to_string()]);
        assert_eq!(group.initial_lr, 0.1);
        assert_eq!(group.lr, 0.1);
    }

    #[test]
    fn test_default_lr_and_set_lr() {
        let mut opt = SGD::with_groups(vec![
            ParamGroup::new(["w"], 0.1),
            ParamGroup::new(["b"], 0.01),
        ]);
        assert_eq!(opt.lr(), 0.1);

        opt.set_lr(0.5);
        assert!(opt.param_groups().iter().all(|g| g.lr == 0.5));
        assert!(opt.param_groups().iter().all(|g| g.initial_lr != 0.5));
    }

    #[test]
    fn test_lr_without_groups_is_zero() {
        let opt = SGD::with_groups(Vec::new());
        assert_eq!(opt.lr(), 0.0);
    }

    #[test]
    fn test_optimizer_set_multiple_steps_each() {
        let mut set = OptimizerSet::multiple([
            ("wide", Box::new(SGD::new(["wide.w"], 1.0)) as Box<dyn Optimizer>),
            ("deep", Box::new(SGD::new(["deep.w"], 0.5)) as Box<dyn Optimizer>),
        ]);
        assert!(set.is_multiple());

        let mut weights: StateDict = [
            ("wide.w".to_string(), vec![1.0]),
            ("deep.w".to_string(), vec![1.0]),
        ]
        .into_iter()
        .collect();
        let grads: StateDict = [
            ("wide.w".to_string(), vec![0.5]),
            ("deep.w".to_string(), vec![0.5]),
        ]
        .into_iter()
        .collect();

        set.step(&mut weights, &grads);
        assert_eq!(weights.get("wide.w"), Some(&[0.5f32][..]));
        assert_eq!(weights.get("deep.w"), Some(&[0.75f32][..]));
    }
}
