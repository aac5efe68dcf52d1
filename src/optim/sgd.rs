//! Stochastic Gradient Descent optimizer

use super::{Optimizer, ParamGroup};
use crate::io::StateDict;

/// SGD optimizer over one or more parameter groups
///
/// Update rule: `w = w - lr_group * g` for every parameter in a group.
#[derive(Debug, Clone)]
pub struct SGD {
    groups: Vec<ParamGroup>,
}

impl SGD {
    /// Create an SGD optimizer with a single group
    pub fn new<S: Into<String>>(params: impl IntoIterator<Item = S>, lr: f32) -> Self {
        Self {
            groups: vec![ParamGroup::new(params, lr)],
        }
    }

    /// Create an SGD optimizer from explicit groups
    pub fn with_groups(groups: Vec<ParamGroup>) -> Self {
        Self { groups }
    }
}

impl Optimizer for SGD {
    fn param_groups(&self) -> &[ParamGroup] {
        &self.groups
    }

    fn param_groups_mut(&mut self) -> &mut [ParamGroup] {
        &mut self.groups
    }

    fn step(&mut self, weights: &mut StateDict, grads: &StateDict) {
        for group in &self.groups {
            for name in &group.params {
                let (Some(param), Some(grad)) = (weights.get_mut(name), grads.get(name)) else {
                    continue;
                };
                for (w, g) in param.iter_mut().zip(grad) {
                    *w -= group.lr * g;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sgd_step_per_group_lr() {
        let mut opt = SGD::with_groups(vec![
            ParamGroup::new(["w"], 0.1),
            ParamGroup::new(["b"], 1.0),
        ]);

        let mut weights: StateDict = [
            ("w".to_string(), vec![1.0, 2.0]),
            ("b".to_string(), vec![0.5]),
        ]
        .into_iter()
        .collect();
        let grads: StateDict = [
            ("w".to_string(), vec![1.0, 1.0]),
            ("b".to_string(), vec![0.25]),
        ]
        .into_iter()
        .collect();

        opt.step(&mut weights, &grads);

        let w = weights.get("w").unwrap();
        assert_relative_eq!(w[0], 0.9);
        assert_relative_eq!(w[1], 1.9);
        assert_relative_eq!(weights.get("b").unwrap()[0], 0.25);
    }

    #[test]
    fn test_sgd_skips_params_without_grad() {
        let mut opt = SGD::new(["w", "frozen"], 0.1);
        let mut weights: StateDict = [
            ("w".to_string(), vec![1.0]),
            ("frozen".to_string(), vec![3.0]),
        ]
        .into_iter()
        .collect();
        let grads: StateDict = [("w".to_string(), vec![1.0])].into_iter().collect();

        opt.step(&mut weights, &grads);
        assert_relative_eq!(weights.get("w").unwrap()[0], 0.9);
        assert_eq!(weights.get("frozen"), Some(&[3.0f32][..]));
    }
}
