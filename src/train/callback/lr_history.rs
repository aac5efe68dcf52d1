//! Learning-rate history callback

use super::traits::Callback;
use crate::model::Model;
use crate::optim::{Optimizer, OptimizerSet, SchedulerSet};
use crate::train::{CallbackContext, Logs, TrainingState};
use crate::{Error, Result};

/// Hook at which a named-optimizer recording happens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordPoint {
    EpochBegin,
    BatchEnd,
    EpochEnd,
}

/// Records the learning rate of every parameter group while training
///
/// Cyclic schedulers change the rate every batch and are recorded on batch
/// end; other schedulers are recorded at epoch boundaries. The epoch count is
/// needed so the final epoch end does not add a rate that was never trained
/// with.
///
/// Keys are `lr_<group>` for a single optimizer and `lr_<name>_<group>` for
/// named optimizers. Nothing is recorded when the model has no scheduler.
#[derive(Debug, Clone)]
pub struct LRHistory {
    n_epochs: usize,
}

impl LRHistory {
    /// Create callback for a run of `n_epochs` epochs
    pub fn new(n_epochs: usize) -> Self {
        Self { n_epochs }
    }

    /// Number of epochs this callback expects
    pub fn n_epochs(&self) -> usize {
        self.n_epochs
    }

    fn save_group_lr(state: &mut TrainingState, opt: &dyn Optimizer, model_name: Option<&str>) {
        for (group_idx, group) in opt.param_groups().iter().enumerate() {
            let key = match model_name {
                Some(name) => format!("lr_{name}_{group_idx}"),
                None => format!("lr_{group_idx}"),
            };
            state.lr_history.entry(key).or_default().push(group.lr);
        }
    }

    fn save_group_lr_multiple(
        state: &mut TrainingState,
        model: &dyn Model,
        schedulers: &SchedulerSet,
        point: RecordPoint,
    ) -> Result<()> {
        let OptimizerSet::Multiple(optimizers) = model.optimizer() else {
            return Err(Error::OptimizerMismatch(
                "named LR schedulers require named optimizers".to_string(),
            ));
        };

        for (name, opt) in optimizers {
            let cyclic = schedulers.is_cyclic_for(name);
            let record = match point {
                RecordPoint::EpochBegin => true,
                RecordPoint::BatchEnd => cyclic,
                RecordPoint::EpochEnd => !cyclic,
            };
            if record {
                Self::save_group_lr(state, opt.as_ref(), Some(name));
            }
        }
        Ok(())
    }

    fn single_optimizer(model: &dyn Model) -> Result<&dyn Optimizer> {
        match model.optimizer() {
            OptimizerSet::Single(opt) => Ok(opt.as_ref()),
            OptimizerSet::Multiple(_) => Err(Error::OptimizerMismatch(
                "a single LR scheduler requires a single optimizer".to_string(),
            )),
        }
    }

    /// Shared logic of epoch begin and epoch end: named sets record at
    /// `point`, a single non-cyclic scheduler records its optimizer
    fn record_epoch_boundary(ctx: &mut CallbackContext<'_>, point: RecordPoint) -> Result<()> {
        let model: &dyn Model = &*ctx.model;
        let Some(schedulers) = model.lr_scheduler() else {
            return Ok(());
        };

        if schedulers.is_multiple() {
            Self::save_group_lr_multiple(ctx.state, model, schedulers, point)
        } else if !schedulers.is_cyclic() {
            let opt = Self::single_optimizer(model)?;
            Self::save_group_lr(ctx.state, opt, None);
            Ok(())
        } else {
            Ok(())
        }
    }
}

impl Callback for LRHistory {
    fn on_epoch_begin(
        &mut self,
        epoch: usize,
        _logs: &Logs,
        ctx: &mut CallbackContext<'_>,
    ) -> Result<()> {
        if epoch != 0 || ctx.model.lr_scheduler().is_none() {
            return Ok(());
        }
        ctx.state.lr_history.clear();
        Self::record_epoch_boundary(ctx, RecordPoint::EpochBegin)
    }

    fn on_batch_end(
        &mut self,
        _batch: usize,
        _logs: &Logs,
        ctx: &mut CallbackContext<'_>,
    ) -> Result<()> {
        let model: &dyn Model = &*ctx.model;
        let Some(schedulers) = model.lr_scheduler() else {
            return Ok(());
        };

        if schedulers.is_multiple() {
            Self::save_group_lr_multiple(ctx.state, model, schedulers, RecordPoint::BatchEnd)
        } else if schedulers.is_cyclic() {
            let opt = Self::single_optimizer(model)?;
            Self::save_group_lr(ctx.state, opt, None);
            Ok(())
        } else {
            Ok(())
        }
    }

    fn on_epoch_end(
        &mut self,
        epoch: usize,
        _logs: &Logs,
        ctx: &mut CallbackContext<'_>,
    ) -> Result<()> {
        if epoch + 1 == self.n_epochs {
            return Ok(());
        }
        Self::record_epoch_boundary(ctx, RecordPoint::EpochEnd)
    }

    fn name(&self) -> &'static str {
        "LRHistory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::StateDict;
    use crate::optim::{CyclicLR, LRScheduler, ParamGroup, StepDecayLR, StepLocation, SGD};
    use crate::ParameterModel;

    fn two_group_sgd(lr: f32) -> SGD {
        SGD::with_groups(vec![
            ParamGroup::new(["w"], lr),
            ParamGroup::new(["b"], lr / 10.0),
        ])
    }

    /// Drive the hooks the way a loop would, stepping schedulers in between
    fn run(model: &mut ParameterModel, n_epochs: usize, n_batches: usize) -> TrainingState {
        let mut state = TrainingState::new();
        let mut cb = LRHistory::new(n_epochs);
        for epoch in 0..n_epochs {
            cb.on_epoch_begin(epoch, &Logs::new(), &mut CallbackContext::new(model, &mut state))
                .unwrap();
            for batch in 0..n_batches {
                model.step_lr_scheduler(StepLocation::BatchEnd);
                cb.on_batch_end(batch, &Logs::new(), &mut CallbackContext::new(model, &mut state))
                    .unwrap();
            }
            cb.on_epoch_end(epoch, &Logs::new(), &mut CallbackContext::new(model, &mut state))
                .unwrap();
            model.step_lr_scheduler(StepLocation::EpochEnd);
        }
        state
    }

    #[test]
    fn test_no_scheduler_records_nothing() {
        let mut model =
            ParameterModel::new(StateDict::new(), OptimizerSet::single(SGD::new(["w"], 0.1)));
        let state = run(&mut model, 3, 2);
        assert!(state.lr_history.is_empty());
    }

    #[test]
    fn test_non_cyclic_records_per_epoch() {
        let mut model =
            ParameterModel::new(StateDict::new(), OptimizerSet::single(two_group_sgd(1.0)))
                .with_scheduler(SchedulerSet::single(StepDecayLR::new(1, 0.5)));

        let state = run(&mut model, 3, 4);

        // epoch 0 begin, then every epoch end except the last
        assert_eq!(state.lr_history["lr_0"], vec![1.0, 1.0, 0.5]);
        assert_eq!(state.lr_history["lr_1"], vec![0.1, 0.1, 0.05]);
        assert_eq!(state.lr_history.len(), 2);
    }

    #[test]
    fn test_cyclic_records_per_batch() {
        let mut model =
            ParameterModel::new(StateDict::new(), OptimizerSet::single(SGD::new(["w"], 1.0)))
                .with_scheduler(SchedulerSet::single(CyclicLR::new(3.0, 2)));

        let state = run(&mut model, 2, 3);

        assert_eq!(state.lr_history["lr_0"].len(), 6);
        assert_eq!(state.lr_history["lr_0"][..4], [2.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_multiple_schedulers() {
        let optimizers = OptimizerSet::multiple([
            ("wide", Box::new(SGD::new(["wide.w"], 1.0)) as Box<dyn Optimizer>),
            ("deep", Box::new(two_group_sgd(1.0)) as Box<dyn Optimizer>),
            ("head", Box::new(SGD::new(["head.w"], 0.5)) as Box<dyn Optimizer>),
        ]);
        let schedulers = SchedulerSet::multiple([
            ("wide", Box::new(CyclicLR::new(2.0, 1)) as Box<dyn LRScheduler>),
            ("deep", Box::new(StepDecayLR::new(1, 0.1)) as Box<dyn LRScheduler>),
        ]);
        let mut model =
            ParameterModel::new(StateDict::new(), optimizers).with_scheduler(schedulers);

        let state = run(&mut model, 2, 2);

        // cyclic: epoch 0 begin + every batch
        assert_eq!(state.lr_history["lr_wide_0"].len(), 1 + 2 * 2);
        // non-cyclic: epoch 0 begin + epoch 0 end
        assert_eq!(state.lr_history["lr_deep_0"].len(), 2);
        assert_eq!(state.lr_history["lr_deep_1"].len(), 2);
        // no sub-scheduler counts as non-cyclic
        assert_eq!(state.lr_history["lr_head_0"], vec![0.5, 0.5]);
    }

    #[test]
    fn test_resets_on_first_epoch() {
        let mut model =
            ParameterModel::new(StateDict::new(), OptimizerSet::single(SGD::new(["w"], 1.0)))
                .with_scheduler(SchedulerSet::single(StepDecayLR::new(1, 0.5)));
        let mut state = TrainingState::new();
        state.lr_history.insert("stale".into(), vec![9.0]);

        let mut cb = LRHistory::new(5);
        cb.on_epoch_begin(0, &Logs::new(), &mut CallbackContext::new(&mut model, &mut state))
            .unwrap();
        assert!(!state.lr_history.contains_key("stale"));
        assert_eq!(state.lr_history["lr_0"], vec![1.0]);

        cb.on_epoch_begin(1, &Logs::new(), &mut CallbackContext::new(&mut model, &mut state))
            .unwrap();
        assert_eq!(state.lr_history["lr_0"], vec![1.0]);
    }

    #[test]
    fn test_shape_mismatch_is_error() {
        let mut model =
            ParameterModel::new(StateDict::new(), OptimizerSet::single(SGD::new(["w"], 1.0)))
                .with_scheduler(SchedulerSet::multiple([(
                    "wide",
                    Box::new(StepDecayLR::new(1, 0.5)) as Box<dyn LRScheduler>,
                )]));
        let mut state = TrainingState::new();

        let err = LRHistory::new(2)
            .on_epoch_begin(0, &Logs::new(), &mut CallbackContext::new(&mut model, &mut state))
            .unwrap_err();
        assert!(matches!(err, Error::OptimizerMismatch(_)));
    }
}
