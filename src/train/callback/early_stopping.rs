//! Early stopping callback to halt training when a metric plateaus

use super::mode::{MonitorMode, MonitorOp};
use super::traits::Callback;
use crate::io::StateDict;
use crate::train::{CallbackContext, Logs};
use crate::Result;

/// Early stopping callback to halt training when a metric plateaus
///
/// Monitors a metric and raises the session's `early_stop` flag if no
/// improvement larger than `min_delta` is seen for `patience` epochs. With
/// `restore_best_weights` the model is rolled back to the best epoch when
/// stopping.
///
/// # Example
///
/// ```rust
/// use entrenar_callbacks::train::callback::EarlyStopping;
///
/// // Stop if val_loss has not improved by 0.001 for 5 epochs
/// let early_stop = EarlyStopping::new("val_loss")
///     .with_patience(5)
///     .with_min_delta(0.001)
///     .with_restore_best_weights(true);
/// ```
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    /// Monitored metric
    monitor: String,
    /// Minimum improvement, sign-adjusted to the favourable direction
    min_delta: f32,
    /// Number of epochs to wait for improvement
    patience: usize,
    /// Verbosity level
    verbose: usize,
    /// Comparison mode
    mode: MonitorMode,
    /// Value the metric must beat from the start
    baseline: Option<f32>,
    /// Whether to roll back to the best weights on stop
    restore_best_weights: bool,
    monitor_op: MonitorOp,
    /// Epochs without improvement
    pub(crate) wait: usize,
    pub(crate) stopped_epoch: Option<usize>,
    pub(crate) best: f32,
    best_state: Option<StateDict>,
}

impl EarlyStopping {
    /// Create early stopping monitoring `monitor` with default settings
    pub fn new(monitor: impl Into<String>) -> Self {
        let mut es = Self {
            monitor: monitor.into(),
            min_delta: 0.0,
            patience: 10,
            verbose: 0,
            mode: MonitorMode::Auto,
            baseline: None,
            restore_best_weights: false,
            monitor_op: MonitorOp::Less,
            wait: 0,
            stopped_epoch: None,
            best: f32::INFINITY,
            best_state: None,
        };
        es.resolve_monitor_op();
        es
    }

    /// Configure the minimum improvement
    pub fn with_min_delta(mut self, min_delta: f32) -> Self {
        self.min_delta = min_delta.abs();
        self.resolve_monitor_op();
        self
    }

    /// Configure the number of epochs to wait
    pub fn with_patience(mut self, patience: usize) -> Self {
        self.patience = patience;
        self
    }

    /// Configure verbosity
    pub fn with_verbose(mut self, verbose: usize) -> Self {
        self.verbose = verbose;
        self
    }

    /// Configure the comparison mode (`min`, `max` or `auto`)
    ///
    /// Unknown modes fall back to `auto` with a warning.
    pub fn with_mode(mut self, mode: &str) -> Self {
        self.mode = MonitorMode::parse_lenient(mode, "EarlyStopping");
        self.resolve_monitor_op();
        self
    }

    /// Configure a baseline the metric has to beat
    pub fn with_baseline(mut self, baseline: Option<f32>) -> Self {
        self.baseline = baseline;
        self.reset();
        self
    }

    /// Configure to restore best weights on stop
    pub fn with_restore_best_weights(mut self, restore: bool) -> Self {
        self.restore_best_weights = restore;
        self
    }

    /// Comparison used for the monitored metric
    pub fn monitor_op(&self) -> MonitorOp {
        self.monitor_op
    }

    /// Sign-adjusted minimum delta
    pub fn min_delta(&self) -> f32 {
        self.min_delta
    }

    /// Best monitored value seen so far
    pub fn best(&self) -> f32 {
        self.best
    }

    /// Epoch at which training was stopped, if it was
    pub fn stopped_epoch(&self) -> Option<usize> {
        self.stopped_epoch
    }

    /// Reset internal state
    pub fn reset(&mut self) {
        self.wait = 0;
        self.stopped_epoch = None;
        self.best = self.baseline.unwrap_or_else(|| self.monitor_op.worst());
        self.best_state = None;
    }

    fn resolve_monitor_op(&mut self) {
        self.monitor_op = MonitorOp::resolve(self.mode, self.monitor.contains("acc"));
        self.min_delta = match self.monitor_op {
            MonitorOp::Greater => self.min_delta.abs(),
            MonitorOp::Less => -self.min_delta.abs(),
        };
        self.reset();
    }

    fn monitor_value(&self, logs: &Logs) -> Option<f32> {
        let value = logs.metric(&self.monitor);
        if value.is_none() {
            log::warn!(
                "Early stopping conditioned on metric `{}` which is not available. Available metrics are: {}",
                self.monitor,
                logs.keys().collect::<Vec<_>>().join(",")
            );
        }
        value
    }
}

impl Default for EarlyStopping {
    fn default() -> Self {
        Self::new("val_loss")
    }
}

impl Callback for EarlyStopping {
    fn on_train_begin(&mut self, _logs: &Logs, _ctx: &mut CallbackContext<'_>) -> Result<()> {
        self.reset();
        Ok(())
    }

    fn on_epoch_end(&mut self, epoch: usize, logs: &Logs, ctx: &mut CallbackContext<'_>) -> Result<()> {
        let Some(current) = self.monitor_value(logs) else {
            return Ok(());
        };

        if self.monitor_op.improved(current - self.min_delta, self.best) {
            self.best = current;
            self.wait = 0;
            if self.restore_best_weights {
                self.best_state = Some(ctx.model.state_dict());
            }
            return Ok(());
        }

        self.wait += 1;
        if self.wait < self.patience {
            return Ok(());
        }

        self.stopped_epoch = Some(epoch);
        ctx.state.early_stop = true;

        if self.restore_best_weights {
            match &self.best_state {
                Some(state) => {
                    if self.verbose > 0 {
                        log::info!("Restoring model weights from the end of the best epoch");
                    }
                    ctx.model.load_state_dict(state)?;
                }
                None => log::warn!(
                    "No improvement of {} was recorded, keeping current weights",
                    self.monitor
                ),
            }
        }
        Ok(())
    }

    fn on_train_end(&mut self, _logs: &Logs, _ctx: &mut CallbackContext<'_>) -> Result<()> {
        if let Some(epoch) = self.stopped_epoch {
            if self.verbose > 0 {
                log::info!("Epoch {:05}: early stopping", epoch + 1);
            } else {
                log::debug!("Epoch {:05}: early stopping", epoch + 1);
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "EarlyStopping"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use crate::optim::{OptimizerSet, SGD};
    use crate::train::TrainingState;
    use crate::ParameterModel;

    fn model() -> ParameterModel {
        let mut weights = StateDict::new();
        weights.insert("w", vec![0.0]);
        ParameterModel::new(weights, OptimizerSet::single(SGD::new(["w"], 0.1)))
    }

    /// Feed `values` epoch by epoch, returning the epoch at which the flag rose
    fn run(es: &mut EarlyStopping, values: &[f32]) -> Option<usize> {
        let mut model = model();
        let mut state = TrainingState::new();
        let mut ctx = CallbackContext::new(&mut model, &mut state);
        es.on_train_begin(&Logs::new(), &mut ctx).unwrap();
        for (epoch, v) in values.iter().enumerate() {
            es.on_epoch_end(epoch, &Logs::new().with("val_loss", *v), &mut ctx)
                .unwrap();
            if ctx.state.early_stop {
                return Some(epoch);
            }
        }
        None
    }

    #[test]
    fn test_stops_after_patience() {
        let mut es = EarlyStopping::new("val_loss").with_patience(2).with_mode("min");
        assert_eq!(run(&mut es, &[1.0, 1.0, 1.0, 1.0]), Some(2));
        assert_eq!(es.stopped_epoch(), Some(2));
        assert_eq!(es.wait, 2);
    }

    #[test]
    fn test_improvement_resets_wait() {
        let mut es = EarlyStopping::new("val_loss").with_patience(2);
        assert_eq!(run(&mut es, &[1.0, 1.0, 0.5, 0.5]), None);
        assert_eq!(es.wait, 1);
        assert_eq!(es.best(), 0.5);
    }

    #[test]
    fn test_min_delta_requires_margin() {
        let mut es = EarlyStopping::new("val_loss")
            .with_patience(2)
            .with_min_delta(0.1);
        // 0.95 is not 0.1 better than 1.0
        assert_eq!(run(&mut es, &[1.0, 0.95, 0.92]), Some(2));
        assert_eq!(es.best(), 1.0);
    }

    #[test]
    fn test_min_delta_sign_follows_direction() {
        let es = EarlyStopping::new("val_loss").with_min_delta(0.1);
        assert_eq!(es.min_delta(), -0.1);

        let es = EarlyStopping::new("val_acc").with_min_delta(0.1);
        assert_eq!(es.monitor_op(), MonitorOp::Greater);
        assert_eq!(es.min_delta(), 0.1);

        let es = EarlyStopping::new("val_acc").with_min_delta(0.1).with_mode("min");
        assert_eq!(es.min_delta(), -0.1);
    }

    #[test]
    fn test_fmeasure_is_not_special_cased() {
        let es = EarlyStopping::new("fmeasure");
        assert_eq!(es.monitor_op(), MonitorOp::Less);
    }

    #[test]
    fn test_baseline_must_be_beaten() {
        let mut es = EarlyStopping::new("val_loss")
            .with_patience(2)
            .with_baseline(Some(0.5));
        assert_eq!(run(&mut es, &[0.8, 0.7]), Some(1));
        assert_eq!(es.best(), 0.5);
    }

    #[test]
    fn test_missing_metric_does_not_advance() {
        let mut model = model();
        let mut state = TrainingState::new();
        let mut ctx = CallbackContext::new(&mut model, &mut state);
        let mut es = EarlyStopping::new("val_loss").with_patience(1);

        es.on_train_begin(&Logs::new(), &mut ctx).unwrap();
        for epoch in 0..3 {
            es.on_epoch_end(epoch, &Logs::new().with("train_loss", 1.0), &mut ctx)
                .unwrap();
        }
        assert_eq!(es.wait, 0);
        assert!(!state.early_stop);
    }

    #[test]
    fn test_restore_best_weights() {
        let mut model = model();
        let mut state = TrainingState::new();
        let mut es = EarlyStopping::new("val_loss")
            .with_patience(1)
            .with_restore_best_weights(true);

        let values = [0.5, 0.9];
        es.on_train_begin(&Logs::new(), &mut CallbackContext::new(&mut model, &mut state))
            .unwrap();
        for (epoch, v) in values.iter().enumerate() {
            model.weights_mut().get_mut("w").unwrap()[0] = epoch as f32 + 1.0;
            es.on_epoch_end(
                epoch,
                &Logs::new().with("val_loss", *v),
                &mut CallbackContext::new(&mut model, &mut state),
            )
            .unwrap();
        }

        assert!(state.early_stop);
        assert_eq!(model.state_dict().get("w"), Some(&[1.0f32][..]));
    }

    #[test]
    fn test_restore_without_snapshot_keeps_weights() {
        let mut model = model();
        let mut state = TrainingState::new();
        let mut es = EarlyStopping::new("val_loss")
            .with_patience(1)
            .with_baseline(Some(0.1))
            .with_restore_best_weights(true);

        model.weights_mut().get_mut("w").unwrap()[0] = 7.0;
        let mut ctx = CallbackContext::new(&mut model, &mut state);
        es.on_train_begin(&Logs::new(), &mut ctx).unwrap();
        es.on_epoch_end(0, &Logs::new().with("val_loss", 0.5), &mut ctx)
            .unwrap();

        assert!(state.early_stop);
        assert_eq!(model.state_dict().get("w"), Some(&[7.0f32][..]));
    }

    #[test]
    fn test_train_begin_resets_state() {
        let mut es = EarlyStopping::new("val_loss").with_patience(1);
        assert_eq!(run(&mut es, &[1.0, 1.0]), Some(1));

        let mut model = model();
        let mut state = TrainingState::new();
        es.on_train_begin(&Logs::new(), &mut CallbackContext::new(&mut model, &mut state))
            .unwrap();
        assert_eq!(es.wait, 0);
        assert_eq!(es.stopped_epoch(), None);
        assert_eq!(es.best(), f32::INFINITY);
    }

    #[test]
    fn test_stop_at_first_epoch_is_reported() {
        let mut es = EarlyStopping::new("val_loss")
            .with_patience(1)
            .with_baseline(Some(0.0));
        assert_eq!(run(&mut es, &[1.0]), Some(0));
        assert_eq!(es.stopped_epoch(), Some(0));
    }

    #[test]
    fn test_default() {
        let es = EarlyStopping::default();
        assert_eq!(es.patience, 10);
        assert_eq!(es.monitor, "val_loss");
        assert_eq!(es.name(), "EarlyStopping");
    }
}
