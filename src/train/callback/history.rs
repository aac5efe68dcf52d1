//! History callback recording per-epoch metrics

use super::traits::Callback;
use crate::train::{CallbackContext, Logs};
use crate::Result;

/// Records the loop's logs into the session history
///
/// The log mapping is appended on both epoch begin and epoch end, so a key
/// present at both boundaries gets two entries per epoch. Epoch indices are
/// appended once, on epoch end.
///
/// # Example
///
/// ```
/// use entrenar_callbacks::train::callback::{CallbackContainer, CallbackEntry, History};
///
/// let container = CallbackContainer::new([CallbackEntry::of::<History>()], 10);
/// assert_eq!(container.names(), vec!["History"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct History;

impl History {
    /// Create history callback
    pub fn new() -> Self {
        Self
    }

    fn record(logs: &Logs, ctx: &mut CallbackContext<'_>) {
        for (key, value) in logs.iter() {
            ctx.state
                .history
                .entry(key.to_string())
                .or_default()
                .push(value.clone());
        }
    }
}

impl Callback for History {
    fn on_train_begin(&mut self, _logs: &Logs, ctx: &mut CallbackContext<'_>) -> Result<()> {
        ctx.state.epochs.clear();
        ctx.state.history.clear();
        Ok(())
    }

    fn on_epoch_begin(
        &mut self,
        _epoch: usize,
        logs: &Logs,
        ctx: &mut CallbackContext<'_>,
    ) -> Result<()> {
        Self::record(logs, ctx);
        Ok(())
    }

    fn on_epoch_end(&mut self, epoch: usize, logs: &Logs, ctx: &mut CallbackContext<'_>) -> Result<()> {
        ctx.state.epochs.push(epoch);
        Self::record(logs, ctx);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "History"
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::io::StateDict;
    use crate::optim::{OptimizerSet, SGD};
    use crate::train::TrainingState;
    use crate::ParameterModel;
    use proptest::prelude::*;

    proptest! {
        /// Epoch list is 0..N and each key is recorded twice per epoch it appears in
        #[test]
        fn history_lengths_follow_double_recording(
            present in proptest::collection::vec(any::<bool>(), 1..12),
        ) {
            let mut model = ParameterModel::new(StateDict::new(), OptimizerSet::single(SGD::new(["w"], 0.1)));
            let mut state = TrainingState::new();
            let mut ctx = CallbackContext::new(&mut model, &mut state);
            let mut history = History::new();

            history.on_train_begin(&Logs::new(), &mut ctx).unwrap();
            for (epoch, has_metric) in present.iter().enumerate() {
                let mut logs = Logs::new().with("train_loss", epoch as f32);
                if *has_metric {
                    logs.insert("val_loss", epoch as f32);
                }
                history.on_epoch_begin(epoch, &logs, &mut ctx).unwrap();
                history.on_epoch_end(epoch, &logs, &mut ctx).unwrap();
            }

            let n = present.len();
            let with_val = present.iter().filter(|p| **p).count();
            prop_assert_eq!(&state.epochs, &(0..n).collect::<Vec<_>>());
            prop_assert_eq!(state.history["train_loss"].len(), 2 * n);
            prop_assert_eq!(
                state.history.get("val_loss").map_or(0, Vec::len),
                2 * with_val
            );
        }
    }
}
