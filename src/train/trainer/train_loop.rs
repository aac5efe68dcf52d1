//! Multi-epoch training loop

use super::core::Trainer;
use super::result::FitSummary;
use crate::model::Model;
use crate::optim::StepLocation;
use crate::train::callback::Params;
use crate::train::Logs;
use crate::Result;

impl<M: Model> Trainer<M> {
    /// Train for `n_epochs` epochs of `batches_per_epoch` steps each
    ///
    /// # Arguments
    ///
    /// * `n_epochs` - Maximum number of epochs to train
    /// * `batches_per_epoch` - Steps per epoch
    /// * `step_fn` - Runs one step on the model and returns the batch loss
    /// * `eval_fn` - Computes end-of-epoch metrics such as `val_loss`
    ///
    /// Batch-end logs carry `loss`, the running mean of the epoch. Epoch-end
    /// logs carry the metrics of `eval_fn` plus `train_loss`. Training stops
    /// after the first epoch end that leaves `early_stop` set.
    ///
    /// The first error returned by a step or a callback aborts the run.
    pub fn fit<S, E>(
        &mut self,
        n_epochs: usize,
        batches_per_epoch: usize,
        mut step_fn: S,
        mut eval_fn: E,
    ) -> Result<FitSummary>
    where
        S: FnMut(&mut M, usize) -> Result<f32>,
        E: FnMut(&M) -> Logs,
    {
        let mut params = Params::new();
        params.insert("n_epochs".to_string(), n_epochs.into());
        params.insert("batches_per_epoch".to_string(), batches_per_epoch.into());
        self.callbacks.set_params(&params);
        self.callbacks.set_model(&self.model);

        let Self {
            model,
            callbacks,
            state,
        } = self;
        state.early_stop = false;

        callbacks.on_train_begin(None, &mut Self::context(model, state))?;

        let mut summary = FitSummary {
            epochs_run: 0,
            stopped_early: false,
        };

        for epoch in 0..n_epochs {
            callbacks.on_epoch_begin(epoch, None, &mut Self::context(model, state))?;

            let mut total_loss = 0.0;
            for batch in 0..batches_per_epoch {
                callbacks.on_batch_begin(batch, None, &mut Self::context(model, state))?;

                total_loss += step_fn(&mut *model, batch)?;
                model.step_lr_scheduler(StepLocation::BatchEnd);

                let logs = Logs::new().with("loss", total_loss / (batch + 1) as f32);
                callbacks.on_batch_end(batch, Some(logs), &mut Self::context(model, state))?;
            }

            let mut logs = eval_fn(&*model);
            if batches_per_epoch > 0 {
                logs.insert("train_loss", total_loss / batches_per_epoch as f32);
            }
            callbacks.on_epoch_end(epoch, Some(logs), &mut Self::context(model, state))?;
            summary.epochs_run += 1;

            if state.early_stop {
                log::debug!("Early stop requested at epoch {epoch}");
                summary.stopped_early = true;
                break;
            }
            model.step_lr_scheduler(StepLocation::EpochEnd);
        }

        callbacks.on_train_end(None, &mut Self::context(model, state))?;
        Ok(summary)
    }
}
