//! Step decay learning rate scheduler

use super::LRScheduler;

/// Step Decay Learning Rate Scheduler
///
/// Multiplies learning rate by gamma every step_size epochs.
///
/// Formula: lr_t = lr_initial * gamma^(floor(epoch / step_size))
#[derive(Debug, Clone)]
pub struct StepDecayLR {
    gamma: f32,
    step_size: usize,
    current_epoch: usize,
}

impl StepDecayLR {
    /// Create a new step decay scheduler
    ///
    /// # Arguments
    /// * `step_size` - Decay LR every step_size epochs
    /// * `gamma` - Multiplicative factor (e.g., 0.1 for 10x reduction)
    pub fn new(step_size: usize, gamma: f32) -> Self {
        Self {
            gamma,
            step_size,
            current_epoch: 0,
        }
    }
}

impl LRScheduler for StepDecayLR {
    fn lr_factor(&self) -> f32 {
        if self.step_size == 0 {
            return 1.0;
        }
        let num_decays = self.current_epoch / self.step_size;
        self.gamma.powi(num_decays as i32)
    }

    fn step(&mut self) {
        self.current_epoch += 1;
    }
}
