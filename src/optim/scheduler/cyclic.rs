//! Cyclic learning rate scheduler

use super::LRScheduler;

/// Triangular cyclic learning rate scheduler
///
/// The factor climbs linearly from 1 to `max_factor` over `step_size_up`
/// batches and back down over the same number, then repeats.
#[derive(Debug, Clone)]
pub struct CyclicLR {
    max_factor: f32,
    step_size_up: usize,
    current_step: usize,
}

impl CyclicLR {
    /// Create a triangular cycle peaking at `max_factor` times the base rate
    pub fn new(max_factor: f32, step_size_up: usize) -> Self {
        Self {
            max_factor,
            step_size_up,
            current_step: 0,
        }
    }
}

impl LRScheduler for CyclicLR {
    fn lr_factor(&self) -> f32 {
        if self.step_size_up == 0 {
            return 1.0;
        }
        let half = self.step_size_up as f32;
        let t = self.current_step as f32;
        let cycle = (1.0 + t / (2.0 * half)).floor();
        let x = (t / half - 2.0 * cycle + 1.0).abs();
        1.0 + (self.max_factor - 1.0) * (1.0 - x).max(0.0)
    }

    fn step(&mut self) {
        self.current_step += 1;
    }

    fn is_cyclic(&self) -> bool {
        true
    }
}
