//! Training result types

/// Result of a training run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitSummary {
    /// Number of epochs that ran to their epoch end
    pub epochs_run: usize,
    /// Whether a callback raised the early-stop flag
    pub stopped_early: bool,
}
