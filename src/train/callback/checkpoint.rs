//! Checkpoint callback for saving model state periodically

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use super::mode::{MonitorMode, MonitorOp};
use super::traits::Callback;
use crate::train::{CallbackContext, Logs};
use crate::{Error, Result};

/// File extension of checkpoint snapshots
pub const CHECKPOINT_EXTENSION: &str = "safetensors";

/// Checkpoint callback to save model weights every `period` epochs
///
/// Files are named `<filepath>_<epoch + 1>.safetensors`. With
/// `save_best_only` a snapshot is only written when the monitored quantity
/// improves; with `max_save` only the newest snapshots are kept on disk.
///
/// # Example
///
/// ```no_run
/// use entrenar_callbacks::train::callback::ModelCheckpoint;
///
/// let checkpoint = ModelCheckpoint::new("checkpoints/weights_out")?
///     .with_monitor("val_loss")
///     .save_best_only(true)
///     .with_max_save(3);
/// # Ok::<(), entrenar_callbacks::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ModelCheckpoint {
    /// Path prefix of the snapshot files
    filepath: PathBuf,
    /// Monitored metric
    monitor: String,
    /// Verbosity level
    verbose: usize,
    /// Only save when the monitored metric improves
    save_best_only: bool,
    /// Comparison mode
    mode: MonitorMode,
    /// Save every N epochs
    period: usize,
    /// Maximum snapshots kept on disk (None = unlimited)
    max_save: Option<usize>,
    pub(crate) epochs_since_last_save: usize,
    monitor_op: MonitorOp,
    pub(crate) best: f32,
    pub(crate) old_files: VecDeque<PathBuf>,
}

impl ModelCheckpoint {
    /// Create checkpoint callback writing to `filepath` prefixed files
    ///
    /// The prefix must contain a directory component, which is created if
    /// missing.
    pub fn new(filepath: impl Into<PathBuf>) -> Result<Self> {
        let filepath = filepath.into();

        let root_dir = filepath
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or_else(|| Error::InvalidFilepath {
                path: filepath.clone(),
            })?;
        std::fs::create_dir_all(root_dir)
            .map_err(|e| Error::io(format!("creating {}", root_dir.display()), e))?;

        let mut checkpoint = Self {
            filepath,
            monitor: "val_loss".to_string(),
            verbose: 0,
            save_best_only: false,
            mode: MonitorMode::Auto,
            period: 1,
            max_save: None,
            epochs_since_last_save: 0,
            monitor_op: MonitorOp::Less,
            best: f32::INFINITY,
            old_files: VecDeque::new(),
        };
        checkpoint.resolve_monitor_op();
        Ok(checkpoint)
    }

    /// Configure the monitored metric
    pub fn with_monitor(mut self, monitor: impl Into<String>) -> Self {
        self.monitor = monitor.into();
        self.resolve_monitor_op();
        self
    }

    /// Configure the comparison mode (`min`, `max` or `auto`)
    ///
    /// Unknown modes fall back to `auto` with a warning.
    pub fn with_mode(mut self, mode: &str) -> Self {
        self.mode = MonitorMode::parse_lenient(mode, "ModelCheckpoint");
        self.resolve_monitor_op();
        self
    }

    /// Configure to only save on improvement
    pub fn save_best_only(mut self, save_best_only: bool) -> Self {
        self.save_best_only = save_best_only;
        self
    }

    /// Configure to save every N epochs
    pub fn with_period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }

    /// Configure how many snapshots to keep; non-positive keeps all
    pub fn with_max_save(mut self, max_save: i64) -> Self {
        self.max_save = usize::try_from(max_save).ok().filter(|&n| n > 0);
        self
    }

    /// Configure verbosity
    pub fn with_verbose(mut self, verbose: usize) -> Self {
        self.verbose = verbose;
        self
    }

    /// Snapshot path for a 0-based epoch
    pub fn checkpoint_path(&self, epoch: usize) -> PathBuf {
        let mut name = self.filepath.clone().into_os_string();
        name.push(format!("_{}.{CHECKPOINT_EXTENSION}", epoch + 1));
        PathBuf::from(name)
    }

    /// Best monitored value seen so far
    pub fn best(&self) -> f32 {
        self.best
    }

    /// Comparison used for the monitored metric
    pub fn monitor_op(&self) -> MonitorOp {
        self.monitor_op
    }

    /// Snapshots currently retained under `max_save`, oldest first
    pub fn retained(&self) -> impl Iterator<Item = &Path> {
        self.old_files.iter().map(PathBuf::as_path)
    }

    fn resolve_monitor_op(&mut self) {
        let is_higher_better = self.monitor.contains("acc") || self.monitor.starts_with("fmeasure");
        self.monitor_op = MonitorOp::resolve(self.mode, is_higher_better);
        self.best = self.monitor_op.worst();
    }

    fn save(&mut self, path: PathBuf, ctx: &mut CallbackContext<'_>) -> Result<()> {
        if let Some(max_save) = self.max_save {
            // a rerun overwrites its own earlier snapshot in place
            self.old_files.retain(|old| old != &path);
            while self.old_files.len() >= max_save {
                match self.old_files.pop_front() {
                    Some(oldest) => remove_snapshot(&oldest)?,
                    None => break,
                }
            }
        }

        ctx.model.state_dict().save(&path)?;

        if self.max_save.is_some() {
            self.old_files.push_back(path);
        }
        Ok(())
    }

    fn verbose_log(&self, message: String) {
        if self.verbose > 0 {
            log::info!("{message}");
        } else {
            log::debug!("{message}");
        }
    }
}

fn remove_snapshot(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("Checkpoint {} already removed, skipping", path.display());
            Ok(())
        }
        Err(e) => Err(Error::io(format!("removing {}", path.display()), e)),
    }
}

impl Callback for ModelCheckpoint {
    fn on_train_begin(&mut self, _logs: &Logs, _ctx: &mut CallbackContext<'_>) -> Result<()> {
        self.best = self.monitor_op.worst();
        self.epochs_since_last_save = 0;
        Ok(())
    }

    fn on_epoch_end(&mut self, epoch: usize, logs: &Logs, ctx: &mut CallbackContext<'_>) -> Result<()> {
        self.epochs_since_last_save += 1;
        if self.epochs_since_last_save < self.period {
            return Ok(());
        }
        self.epochs_since_last_save = 0;
        let filepath = self.checkpoint_path(epoch);

        if !self.save_best_only {
            self.verbose_log(format!(
                "Epoch {:05}: saving model to {}",
                epoch + 1,
                filepath.display()
            ));
            return self.save(filepath, ctx);
        }

        let Some(current) = logs.metric(&self.monitor) else {
            log::warn!(
                "Can save best model only with {} available, skipping.",
                self.monitor
            );
            return Ok(());
        };

        if self.monitor_op.improved(current, self.best) {
            self.verbose_log(format!(
                "Epoch {:05}: {} improved from {:.5} to {:.5}, saving model to {}",
                epoch + 1,
                self.monitor,
                self.best,
                current,
                filepath.display()
            ));
            self.best = current;
            self.save(filepath, ctx)
        } else {
            self.verbose_log(format!(
                "Epoch {:05}: {} did not improve from {:.5}",
                epoch + 1,
                self.monitor,
                self.best
            ));
            Ok(())
        }
    }

    fn name(&self) -> &'static str {
        "ModelCheckpoint"
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    proptest! {
        /// Snapshot names embed the 1-based epoch after the prefix
        #[test]
        fn checkpoint_paths_are_consistent(epoch in 0usize..1000) {
            let temp_dir = TempDir::new().unwrap();
            let cb = ModelCheckpoint::new(temp_dir.path().join("weights_out")).unwrap();

            let expected = temp_dir
                .path()
                .join(format!("weights_out_{}.safetensors", epoch + 1));
            prop_assert_eq!(cb.checkpoint_path(epoch), expected);
        }
    }
}
