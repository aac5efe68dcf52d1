//! Comparison direction for monitored quantities

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the direction of improvement is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorMode {
    /// Infer from the metric name
    #[default]
    Auto,
    /// Lower is better
    Min,
    /// Higher is better
    Max,
}

impl MonitorMode {
    /// Parse a mode, falling back to `Auto` with a warning on unknown input
    pub fn parse_lenient(mode: &str, owner: &str) -> Self {
        mode.parse().unwrap_or_else(|_| {
            log::warn!("{owner} mode {mode} is unknown, fallback to auto mode.");
            Self::Auto
        })
    }
}

impl FromStr for MonitorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            other => Err(format!("unknown monitor mode: {other}")),
        }
    }
}

/// Comparison used to decide whether a value improved on the best so far
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorOp {
    /// Less is better
    Less,
    /// Greater is better
    Greater,
}

impl MonitorOp {
    /// Resolve a mode; `is_higher_better` decides `Auto`
    pub fn resolve(mode: MonitorMode, is_higher_better: bool) -> Self {
        match mode {
            MonitorMode::Min => Self::Less,
            MonitorMode::Max => Self::Greater,
            MonitorMode::Auto if is_higher_better => Self::Greater,
            MonitorMode::Auto => Self::Less,
        }
    }

    /// Whether `current` strictly improves on `best`
    pub fn improved(self, current: f32, best: f32) -> bool {
        match self {
            Self::Less => current < best,
            Self::Greater => current > best,
        }
    }

    /// Worst possible value, so the first observation always improves
    pub fn worst(self) -> f32 {
        match self {
            Self::Less => f32::INFINITY,
            Self::Greater => f32::NEG_INFINITY,
        }
    }
}
