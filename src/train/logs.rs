//! Per-hook log mapping

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single logged value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogValue {
    /// Numeric metric
    Float(f32),
    /// Free text, e.g. the training start timestamp
    Text(String),
}

impl LogValue {
    /// Numeric value, if this is a metric
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Text(_) => None,
        }
    }
}

impl From<f32> for LogValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for LogValue {
    fn from(v: f64) -> Self {
        Self::Float(v as f32)
    }
}

impl From<String> for LogValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for LogValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Metric name to value mapping, rebuilt by the loop at every hook
///
/// Keys do not persist between calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Logs {
    values: BTreeMap<String, LogValue>,
}

impl Logs {
    /// Create empty logs
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<LogValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<LogValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Raw value by key
    pub fn get(&self, key: &str) -> Option<&LogValue> {
        self.values.get(key)
    }

    /// Numeric value by key; text values read as absent
    pub fn metric(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(LogValue::as_f32)
    }

    /// Copy every entry of `other` into these logs
    pub fn extend(&mut self, other: Logs) {
        self.values.extend(other.values);
    }

    /// Keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterate over `(key, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LogValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no entries
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
