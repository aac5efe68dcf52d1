//! Model weight state

use crate::{Error, Result};
use safetensors::tensor::{Dtype, TensorView};
use safetensors::SafeTensors;
use std::collections::BTreeMap;
use std::path::Path;

/// Complete weight state of a model, keyed by parameter name
///
/// Parameters are stored flat; the state is cheap to clone for in-memory
/// snapshots and round-trips through SafeTensors for on-disk checkpoints.
///
/// # Example
///
/// ```no_run
/// use entrenar_callbacks::io::StateDict;
///
/// let mut state = StateDict::new();
/// state.insert("weight", vec![0.5, -0.25]);
/// state.save("checkpoints/weights_out_1.safetensors")?;
///
/// let restored = StateDict::load("checkpoints/weights_out_1.safetensors")?;
/// assert_eq!(state, restored);
/// # Ok::<(), entrenar_callbacks::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateDict {
    tensors: BTreeMap<String, Vec<f32>>,
}

impl StateDict {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter
    pub fn insert(&mut self, name: impl Into<String>, data: Vec<f32>) {
        self.tensors.insert(name.into(), data);
    }

    /// Get parameter data by name
    pub fn get(&self, name: &str) -> Option<&[f32]> {
        self.tensors.get(name).map(Vec::as_slice)
    }

    /// Get mutable parameter data by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vec<f32>> {
        self.tensors.get_mut(name)
    }

    /// Parameter names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tensors.keys().map(String::as_str)
    }

    /// Iterate over `(name, data)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.tensors.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    /// Check if the state holds no parameters
    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    /// Persist the state as a SafeTensors file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let views: Vec<(&str, TensorView<'_>)> = self
            .tensors
            .iter()
            .map(|(name, data)| {
                let bytes: &[u8] = bytemuck::cast_slice(data.as_slice());
                TensorView::new(Dtype::F32, vec![data.len()], bytes)
                    .map(|view| (name.as_str(), view))
                    .map_err(|e| Error::Serialization(format!("Invalid tensor {name}: {e}")))
            })
            .collect::<Result<_>>()?;

        let bytes = safetensors::serialize(views, &None)
            .map_err(|e| Error::Serialization(format!("SafeTensors serialization failed: {e}")))?;

        std::fs::write(path, bytes)
            .map_err(|e| Error::io(format!("writing {}", path.display()), e))
    }

    /// Load a state previously written by [`StateDict::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data =
            std::fs::read(path).map_err(|e| Error::io(format!("reading {}", path.display()), e))?;

        let tensors = SafeTensors::deserialize(&data)
            .map_err(|e| Error::Serialization(format!("SafeTensors parsing failed: {e}")))?;

        let mut state = Self::new();
        for (name, view) in tensors.tensors() {
            if view.dtype() != Dtype::F32 {
                return Err(Error::Serialization(format!(
                    "Tensor {name} has dtype {:?}, expected F32",
                    view.dtype()
                )));
            }
            // The buffer is not guaranteed to be 4-byte aligned
            let values = view
                .data()
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect();
            state.insert(name, values);
        }
        Ok(state)
    }
}

impl FromIterator<(String, Vec<f32>)> for StateDict {
    fn from_iter<I: IntoIterator<Item = (String, Vec<f32>)>>(iter: I) -> Self {
        Self {
            tensors: iter.into_iter().collect(),
        }
    }
}
