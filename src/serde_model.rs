//! JSON model export (feature: `serde`).
//!
//! A human-readable companion to the binary format in [`crate::format`]. The file layout
//! is versioned and decoupled from the internal `Network`/`Layer` structs; every load
//! validates shapes and layer chaining.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Layer, Matrix, Network, Result};

pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedNetwork {
    pub format_version: u32,
    pub layers: Vec<SerializedLayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedLayer {
    pub prev_dim: usize,
    pub dim: usize,
    /// Row-major `(prev_dim + 1, dim)`; the last row holds the bias weights.
    pub weights: Vec<f64>,
}

impl SerializedNetwork {
    pub fn validate(&self) -> Result<()> {
        if self.format_version != MODEL_FORMAT_VERSION {
            return Err(Error::InvalidData(format!(
                "unsupported model format_version {}; expected {}",
                self.format_version, MODEL_FORMAT_VERSION
            )));
        }
        if self.layers.is_empty() {
            return Err(Error::InvalidData(
                "serialized model must have at least one layer".to_owned(),
            ));
        }

        for (i, layer) in self.layers.iter().enumerate() {
            if layer.prev_dim == 0 || layer.dim == 0 {
                return Err(Error::InvalidData(format!(
                    "layer {i} dims must be > 0, got prev_dim={} dim={}",
                    layer.prev_dim, layer.dim
                )));
            }
            let expected = (layer.prev_dim + 1)
                .checked_mul(layer.dim)
                .ok_or_else(|| Error::InvalidData("layer weight shape overflow".to_owned()))?;
            if layer.weights.len() != expected {
                return Err(Error::InvalidData(format!(
                    "layer {i} weights length {} does not match (prev_dim + 1) * dim ({} * {})",
                    layer.weights.len(),
                    layer.prev_dim + 1,
                    layer.dim
                )));
            }
            if i > 0 && layer.prev_dim != self.layers[i - 1].dim {
                return Err(Error::InvalidData(format!(
                    "layer {i} prev_dim {} does not match previous dim {}",
                    layer.prev_dim,
                    self.layers[i - 1].dim
                )));
            }
        }
        Ok(())
    }
}

impl From<&Network> for SerializedNetwork {
    fn from(net: &Network) -> Self {
        Self {
            format_version: MODEL_FORMAT_VERSION,
            layers: net
                .layers()
                .iter()
                .map(|l| SerializedLayer {
                    prev_dim: l.prev_dim(),
                    dim: l.dim(),
                    weights: l.weight().as_slice().to_vec(),
                })
                .collect(),
        }
    }
}

impl TryFrom<SerializedNetwork> for Network {
    type Error = Error;

    fn try_from(value: SerializedNetwork) -> std::result::Result<Self, Self::Error> {
        value.validate()?;

        let mut layers = Vec::with_capacity(value.layers.len());
        for layer in value.layers {
            let w = Matrix::from_vec(layer.prev_dim + 1, layer.dim, layer.weights);
            layers.push(Layer::from_weights(w)?);
        }
        Network::from_layers(layers)
    }
}

impl Network {
    pub fn to_json_string_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&SerializedNetwork::from(self))
            .map_err(|e| Error::InvalidData(format!("failed to serialize model: {e}")))
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let ser: SerializedNetwork = serde_json::from_str(s)
            .map_err(|e| Error::InvalidData(format!("failed to parse model json: {e}")))?;
        ser.try_into()
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json_string_pretty()?)?;
        Ok(())
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }
}
