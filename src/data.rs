//! Supervised datasets.
//!
//! A `Dataset` is an ordered list of `(input, target)` vector pairs with one input width
//! and one target width, checked when the dataset is built. Training visits the pairs in
//! this order; nothing here shuffles.

use crate::{Error, Result, Vector};

#[derive(Debug, Clone)]
pub struct Dataset {
    pairs: Vec<(Vector, Vector)>,
    input_dim: usize,
    target_dim: usize,
}

impl Dataset {
    /// Build a dataset from already-constructed vector pairs.
    pub fn from_pairs(pairs: Vec<(Vector, Vector)>) -> Result<Self> {
        let (input_dim, target_dim) = match pairs.first() {
            Some((x, t)) => (x.dim(), t.dim()),
            None => {
                return Err(Error::InvalidData("dataset must not be empty".to_owned()));
            }
        };
        if input_dim == 0 {
            return Err(Error::InvalidData("input_dim must be > 0".to_owned()));
        }
        if target_dim == 0 {
            return Err(Error::InvalidData("target_dim must be > 0".to_owned()));
        }

        for (i, (x, t)) in pairs.iter().enumerate() {
            if x.dim() != input_dim {
                return Err(Error::InvalidData(format!(
                    "input row {i} has len {}, expected {input_dim}",
                    x.dim()
                )));
            }
            if t.dim() != target_dim {
                return Err(Error::InvalidData(format!(
                    "target row {i} has len {}, expected {target_dim}",
                    t.dim()
                )));
            }
        }

        Ok(Self {
            pairs,
            input_dim,
            target_dim,
        })
    }

    /// Build a dataset from per-sample rows (copies).
    pub fn from_rows(inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<Self> {
        if inputs.len() != targets.len() {
            return Err(Error::InvalidData(format!(
                "inputs/targets length mismatch: {} vs {}",
                inputs.len(),
                targets.len()
            )));
        }

        let pairs = inputs
            .iter()
            .zip(targets)
            .map(|(x, t)| (Vector::from_slice(x), Vector::from_slice(t)))
            .collect();
        Self::from_pairs(pairs)
    }

    /// Build a classification dataset, encoding each label with [`encode_label`].
    pub fn from_labels(
        inputs: &[Vec<f64>],
        labels: &[usize],
        classes: usize,
        off: f64,
        on: f64,
    ) -> Result<Self> {
        if inputs.len() != labels.len() {
            return Err(Error::InvalidData(format!(
                "inputs/labels length mismatch: {} vs {}",
                inputs.len(),
                labels.len()
            )));
        }

        let mut targets = Vec::with_capacity(labels.len());
        for &label in labels {
            targets.push(encode_label(label, classes, off, on)?.into_vec());
        }
        Self::from_rows(inputs, &targets)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    #[inline]
    pub fn target_dim(&self) -> usize {
        self.target_dim
    }

    /// Panics if `idx >= len`.
    #[inline]
    pub fn get(&self, idx: usize) -> (&Vector, &Vector) {
        let (x, t) = &self.pairs[idx];
        (x, t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Vector, &Vector)> + '_ {
        self.pairs.iter().map(|(x, t)| (x, t))
    }
}

/// Target vector of length `classes`: `off` everywhere and `on` at `label`.
///
/// With `off = 0.1` and `on = 0.9` the targets stay inside the sigmoid's range instead of
/// chasing its asymptotes.
pub fn encode_label(label: usize, classes: usize, off: f64, on: f64) -> Result<Vector> {
    if label >= classes {
        return Err(Error::InvalidData(format!(
            "label {label} out of range for {classes} classes"
        )));
    }
    let mut t = Vector::new(classes);
    t.fill(off);
    t[label] = on;
    Ok(t)
}
