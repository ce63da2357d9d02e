//! One fully-connected sigmoid layer.
//!
//! A layer maps `prev_dim` inputs to `dim` outputs. Its weight matrix has shape
//! `(prev_dim + 1, dim)`: row `i` holds the weights leaving input unit `i`, and the last
//! row holds the bias weights, fed by an input slot that is permanently `1.0`.
//!
//! The layer owns every buffer it touches during a training step (`input`, `output`,
//! `delta`). They are sized once in [`Layer::new`] and overwritten in place, so
//! `forward`, both backward variants and `update_weight` never allocate.
//!
//! Per sample, call `forward` before either backward variant, and run the backward pass of
//! every layer before any `update_weight`.

use std::io::{Read, Write};

use rand::Rng;

use crate::activation::{sigmoid, sigmoid_grad_from_output};
use crate::format::{read_f64s_into, write_f64s};
use crate::{Error, Matrix, Result, Vector};

/// Weights are initialized uniformly in `[-INIT_RANGE, INIT_RANGE]`.
pub const INIT_RANGE: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct Layer {
    prev_dim: usize,
    dim: usize,
    /// Length `prev_dim + 1`; the last slot is the bias input and always `1.0`.
    input: Vector,
    output: Vector,
    delta: Vector,
    /// Row-major `(prev_dim + 1, dim)`.
    weight: Matrix,
}

impl Layer {
    /// A layer with all-zero weights.
    pub fn new(prev_dim: usize, dim: usize) -> Self {
        Self::with_weight(Matrix::new(prev_dim + 1, dim))
    }

    fn with_weight(weight: Matrix) -> Self {
        let (rows, dim) = weight.shape();
        let prev_dim = rows - 1;
        let mut input = Vector::new(rows);
        input[prev_dim] = 1.0;
        Self {
            prev_dim,
            dim,
            input,
            output: Vector::new(dim),
            delta: Vector::new(dim),
            weight,
        }
    }

    /// A layer with a uniform-random weight matrix.
    pub fn new_with_rng<R: Rng + ?Sized>(prev_dim: usize, dim: usize, rng: &mut R) -> Self {
        let mut layer = Self::new(prev_dim, dim);
        layer.init_weight(rng);
        layer
    }

    /// Build a layer around an existing `(prev_dim + 1, dim)` weight matrix.
    pub fn from_weights(weight: Matrix) -> Result<Self> {
        let (rows, cols) = weight.shape();
        if rows < 2 || cols == 0 {
            return Err(Error::InvalidShape(format!(
                "weight matrix must be at least 2x1 (inputs + bias row), got {rows}x{cols}"
            )));
        }
        Ok(Self::with_weight(weight))
    }

    /// Number of inputs, excluding the bias unit.
    #[inline]
    pub fn prev_dim(&self) -> usize {
        self.prev_dim
    }

    /// Number of outputs.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn input(&self) -> &Vector {
        &self.input
    }

    #[inline]
    pub fn output(&self) -> &Vector {
        &self.output
    }

    #[inline]
    pub fn delta(&self) -> &Vector {
        &self.delta
    }

    #[inline]
    pub fn weight(&self) -> &Matrix {
        &self.weight
    }

    #[inline]
    pub fn weight_mut(&mut self) -> &mut Matrix {
        &mut self.weight
    }

    /// Copy `x` into the non-bias input slots.
    ///
    /// Panics if `x.len() != self.prev_dim()`.
    #[inline]
    pub fn set_input(&mut self, x: &[f64]) {
        assert_eq!(
            x.len(),
            self.prev_dim,
            "input len {} does not match layer prev_dim {}",
            x.len(),
            self.prev_dim
        );
        self.input.as_mut_slice()[..self.prev_dim].copy_from_slice(x);
    }

    /// `output = sigmoid(W^T * input)`.
    #[inline]
    pub fn forward(&mut self) {
        self.weight
            .mul_vec_into(self.input.as_slice(), self.output.as_mut_slice());
        self.output.apply_in_place(sigmoid);
    }

    /// Output-layer delta for squared error: `delta = sigmoid'(out) * (out - target)`.
    ///
    /// Panics if `target.len() != self.dim()`.
    pub fn backward_output(&mut self, target: &[f64]) {
        assert_eq!(
            target.len(),
            self.dim,
            "target len {} does not match layer dim {}",
            target.len(),
            self.dim
        );

        let out = self.output.as_slice();
        for ((d, &y), &t) in self.delta.as_mut_slice().iter_mut().zip(out).zip(target) {
            *d = sigmoid_grad_from_output(y) * (y - t);
        }
    }

    /// Hidden-layer delta, propagated back through `next`'s weights:
    /// `delta = sigmoid'(out) * (W_next * delta_next)[..dim]`.
    ///
    /// The dropped trailing entry belongs to `next`'s bias row, which has no
    /// counterpart among this layer's outputs.
    ///
    /// Panics if `next.prev_dim() != self.dim()`.
    pub fn backward_hidden(&mut self, next: &Layer) {
        assert_eq!(
            next.prev_dim,
            self.dim,
            "next layer prev_dim {} does not match layer dim {}",
            next.prev_dim,
            self.dim
        );

        next.weight
            .multiply_transposed_into(next.delta.as_slice(), self.delta.as_mut_slice());

        let out = self.output.as_slice();
        for (d, &y) in self.delta.as_mut_slice().iter_mut().zip(out) {
            *d *= sigmoid_grad_from_output(y);
        }
    }

    /// Gradient-descent step: `W -= lr * (input ⊗ delta)`.
    #[inline]
    pub fn update_weight(&mut self, lr: f64) {
        self.weight
            .rank1_update(-lr, self.input.as_slice(), self.delta.as_slice());
    }

    /// Fill every weight with an independent draw from `[-INIT_RANGE, INIT_RANGE]`.
    pub fn init_weight<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for w in self.weight.as_mut_slice() {
            *w = rng.gen_range(-INIT_RANGE..=INIT_RANGE);
        }
    }

    /// Write the raw weight block: `(prev_dim + 1) * dim` little-endian `f64`s in
    /// row-major order. No header.
    pub fn store_weights<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        write_f64s(w, self.weight.as_slice())
    }

    /// Read a weight block written by [`Layer::store_weights`].
    ///
    /// The block is read in full before any weight is replaced, so a short read leaves
    /// the layer untouched.
    pub fn load_weights<R: Read + ?Sized>(&mut self, r: &mut R) -> Result<()> {
        let mut block = vec![0.0_f64; self.weight.as_slice().len()];
        read_f64s_into(r, &mut block)?;
        self.weight.as_mut_slice().copy_from_slice(&block);
        Ok(())
    }
}
