//! Dense, fixed-shape matrices of `f64`.
//!
//! Storage is row-major: element `(i, j)` lives at `i * cols + j`. The same order is used
//! by `Layer` weights and by the binary model format, so a weight block can be written and
//! read back as one contiguous run of values.
//!
//! Product conventions follow the way layer weights are consumed:
//!
//! - `mul_vec` contracts over rows: `v.dim() == rows`, result has `cols` entries.
//! - `multiply_transposed` contracts over columns: `v.dim() == cols`, result has `rows`.
//! - `mul_mat(a, b)` requires `a.rows() == b.cols()` and yields `b.rows() x a.cols()`.

use crate::matmul::gemm_f64;
use crate::Vector;

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Zero-filled `rows x cols` matrix.
    #[inline]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Take ownership of a row-major buffer.
    ///
    /// Panics if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        assert_eq!(
            data.len(),
            rows * cols,
            "buffer len {} does not match shape {rows}x{cols}",
            data.len()
        );
        Self { rows, cols, data }
    }

    /// Copy `rows * cols` values out of a row-major buffer.
    pub fn from_slice(rows: usize, cols: usize, data: &[f64]) -> Self {
        Self::from_vec(rows, cols, data.to_vec())
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    #[inline]
    fn offset(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.rows && j < self.cols,
            "index ({i}, {j}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols
        );
        i * self.cols + j
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.offset(i, j)]
    }

    #[inline]
    pub fn get_mut(&mut self, i: usize, j: usize) -> &mut f64 {
        let idx = self.offset(i, j);
        &mut self.data[idx]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        *self.get_mut(i, j) = value;
    }

    pub fn add(&self, other: &Matrix) -> Matrix {
        self.zip_with(other, "add", |a, b| a + b)
    }

    pub fn sub(&self, other: &Matrix) -> Matrix {
        self.zip_with(other, "sub", |a, b| a - b)
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| x * factor).collect(),
        }
    }

    fn zip_with<F: Fn(f64, f64) -> f64>(&self, other: &Matrix, op: &str, f: F) -> Matrix {
        assert_eq!(
            self.shape(),
            other.shape(),
            "{op}: lhs shape {:?} does not match rhs shape {:?}",
            self.shape(),
            other.shape()
        );
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }

    /// `c[j] = sum_i m[i, j] * v[i]`.
    ///
    /// Panics if `v.dim() != self.rows()`.
    pub fn mul_vec(&self, v: &Vector) -> Vector {
        let mut out = Vector::new(self.cols);
        self.mul_vec_into(v.as_slice(), out.as_mut_slice());
        out
    }

    /// Non-allocating form of [`Matrix::mul_vec`]; `out` is overwritten.
    pub fn mul_vec_into(&self, v: &[f64], out: &mut [f64]) {
        assert_eq!(
            v.len(),
            self.rows,
            "mul_vec: vector dim {} does not match matrix rows {}",
            v.len(),
            self.rows
        );
        assert_eq!(
            out.len(),
            self.cols,
            "mul_vec: output dim {} does not match matrix cols {}",
            out.len(),
            self.cols
        );

        out.fill(0.0);
        for (i, &vi) in v.iter().enumerate() {
            let row = &self.data[i * self.cols..(i + 1) * self.cols];
            for (o, &w) in out.iter_mut().zip(row) {
                *o = w.mul_add(vi, *o);
            }
        }
    }

    /// `c[i] = sum_j m[i, j] * v[j]`, without building the transpose.
    ///
    /// Panics if `v.dim() != self.cols()`.
    pub fn multiply_transposed(&self, v: &Vector) -> Vector {
        self.multiply_transposed_with_row_limit(self.rows, v)
    }

    /// Like [`Matrix::multiply_transposed`], computing only the first `row_limit` rows.
    ///
    /// Panics if `row_limit > self.rows()` or `v.dim() != self.cols()`.
    pub fn multiply_transposed_with_row_limit(&self, row_limit: usize, v: &Vector) -> Vector {
        let mut out = Vector::new(row_limit);
        self.multiply_transposed_into(v.as_slice(), out.as_mut_slice());
        out
    }

    /// Non-allocating form; the row limit is `out.len()`.
    pub fn multiply_transposed_into(&self, v: &[f64], out: &mut [f64]) {
        assert!(
            out.len() <= self.rows,
            "row limit {} exceeds matrix rows {}",
            out.len(),
            self.rows
        );
        assert_eq!(
            v.len(),
            self.cols,
            "multiply_transposed: vector dim {} does not match matrix cols {}",
            v.len(),
            self.cols
        );

        for (i, o) in out.iter_mut().enumerate() {
            let row = &self.data[i * self.cols..(i + 1) * self.cols];
            let mut acc = 0.0_f64;
            for (&w, &vj) in row.iter().zip(v) {
                acc = w.mul_add(vj, acc);
            }
            *o = acc;
        }
    }

    /// Product with the convention `a.rows() == b.cols()`, result `b.rows() x a.cols()`:
    /// `c[i, j] = sum_k b[i, k] * a[k, j]`.
    pub fn mul_mat(a: &Matrix, b: &Matrix) -> Matrix {
        assert_eq!(
            a.rows,
            b.cols,
            "mul_mat: lhs rows {} do not match rhs cols {}",
            a.rows,
            b.cols
        );

        let mut c = Matrix::new(b.rows, a.cols);
        if c.data.is_empty() || a.rows == 0 {
            return c;
        }
        gemm_f64(
            b.rows,
            a.cols,
            a.rows,
            1.0,
            &b.data,
            b.cols,
            1,
            &a.data,
            a.cols,
            1,
            0.0,
            &mut c.data,
            c.cols,
            1,
        );
        c
    }

    /// Outer product `u ⊗ v` as a `u.dim() x v.dim()` matrix.
    pub fn outer(u: &Vector, v: &Vector) -> Matrix {
        let mut c = Matrix::new(u.dim(), v.dim());
        c.rank1_update(1.0, u.as_slice(), v.as_slice());
        c
    }

    /// In-place `self += alpha * (u ⊗ v)`.
    ///
    /// Panics unless `u.len() == rows` and `v.len() == cols`.
    pub fn rank1_update(&mut self, alpha: f64, u: &[f64], v: &[f64]) {
        assert_eq!(
            u.len(),
            self.rows,
            "rank1_update: u len {} does not match matrix rows {}",
            u.len(),
            self.rows
        );
        assert_eq!(
            v.len(),
            self.cols,
            "rank1_update: v len {} does not match matrix cols {}",
            v.len(),
            self.cols
        );
        if self.data.is_empty() {
            return;
        }
        gemm_f64(
            self.rows,
            self.cols,
            1,
            alpha,
            u,
            1,
            0,
            v,
            0,
            1,
            1.0,
            &mut self.data,
            self.cols,
            1,
        );
    }
}
