//! Dense, fixed-length vectors of `f64`.
//!
//! A `Vector`'s dimension is set at construction and never changes. Every binary
//! operation requires both operands to have the same dimension; a mismatch is a
//! programmer error and panics.

use std::ops::{Add, Index, IndexMut, Mul, Sub};

#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    /// Zero-filled vector of length `dim`.
    #[inline]
    pub fn new(dim: usize) -> Self {
        Self {
            data: vec![0.0; dim],
        }
    }

    #[inline]
    pub fn from_vec(data: Vec<f64>) -> Self {
        Self { data }
    }

    #[inline]
    pub fn from_slice(values: &[f64]) -> Self {
        Self {
            data: values.to_vec(),
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.data.len()
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
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Overwrite the contents with `values`.
    ///
    /// Panics if `values.len() != self.dim()`.
    #[inline]
    pub fn assign(&mut self, values: &[f64]) {
        assert_eq!(
            values.len(),
            self.dim(),
            "assign len {} does not match vector dim {}",
            values.len(),
            self.dim()
        );
        self.data.copy_from_slice(values);
    }

    #[inline]
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Index of the largest element. Ties resolve to the lowest index.
    ///
    /// Panics on a zero-length vector.
    pub fn max_index(&self) -> usize {
        assert!(!self.data.is_empty(), "max_index of an empty vector");

        let mut best = 0;
        for i in 1..self.data.len() {
            if self.data[i] > self.data[best] {
                best = i;
            }
        }
        best
    }

    pub fn add(&self, other: &Vector) -> Vector {
        self.zip_with(other, "add", |a, b| a + b)
    }

    pub fn sub(&self, other: &Vector) -> Vector {
        self.zip_with(other, "sub", |a, b| a - b)
    }

    /// Elementwise (Hadamard) product.
    pub fn elementwise_mul(&self, other: &Vector) -> Vector {
        self.zip_with(other, "elementwise_mul", |a, b| a * b)
    }

    pub fn scale(&self, factor: f64) -> Vector {
        self.apply(|x| x * factor)
    }

    /// New vector with `f` applied to every element.
    pub fn apply<F: Fn(f64) -> f64>(&self, f: F) -> Vector {
        Vector {
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }

    #[inline]
    pub fn apply_in_place<F: Fn(f64) -> f64>(&mut self, f: F) {
        for x in &mut self.data {
            *x = f(*x);
        }
    }

    fn zip_with<F: Fn(f64, f64) -> f64>(&self, other: &Vector, op: &str, f: F) -> Vector {
        assert_eq!(
            self.dim(),
            other.dim(),
            "{op}: lhs dim {} does not match rhs dim {}",
            self.dim(),
            other.dim()
        );
        Vector {
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }
}

/// Sum of elementwise products.
///
/// Panics if the dimensions differ.
#[inline]
pub fn dot(a: &Vector, b: &Vector) -> f64 {
    assert_eq!(
        a.dim(),
        b.dim(),
        "dot: lhs dim {} does not match rhs dim {}",
        a.dim(),
        b.dim()
    );
    let mut acc = 0.0_f64;
    for (&x, &y) in a.data.iter().zip(&b.data) {
        acc = x.mul_add(y, acc);
    }
    acc
}

/// `‖a - b‖²`.
#[inline]
pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(
        a.len(),
        b.len(),
        "squared_distance: lhs len {} does not match rhs len {}",
        a.len(),
        b.len()
    );
    let mut acc = 0.0_f64;
    for (&x, &y) in a.iter().zip(b) {
        let diff = x - y;
        acc = diff.mul_add(diff, acc);
    }
    acc
}

impl Index<usize> for Vector {
    type Output = f64;

    #[inline]
    fn index(&self, i: usize) -> &f64 {
        &self.data[i]
    }
}

impl IndexMut<usize> for Vector {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.data[i]
    }
}

impl<'a> Add<&'a Vector> for &Vector {
    type Output = Vector;

    fn add(self, rhs: &'a Vector) -> Vector {
        Vector::add(self, rhs)
    }
}

impl<'a> Sub<&'a Vector> for &Vector {
    type Output = Vector;

    fn sub(self, rhs: &'a Vector) -> Vector {
        Vector::sub(self, rhs)
    }
}

impl Mul<f64> for &Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Vector {
        self.scale(rhs)
    }
}

impl<'a> Mul<&'a Vector> for &Vector {
    type Output = Vector;

    fn mul(self, rhs: &'a Vector) -> Vector {
        self.elementwise_mul(rhs)
    }
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Self::from_vec(data)
    }
}
