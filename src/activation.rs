//! The logistic activation.
//!
//! A layer computes `z = W^T x` and then applies `y = sigmoid(z)` element-wise. The
//! layer caches the *post-activation* outputs `y`; during backprop the derivative is
//! recovered from `y` alone, so no separate `z` buffer is kept.

/// `1 / (1 + e^-x)`.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    // Split form so `exp` never sees a large positive argument.
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

/// Derivative of [`sigmoid`] expressed in terms of its output `y = sigmoid(x)`.
#[inline]
pub fn sigmoid_grad_from_output(y: f64) -> f64 {
    y * (1.0 - y)
}
