//! Evaluation metrics.
//!
//! Metrics run forward passes only; they never touch deltas or weights.

use crate::{squared_distance, Dataset, Error, Network, Result};

/// Fraction of samples whose predicted class (argmax of the output) matches the argmax of
/// the target.
pub fn accuracy(network: &mut Network, data: &Dataset) -> Result<f64> {
    check_shapes(network, data)?;

    let mut correct = 0usize;
    for (x, t) in data.iter() {
        if network.predict_one(x.as_slice()).max_index() == t.max_index() {
            correct += 1;
        }
    }
    Ok(correct as f64 / data.len() as f64)
}

/// Mean over samples of `‖output - target‖²`.
pub fn mean_squared_error(network: &mut Network, data: &Dataset) -> Result<f64> {
    check_shapes(network, data)?;

    let mut total = 0.0_f64;
    for (x, t) in data.iter() {
        total += squared_distance(network.predict_one(x.as_slice()).as_slice(), t.as_slice());
    }
    Ok(total / data.len() as f64)
}

pub(crate) fn check_shapes(network: &Network, data: &Dataset) -> Result<()> {
    if data.is_empty() {
        return Err(Error::InvalidData("dataset must not be empty".to_owned()));
    }
    if data.input_dim() != network.input_dim() {
        return Err(Error::InvalidData(format!(
            "dataset input_dim {} does not match network input_dim {}",
            data.input_dim(),
            network.input_dim()
        )));
    }
    if data.target_dim() != network.output_dim() {
        return Err(Error::InvalidData(format!(
            "dataset target_dim {} does not match network output_dim {}",
            data.target_dim(),
            network.output_dim()
        )));
    }
    Ok(())
}
