//! A small feed-forward sigmoid network.
//!
//! `rust-fnn` trains a multilayer perceptron with online (per-sample) backpropagation.
//! Every layer is fully connected, uses the logistic activation, and learns a bias through
//! an extra, constant `1.0` input. Training minimizes squared error with plain SGD.
//!
//! # Design goals
//!
//! - Predictable performance: each layer owns pre-sized `input` / `output` / `delta`
//!   buffers, reused on every step, so `predict` and `train_one` do not allocate.
//! - Reproducibility: weight initialization always goes through an explicit RNG or seed.
//! - One weight layout: row-major `(prev_dim + 1, dim)`, shared by [`Matrix`], [`Layer`]
//!   and the binary model format in [`format`].
//!
//! # Panics vs `Result`
//!
//! - Low-level hot path (panics on misuse): [`Vector`] / [`Matrix`] arithmetic,
//!   [`Layer::set_input`], [`Network::set_input`], [`Network::train_one`],
//!   [`Network::train`]. Shape mismatches are programmer error and panic via `assert!`.
//! - Boundary APIs return [`Result`]: construction from sizes, [`Dataset`] builders,
//!   [`Network::fit`], the metrics, and every load/save path. I/O failures surface as
//!   [`Error::Io`].
//!
//! # Quick start
//!
//! ```rust
//! use rust_fnn::{Dataset, FitConfig, Network};
//!
//! # fn main() -> rust_fnn::Result<()> {
//! let xs = vec![
//!     vec![0.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![1.0, 0.0],
//!     vec![1.0, 1.0],
//! ];
//! let train = Dataset::from_labels(&xs, &[0, 1, 1, 0], 2, 0.1, 0.9)?;
//!
//! let mut net = Network::new_with_seed(&[2, 4, 2], 0)?;
//! let report = net.fit(
//!     &train,
//!     None,
//!     FitConfig {
//!         lr: 0.5,
//!         epochs_per_round: 100,
//!         max_rounds: 5,
//!         restore_best: true,
//!     },
//! )?;
//! assert!(report.best_accuracy >= report.initial_accuracy);
//! # Ok(())
//! # }
//! ```
//!
//! # Driving training by hand
//!
//! ```rust
//! use rust_fnn::Network;
//!
//! # fn main() -> rust_fnn::Result<()> {
//! let mut net = Network::new_with_seed(&[3, 8, 2], 0)?;
//! let x = [0.1, -0.2, 0.3];
//! let t = [0.0, 1.0];
//!
//! for _ in 0..10 {
//!     net.train_one(&x, &t, 0.1);
//! }
//! net.set_input(&x);
//! net.predict();
//! let class = net.get_output().max_index();
//! assert!(class < 2);
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod data;
pub mod error;
pub mod format;
pub mod layer;
pub(crate) mod matmul;
pub mod matrix;
pub mod metrics;
pub mod network;
pub mod train;
pub mod vector;

#[cfg(feature = "serde")]
pub mod serde_model;

pub use activation::{sigmoid, sigmoid_grad_from_output};
pub use data::{encode_label, Dataset};
pub use error::{Error, Result};
pub use layer::{Layer, INIT_RANGE};
pub use matrix::Matrix;
pub use metrics::{accuracy, mean_squared_error};
pub use network::Network;
pub use train::{FitConfig, FitReport, RoundReport};
pub use vector::{dot, squared_distance, Vector};
