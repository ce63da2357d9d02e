use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::format::{read_f64s, Header};
use crate::{Dataset, Error, Layer, Matrix, Result, Vector};

/// A chain of fully-connected sigmoid layers.
///
/// Layer `i`'s output width equals layer `i + 1`'s input width. The network owns every
/// per-layer buffer, so `predict` and `train_one` run without allocating.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
}

impl Network {
    pub fn new_with_seed(sizes: &[usize], seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new_with_rng(sizes, &mut rng)
    }

    /// Build `sizes.len() - 1` layers chaining consecutive sizes, each with freshly
    /// initialized weights.
    ///
    /// `sizes` includes the input width, so it needs at least two entries.
    pub fn new_with_rng<R: Rng + ?Sized>(sizes: &[usize], rng: &mut R) -> Result<Self> {
        validate_sizes(sizes)?;

        let mut layers = Vec::with_capacity(sizes.len() - 1);
        for w in sizes.windows(2) {
            layers.push(Layer::new_with_rng(w[0], w[1], rng));
        }
        debug!("created network with sizes {sizes:?}");
        Ok(Self { layers })
    }

    /// Assemble a network from pre-built layers.
    pub fn from_layers(layers: Vec<Layer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(Error::InvalidConfig(
                "network must have at least one layer".to_owned(),
            ));
        }
        for i in 1..layers.len() {
            if layers[i].prev_dim() != layers[i - 1].dim() {
                return Err(Error::InvalidShape(format!(
                    "layer {i} prev_dim {} does not match previous dim {}",
                    layers[i].prev_dim(),
                    layers[i - 1].dim()
                )));
            }
        }
        Ok(Self { layers })
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.layers[0].prev_dim()
    }

    #[inline]
    pub fn output_dim(&self) -> usize {
        self.layers[self.layers.len() - 1].dim()
    }

    #[inline]
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// `[input_dim, layer_0.dim, layer_1.dim, ...]`.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.layers.len() + 1);
        sizes.push(self.input_dim());
        sizes.extend(self.layers.iter().map(Layer::dim));
        sizes
    }

    #[inline]
    pub fn layer(&self, idx: usize) -> Option<&Layer> {
        self.layers.get(idx)
    }

    #[inline]
    pub fn layer_mut(&mut self, idx: usize) -> Option<&mut Layer> {
        self.layers.get_mut(idx)
    }

    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Panics if `x.len() != self.input_dim()`.
    #[inline]
    pub fn set_input(&mut self, x: &[f64]) {
        self.layers[0].set_input(x);
    }

    /// Output of the last layer, as of the most recent `predict`.
    #[inline]
    pub fn output(&self) -> &Vector {
        self.layers[self.layers.len() - 1].output()
    }

    /// Alias of [`Network::output`].
    #[inline]
    pub fn get_output(&self) -> &Vector {
        self.output()
    }

    /// Forward pass over the current input, layer by layer.
    pub fn predict(&mut self) {
        let n = self.layers.len();
        for idx in 0..n {
            let (left, right) = self.layers.split_at_mut(idx + 1);
            let layer = &mut left[idx];
            layer.forward();
            if let Some(next) = right.first_mut() {
                next.set_input(layer.output().as_slice());
            }
        }
    }

    /// `set_input` followed by `predict`.
    pub fn predict_one(&mut self, x: &[f64]) -> &Vector {
        self.set_input(x);
        self.predict();
        self.output()
    }

    /// One online SGD step on a single `(sample, label)` pair.
    ///
    /// Every delta is computed before any weight changes: a hidden layer's backward step
    /// reads the next layer's pre-update weights.
    ///
    /// Panics if `sample` or `label` do not match the network's input/output widths.
    pub fn train_one(&mut self, sample: &[f64], label: &[f64], lr: f64) {
        self.set_input(sample);
        self.predict();
        self.backward(label);
        for layer in &mut self.layers {
            layer.update_weight(lr);
        }
    }

    fn backward(&mut self, label: &[f64]) {
        let last = self.layers.len() - 1;
        self.layers[last].backward_output(label);

        for idx in (0..last).rev() {
            let (left, right) = self.layers.split_at_mut(idx + 1);
            left[idx].backward_hidden(&right[0]);
        }
    }

    /// `epochs` passes over `data` in its given order, one update per sample.
    ///
    /// Panics if the dataset's dims do not match the network; `Network::fit` is the
    /// shape-checked driver.
    pub fn train(&mut self, data: &Dataset, lr: f64, epochs: usize) {
        for _ in 0..epochs {
            for (sample, label) in data.iter() {
                self.train_one(sample.as_slice(), label.as_slice(), lr);
            }
        }
    }

    fn header(&self) -> Header {
        Header {
            input_width: self.input_dim(),
            layer_widths: self.layers.iter().map(Layer::dim).collect(),
        }
    }

    /// Write the model in the binary format described in [`crate::format`].
    pub fn save_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        self.header().write(w)?;
        for layer in &self.layers {
            layer.store_weights(w)?;
        }
        Ok(())
    }

    /// Read a model written by [`Network::save_to`].
    ///
    /// Either every declared weight is read and a network is returned, or an error is.
    pub fn load_from<R: Read + ?Sized>(r: &mut R) -> Result<Self> {
        let header = Header::read(r)?;
        let sizes = header.sizes();
        let counts = header.weight_counts()?;

        let mut layers = Vec::with_capacity(counts.len());
        for (i, (w, &count)) in sizes.windows(2).zip(&counts).enumerate() {
            let weights = read_f64s(r, count).map_err(|e| match e {
                Error::Io(io) => Error::Io(std::io::Error::new(
                    io.kind(),
                    format!("layer {i} weights: {io}"),
                )),
                other => other,
            })?;
            layers.push(Layer::from_weights(Matrix::from_vec(w[0] + 1, w[1], weights))?);
        }
        Self::from_layers(layers)
    }

    /// Save to `path`.
    ///
    /// The model is written to a sibling `.tmp` file and renamed into place, so an
    /// interrupted save never leaves a truncated model under `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);

        let written = (|| -> Result<()> {
            let mut w = BufWriter::new(File::create(&tmp)?);
            self.save_to(&mut w)?;
            let file = w.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
            Ok(())
        })();

        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        debug!("saved network {:?} to {}", self.sizes(), path.display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut r = BufReader::new(File::open(path)?);
        match Self::load_from(&mut r) {
            Ok(net) => {
                debug!("loaded network {:?} from {}", net.sizes(), path.display());
                Ok(net)
            }
            Err(e) => {
                warn!("failed to load network from {}: {e}", path.display());
                Err(e)
            }
        }
    }
}

fn validate_sizes(sizes: &[usize]) -> Result<()> {
    if sizes.len() < 2 {
        return Err(Error::InvalidConfig(
            "sizes must include input and output dims".to_owned(),
        ));
    }
    if sizes.contains(&0) {
        return Err(Error::InvalidConfig(
            "all layer sizes must be > 0".to_owned(),
        ));
    }
    Ok(())
}
