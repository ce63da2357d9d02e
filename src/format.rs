//! Binary model format.
//!
//! All values are little-endian; integers are `u64`, weights are IEEE-754 `f64`.
//!
//! ```text
//! [u64]          input_width
//! [u64]          layer_count = L
//! [u64; L]       output width of each layer
//! for each layer i:
//!   [f64; (prev_width_i + 1) * width_i]   row-major weight block
//! ```
//!
//! where `prev_width_0 = input_width` and `prev_width_i = width_{i-1}`. There is no magic
//! number or version word; shapes come entirely from the header.

use std::io::{Read, Write};

use crate::{Error, Result};

/// Upper bound on any single declared width.
pub const MAX_WIDTH: u64 = 1 << 24;

/// Upper bound on the total number of weights a header may declare, across all layers.
pub const MAX_WEIGHTS: u64 = 1 << 28;

/// Weights decoded per read call.
const CHUNK_LEN: usize = 1024;

/// Topology read from a model header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub input_width: usize,
    pub layer_widths: Vec<usize>,
}

impl Header {
    /// The full sizes list: input width followed by every layer width.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.layer_widths.len() + 1);
        sizes.push(self.input_width);
        sizes.extend_from_slice(&self.layer_widths);
        sizes
    }

    /// `(prev_width + 1) * width` for every layer, in file order.
    pub fn weight_counts(&self) -> Result<Vec<usize>> {
        let sizes = self.sizes();
        let mut counts = Vec::with_capacity(self.layer_widths.len());
        let mut total = 0u64;
        for (i, w) in sizes.windows(2).enumerate() {
            let count = (w[0] as u64)
                .checked_add(1)
                .and_then(|rows| rows.checked_mul(w[1] as u64))
                .ok_or_else(|| Error::InvalidData(format!("layer {i} weight count overflows")))?;
            total = total.saturating_add(count);
            if total > MAX_WEIGHTS {
                return Err(Error::InvalidData(format!(
                    "model declares more than {MAX_WEIGHTS} weights (layer {i})"
                )));
            }
            let count = usize::try_from(count)
                .map_err(|_| Error::InvalidData(format!("layer {i} weight count overflows usize")))?;
            counts.push(count);
        }
        Ok(counts)
    }

    pub fn write<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        write_u64(w, self.input_width as u64)?;
        write_u64(w, self.layer_widths.len() as u64)?;
        for &width in &self.layer_widths {
            write_u64(w, width as u64)?;
        }
        Ok(())
    }

    pub fn read<R: Read + ?Sized>(r: &mut R) -> Result<Self> {
        let input_width = read_width(r, "input width")?;
        let layer_count = read_u64(r)?;
        if layer_count == 0 {
            return Err(Error::InvalidData(
                "model must declare at least one layer".to_owned(),
            ));
        }
        if layer_count > MAX_WIDTH {
            return Err(Error::InvalidData(format!(
                "layer count {layer_count} exceeds limit {MAX_WIDTH}"
            )));
        }

        let mut layer_widths = Vec::with_capacity(layer_count.min(1024) as usize);
        for i in 0..layer_count {
            layer_widths.push(read_width(r, &format!("layer {i} width"))?);
        }

        let header = Self {
            input_width,
            layer_widths,
        };
        header.weight_counts()?;
        Ok(header)
    }
}

fn read_width<R: Read + ?Sized>(r: &mut R, what: &str) -> Result<usize> {
    let v = read_u64(r)?;
    if v == 0 || v > MAX_WIDTH {
        return Err(Error::InvalidData(format!(
            "{what} must be in 1..={MAX_WIDTH}, got {v}"
        )));
    }
    usize::try_from(v).map_err(|_| Error::InvalidData(format!("{what} {v} overflows usize")))
}

#[inline]
pub fn write_u64<W: Write + ?Sized>(w: &mut W, v: u64) -> Result<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

#[inline]
pub fn read_u64<R: Read + ?Sized>(r: &mut R) -> Result<u64> {
    let mut bytes = [0u8; 8];
    r.read_exact(&mut bytes)?;
    Ok(u64::from_le_bytes(bytes))
}

/// Write `values` as one contiguous run of little-endian `f64`s.
pub fn write_f64s<W: Write + ?Sized>(w: &mut W, values: &[f64]) -> Result<()> {
    let mut bytes = [0u8; CHUNK_LEN * 8];
    for chunk in values.chunks(CHUNK_LEN) {
        for (v, slot) in chunk.iter().zip(bytes.chunks_exact_mut(8)) {
            slot.copy_from_slice(&v.to_le_bytes());
        }
        w.write_all(&bytes[..chunk.len() * 8])?;
    }
    Ok(())
}

/// Fill `out` from a run of little-endian `f64`s. Fails with `UnexpectedEof` if the
/// stream ends early; `out` may then hold a partial prefix.
pub fn read_f64s_into<R: Read + ?Sized>(r: &mut R, out: &mut [f64]) -> Result<()> {
    let mut bytes = [0u8; CHUNK_LEN * 8];
    for chunk in out.chunks_mut(CHUNK_LEN) {
        let bytes = &mut bytes[..chunk.len() * 8];
        r.read_exact(bytes)?;
        decode_into(bytes, chunk);
    }
    Ok(())
}

/// Read exactly `len` little-endian `f64`s.
///
/// The returned buffer grows with the bytes actually read, so a stream that ends early
/// fails before `len` weights are ever allocated.
pub fn read_f64s<R: Read + ?Sized>(r: &mut R, len: usize) -> Result<Vec<f64>> {
    let mut out = Vec::with_capacity(len.min(CHUNK_LEN));
    let mut bytes = [0u8; CHUNK_LEN * 8];
    while out.len() < len {
        let n = (len - out.len()).min(CHUNK_LEN);
        let bytes = &mut bytes[..n * 8];
        r.read_exact(bytes)?;
        let start = out.len();
        out.resize(start + n, 0.0);
        decode_into(bytes, &mut out[start..]);
    }
    Ok(out)
}

#[inline]
fn decode_into(bytes: &[u8], out: &mut [f64]) {
    for (v, chunk) in out.iter_mut().zip(bytes.chunks_exact(8)) {
        let mut b = [0u8; 8];
        b.copy_from_slice(chunk);
        *v = f64::from_le_bytes(b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout_is_little_endian_u64s() {
        let header = Header {
            input_width: 2,
            layer_widths: vec![3, 1],
        };
        let mut buf = Vec::new();
        header.write(&mut buf).unwrap();

        assert_eq!(buf.len(), 4 * 8);
        assert_eq!(&buf[0..8], &2u64.to_le_bytes());
        assert_eq!(&buf[8..16], &2u64.to_le_bytes());
        assert_eq!(&buf[16..24], &3u64.to_le_bytes());
        assert_eq!(&buf[24..32], &1u64.to_le_bytes());

        let back = Header::read(&mut buf.as_slice()).unwrap();
        assert_eq!(back, header);
        assert_eq!(back.sizes(), vec![2, 3, 1]);
    }

    #[test]
    fn f64_runs_preserve_bits() {
        let values = [0.1, -0.0, f64::MIN_POSITIVE, 1e300, f64::NAN];
        let mut buf = Vec::new();
        write_f64s(&mut buf, &values).unwrap();

        let mut back = [0.0; 5];
        read_f64s_into(&mut buf.as_slice(), &mut back).unwrap();
        for (a, b) in values.iter().zip(&back) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn rejects_zero_layers_and_zero_widths() {
        let mut buf = Vec::new();
        write_u64(&mut buf, 4).unwrap();
        write_u64(&mut buf, 0).unwrap();
        assert!(matches!(
            Header::read(&mut buf.as_slice()),
            Err(Error::InvalidData(_))
        ));

        let mut buf = Vec::new();
        write_u64(&mut buf, 4).unwrap();
        write_u64(&mut buf, 1).unwrap();
        write_u64(&mut buf, 0).unwrap();
        assert!(matches!(
            Header::read(&mut buf.as_slice()),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn long_f64_runs_cross_chunk_boundaries() {
        let values: Vec<f64> = (0..CHUNK_LEN * 2 + 3).map(|i| i as f64 * 0.5).collect();
        let mut buf = Vec::new();
        write_f64s(&mut buf, &values).unwrap();
        assert_eq!(buf.len(), values.len() * 8);

        assert_eq!(read_f64s(&mut buf.as_slice(), values.len()).unwrap(), values);

        let mut back = vec![0.0; values.len()];
        read_f64s_into(&mut buf.as_slice(), &mut back).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn read_f64s_fails_on_short_stream() {
        let mut buf = Vec::new();
        write_f64s(&mut buf, &[1.0; 10]).unwrap();
        let err = read_f64s(&mut buf.as_slice(), 1 << 20).unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == std::io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn rejects_headers_declaring_too_many_weights() {
        let mut buf = Vec::new();
        write_u64(&mut buf, MAX_WIDTH).unwrap();
        write_u64(&mut buf, 1).unwrap();
        write_u64(&mut buf, MAX_WIDTH).unwrap();
        let err = Header::read(&mut buf.as_slice()).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
        assert!(format!("{err}").contains("weights"));
    }

    #[test]
    fn weight_counts_include_the_bias_row() {
        let header = Header {
            input_width: 4,
            layer_widths: vec![6, 3],
        };
        assert_eq!(header.weight_counts().unwrap(), vec![30, 21]);
    }

    #[test]
    fn truncated_header_is_an_io_error() {
        let buf = 3u64.to_le_bytes();
        let err = Header::read(&mut &buf[..]).unwrap_err();
        match err {
            Error::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
