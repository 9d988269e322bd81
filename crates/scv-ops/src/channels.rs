//! Channel decomposition, recomposition and table lookup.
//!
//! - [`split`] - One single-channel matrix per channel
//! - [`merge`] - Inverse of split
//! - [`lookup`] - Remap 8-bit samples through a 256-entry table

use scv_core::{Encoding, Error, PixelMatrix, Result, Samples};
use tracing::trace;

/// Splits `m` into single-channel matrices in storage order.
///
/// Color channels come back Gray-encoded; Gray and Float inputs yield a
/// single copy of themselves.
///
/// ```rust
/// use scv_core::{Encoding, PixelMatrix};
/// use scv_ops::channels::split;
///
/// let m = PixelMatrix::new(4, 4, Encoding::Bgra).unwrap();
/// let parts = split(&m).unwrap();
/// assert_eq!(parts.len(), 4);
/// assert!(parts.iter().all(|p| p.encoding() == Encoding::Gray));
/// ```
pub fn split(m: &PixelMatrix) -> Result<Vec<PixelMatrix>> {
    if m.channels() == 1 {
        return Ok(vec![m.clone()]);
    }
    m.channel_buffers()
        .into_iter()
        .map(|buf| PixelMatrix::from_samples(m.width(), m.height(), Encoding::Gray, buf.samples))
        .collect()
}

/// Checks merge inputs and returns the output encoding.
pub fn merge_encoding(parts: &[&PixelMatrix]) -> Result<Encoding> {
    let first = parts
        .first()
        .ok_or_else(|| Error::shape("merge requires at least one matrix"))?;
    if parts.iter().any(|p| p.dims() != first.dims()) {
        return Err(Error::shape("all matrices passed to merge must have the same size"));
    }
    match parts.len() {
        1 if first.channels() == 1 => Ok(first.encoding()),
        3 | 4 => {
            if parts.iter().any(|p| p.encoding() != Encoding::Gray) {
                return Err(Error::shape("merging 3 or 4 matrices requires Gray inputs"));
            }
            Ok(if parts.len() == 3 { Encoding::Bgr } else { Encoding::Bgra })
        }
        n => Err(Error::shape(format!(
            "merge expects 1, 3 or 4 single-channel matrices, got {n}"
        ))),
    }
}

/// Interleaves single-channel matrices into one matrix.
pub fn merge(parts: &[&PixelMatrix]) -> Result<PixelMatrix> {
    let encoding = merge_encoding(parts)?;
    let (width, height) = parts[0].dims();
    trace!(width, height, encoding = %encoding, "merge");

    if parts.len() == 1 {
        return Ok(parts[0].clone());
    }
    let channels = parts.len();
    let mut out = vec![0u8; width * height * channels];
    for (c, part) in parts.iter().enumerate() {
        let src = part
            .as_u8()
            .ok_or_else(|| Error::shape("merge inputs must be 8-bit"))?;
        for (i, &v) in src.iter().enumerate() {
            out[i * channels + c] = v;
        }
    }
    PixelMatrix::from_u8(width, height, encoding, out)
}

/// Checks a lookup table against the image it will remap.
pub fn validate_lookup(m: &PixelMatrix, table: &PixelMatrix) -> Result<()> {
    if table.channels() != 1 || table.len() != 256 {
        return Err(Error::validation(
            "lookup table must be a Gray or Float matrix with 256 values",
        ));
    }
    if !m.encoding().is_u8() {
        return Err(Error::validation("lookup requires a Gray, BGR or BGRA matrix"));
    }
    if table.encoding() == Encoding::Float && m.channels() != 1 {
        return Err(Error::validation(
            "a Float lookup table can only be applied to a single-channel matrix",
        ));
    }
    Ok(())
}

/// Replaces every sample `v` of `m` with `table[v]`, into a new matrix.
///
/// The result has `m`'s dimensions and `table`'s encoding.
///
/// ```rust
/// use scv_core::{Encoding, PixelMatrix};
/// use scv_ops::channels::lookup;
///
/// let table: Vec<f64> = (0..256).map(|v| f64::from(255 - v)).collect();
/// let table = PixelMatrix::from_planar(256, 1, Encoding::Gray, &table).unwrap();
/// let m = PixelMatrix::from_planar(2, 1, Encoding::Gray, &[0.0, 10.0]).unwrap();
/// assert_eq!(lookup(&m, &table).unwrap().to_vec(), vec![255.0, 245.0]);
/// ```
pub fn lookup(m: &PixelMatrix, table: &PixelMatrix) -> Result<PixelMatrix> {
    validate_lookup(m, table)?;
    let src = m
        .as_u8()
        .ok_or_else(|| Error::validation("lookup requires an 8-bit matrix"))?;
    let (width, height) = m.dims();
    match table.samples() {
        Samples::U8(lut) => {
            let out = src.iter().map(|&v| lut[usize::from(v)]).collect();
            PixelMatrix::from_u8(width, height, m.encoding(), out)
        }
        Samples::F64(lut) => {
            let out = src.iter().map(|&v| lut[usize::from(v)]).collect();
            PixelMatrix::from_f64(width, height, out)
        }
    }
}
