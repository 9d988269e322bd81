//! Encoding and shape guards shared by the operations.
//!
//! Every operation validates its inputs in full before touching storage, so
//! a failed call never leaves a matrix partially written.

use scv_core::sample::saturate_u8;
use scv_core::{Encoding, Error, PixelMatrix, Result, Samples};

/// Fails unless `m` has one of the `allowed` encodings.
///
/// ```rust
/// use scv_core::{Encoding, PixelMatrix};
/// use scv_ops::guard::ensure_encoding;
///
/// let m = PixelMatrix::new(2, 2, Encoding::Float).unwrap();
/// assert!(ensure_encoding(&m, &[Encoding::Bgr, Encoding::Bgra], "colorTemperature").is_err());
/// ```
pub fn ensure_encoding(m: &PixelMatrix, allowed: &[Encoding], op: &str) -> Result<()> {
    if allowed.contains(&m.encoding()) {
        return Ok(());
    }
    let names: Vec<&str> = allowed.iter().map(|e| e.name()).collect();
    Err(Error::validation(format!(
        "{op} requires a matrix of type [{}], got {}",
        names.join(", "),
        m.encoding()
    )))
}

/// Fails unless both matrices share width, height and channel count.
pub fn ensure_same_shape(a: &PixelMatrix, b: &PixelMatrix, op: &str) -> Result<()> {
    if a.same_shape(b) {
        return Ok(());
    }
    Err(Error::shape(format!(
        "{op}: matrices must have the same size and channel count ({}x{}x{} vs {}x{}x{})",
        a.width(),
        a.height(),
        a.channels(),
        b.width(),
        b.height(),
        b.channels()
    )))
}

/// Builds a matrix from interleaved `f64` values, saturating for 8-bit
/// encodings.
pub(crate) fn saturated(width: usize, height: usize, encoding: Encoding, data: Vec<f64>) -> Result<PixelMatrix> {
    let samples = if encoding.is_u8() {
        Samples::U8(data.into_iter().map(saturate_u8).collect())
    } else {
        Samples::F64(data)
    };
    PixelMatrix::from_samples(width, height, encoding, samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scv_core::ErrorKind;

    #[test]
    fn test_ensure_encoding() {
        let m = PixelMatrix::new(1, 1, Encoding::Bgr).unwrap();
        assert!(ensure_encoding(&m, &[Encoding::Bgr], "op").is_ok());
        let err = ensure_encoding(&m, &[Encoding::Gray], "op").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("BGR"));
    }

    #[test]
    fn test_ensure_same_shape() {
        let a = PixelMatrix::new(2, 2, Encoding::Gray).unwrap();
        let b = PixelMatrix::new(2, 2, Encoding::Float).unwrap();
        let c = PixelMatrix::new(2, 2, Encoding::Bgr).unwrap();
        assert!(ensure_same_shape(&a, &b, "add").is_ok());
        assert_eq!(ensure_same_shape(&a, &c, "add").unwrap_err().kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_saturated() {
        let m = saturated(3, 1, Encoding::Gray, vec![-4.0, 12.5, 300.0]).unwrap();
        assert_eq!(m.as_u8().unwrap(), &[0, 13, 255]);
        let f = saturated(1, 1, Encoding::Float, vec![-4.0]).unwrap();
        assert_eq!(f.as_f64().unwrap(), &[-4.0]);
    }
}
