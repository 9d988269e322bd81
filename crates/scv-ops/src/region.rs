//! Bounds-checked region copy and splice.
//!
//! - [`crop`] - Copy a sub-region into a new matrix
//! - [`set`] - Overwrite a region of the receiver with another matrix
//!
//! Rect and point coordinates are truncated toward zero before checking.
//!
//! # Example
//!
//! ```rust
//! use scv_core::{Encoding, PixelMatrix, Rect};
//! use scv_ops::region::crop;
//!
//! let m = PixelMatrix::from_planar(3, 3, Encoding::Gray, &[1., 2., 3., 4., 5., 6., 7., 8., 9.]).unwrap();
//! let c = crop(&m, &Rect::new(0.0, 0.0, 2.0, 3.0)).unwrap();
//! assert_eq!(c.to_vec(), vec![1., 2., 4., 5., 7., 8.]);
//! ```

use scv_core::{Error, PixelMatrix, Point, Rect, Result, Samples, SamplesMut};
use tracing::trace;

/// A validated integer region inside a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Left column
    pub x: usize,
    /// Top row
    pub y: usize,
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
}

fn check_inside(op: &'static str, m: &PixelMatrix, x: i64, y: i64, w: i64, h: i64) -> Result<Region> {
    let (mw, mh) = m.dims();
    let (x1, y1) = (x.saturating_add(w), y.saturating_add(h));
    if x < 0 || y < 0 || x1 > mw as i64 || y1 > mh as i64 {
        return Err(Error::bounds(op, (x, x1), (y, y1), mw, mh));
    }
    Ok(Region {
        x: x as usize,
        y: y as usize,
        width: w as usize,
        height: h as usize,
    })
}

/// Validates a crop rect against `m`.
pub fn crop_region(m: &PixelMatrix, rect: &Rect) -> Result<Region> {
    let (x, y, w, h) = (rect.x as i64, rect.y as i64, rect.width as i64, rect.height as i64);
    if w <= 0 || h <= 0 {
        return Err(Error::validation(format!(
            "crop rect must have a positive width and height, got {w}x{h}"
        )));
    }
    check_inside("crop", m, x, y, w, h)
}

/// Copies a validated region into a new matrix.
pub fn extract(m: &PixelMatrix, region: Region) -> Result<PixelMatrix> {
    let ch = m.channels();
    let stride = m.width() * ch;
    let span = region.width * ch;
    let rows = region.y..region.y + region.height;
    let start = region.x * ch;

    let samples = match m.samples() {
        Samples::U8(src) => Samples::U8(
            rows.flat_map(|row| src[row * stride + start..row * stride + start + span].iter().copied())
                .collect(),
        ),
        Samples::F64(src) => Samples::F64(
            rows.flat_map(|row| src[row * stride + start..row * stride + start + span].iter().copied())
                .collect(),
        ),
    };
    PixelMatrix::from_samples(region.width, region.height, m.encoding(), samples)
}

/// Copies `rect` out of `m` into a new, independent matrix.
pub fn crop(m: &PixelMatrix, rect: &Rect) -> Result<PixelMatrix> {
    let region = crop_region(m, rect)?;
    trace!(x = region.x, y = region.y, width = region.width, height = region.height, "crop");
    extract(m, region)
}

/// Validates placing `source` at `at` inside `target`.
pub fn set_region(target: &PixelMatrix, source: &PixelMatrix, at: Point) -> Result<Region> {
    if target.encoding() != source.encoding() {
        return Err(Error::shape(format!(
            "the type of source matrix ({}) must be the same as the target matrix ({})",
            source.encoding(),
            target.encoding()
        )));
    }
    check_inside(
        "set",
        target,
        at.x as i64,
        at.y as i64,
        source.width() as i64,
        source.height() as i64,
    )
}

/// Overwrites `target` with `source` at `at`, in place.
pub fn set(target: &mut PixelMatrix, source: &PixelMatrix, at: Point) -> Result<()> {
    let region = set_region(target, source, at)?;
    trace!(x = region.x, y = region.y, width = region.width, height = region.height, "set");

    let ch = target.channels();
    let stride = target.width() * ch;
    let span = region.width * ch;
    let start = region.x * ch;
    match (target.samples_mut(), source.samples()) {
        (SamplesMut::U8(dst), Samples::U8(src)) => {
            for (row, chunk) in src.chunks_exact(span).enumerate() {
                let off = (region.y + row) * stride + start;
                dst[off..off + span].copy_from_slice(chunk);
            }
        }
        (SamplesMut::F64(dst), Samples::F64(src)) => {
            for (row, chunk) in src.chunks_exact(span).enumerate() {
                let off = (region.y + row) * stride + start;
                dst[off..off + span].copy_from_slice(chunk);
            }
        }
        _ => return Err(Error::shape("source and target storage differ")),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scv_core::{Encoding, ErrorKind};

    fn gray_3x3() -> PixelMatrix {
        PixelMatrix::from_planar(3, 3, Encoding::Gray, &[1., 2., 3., 4., 5., 6., 7., 8., 9.]).unwrap()
    }

    #[test]
    fn test_crop() {
        let m = gray_3x3();
        let c = crop(&m, &Rect::new(1.0, 1.0, 2.0, 2.0)).unwrap();
        assert_eq!(c.dims(), (2, 2));
        assert_eq!(c.to_vec(), vec![5., 6., 8., 9.]);
        assert_eq!(m, gray_3x3());
    }

    #[test]
    fn test_crop_bgr() {
        let data: Vec<f64> = (0..27).map(f64::from).collect();
        let m = PixelMatrix::from_planar(3, 3, Encoding::Bgr, &data).unwrap();
        let c = crop(&m, &Rect::new(2.0, 0.0, 1.0, 2.0)).unwrap();
        assert_eq!(c.to_vec(), vec![2., 5., 11., 14., 20., 23.]);
    }

    #[test]
    fn test_crop_out_of_bounds() {
        let err = crop(&gray_3x3(), &Rect::new(10.0, 1.0, 2.0, 2.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Bounds);
        assert_eq!(
            err.to_string(),
            "crop (x=10..12, y=1..3) goes outside the matrix bounds (w=3, h=3)"
        );
        let err = crop(&gray_3x3(), &Rect::new(-1.0, 0.0, 2.0, 2.0)).unwrap_err();
        assert!(err.is_bounds_error());
    }

    #[test]
    fn test_crop_empty_rect() {
        let err = crop(&gray_3x3(), &Rect::new(0.0, 0.0, 0.0, 2.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_set() {
        let mut target = PixelMatrix::new(3, 3, Encoding::Gray).unwrap();
        let source = PixelMatrix::from_planar(2, 2, Encoding::Gray, &[1., 2., 3., 4.]).unwrap();
        set(&mut target, &source, Point::new(1.0, 1.0)).unwrap();
        assert_eq!(target.to_vec(), vec![0., 0., 0., 0., 1., 2., 0., 3., 4.]);
    }

    #[test]
    fn test_set_out_of_bounds_leaves_target() {
        let mut target = gray_3x3();
        let source = PixelMatrix::new(2, 2, Encoding::Gray).unwrap();
        let err = set(&mut target, &source, Point::new(2.0, 2.0)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "set (x=2..4, y=2..4) goes outside the matrix bounds (w=3, h=3)"
        );
        assert_eq!(target, gray_3x3());
    }

    #[test]
    fn test_set_type_mismatch() {
        let mut target = gray_3x3();
        let source = PixelMatrix::new(1, 1, Encoding::Float).unwrap();
        let err = set(&mut target, &source, Point::new(0.0, 0.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }
}
