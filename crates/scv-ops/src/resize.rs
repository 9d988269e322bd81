//! Aspect-aware resizing.
//!
//! A resize first walks a Gaussian pyramid toward the target width (halving
//! or doubling both axes per level), then finishes with a bicubic resample
//! to the exact target size when the pyramid did not land on it.
//!
//! # Size specs
//!
//! | Form | Target |
//! |------|--------|
//! | `320` | width 320, height from the aspect ratio |
//! | `{width}` / `{height}` | one side given, the other from the aspect ratio |
//! | `{width, height}` | both given |
//! | `{scale}` | both sides scaled |
//! | `{xScale, yScale}` | each side scaled independently |
//!
//! Derived sides are rounded half-to-even.
//!
//! # Example
//!
//! ```rust
//! use scv_core::{Encoding, PixelMatrix};
//! use scv_ops::resize::{resize, SizeSpec};
//!
//! let m = PixelMatrix::new(64, 32, Encoding::Bgr).unwrap();
//! let out = resize(&m, &SizeSpec::Width(16)).unwrap();
//! assert_eq!(out.dims(), (16, 8));
//! ```

use crate::filter::{Tap, convolve_separable};
use crate::guard::saturated;
use crate::warp::cubic_weights;
use scv_core::{BorderPolicy, Error, PixelMatrix, Result};
use serde_json::Value;
use tracing::{debug, trace};

/// Requested output size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeSpec {
    /// Target width; height keeps the aspect ratio.
    Width(i64),
    /// Target height; width keeps the aspect ratio.
    Height(i64),
    /// Explicit target size.
    Size {
        /// Target width
        width: i64,
        /// Target height
        height: i64,
    },
    /// Uniform scale factor.
    Scale(f64),
    /// Per-axis scale factors.
    ScaleXY {
        /// Horizontal factor
        x_scale: f64,
        /// Vertical factor
        y_scale: f64,
    },
}

/// Reads a JSON number that holds an integral value.
fn as_int(v: &Value) -> Option<i64> {
    v.as_i64().or_else(|| {
        v.as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

impl SizeSpec {
    /// Parses a loosely-typed size argument.
    ///
    /// A bare number must be a positive integer. A record is matched by the
    /// first complete form among `{width, height}`, `{width}`, `{height}`,
    /// `{scale}` and `{xScale, yScale}`.
    ///
    /// ```rust
    /// use scv_ops::resize::SizeSpec;
    /// use serde_json::json;
    ///
    /// assert_eq!(SizeSpec::from_json(Some(&json!({"scale": 0.5}))).unwrap(), SizeSpec::Scale(0.5));
    /// assert!(SizeSpec::from_json(Some(&json!({}))).is_err());
    /// assert!(SizeSpec::from_json(None).is_err());
    /// ```
    pub fn from_json(value: Option<&Value>) -> Result<Self> {
        match value {
            Some(v @ Value::Number(_)) => match as_int(v) {
                Some(n) if n > 0 => Ok(SizeSpec::Width(n)),
                _ => Err(Error::validation("if sizeSpec is a number it must be a positive integer")),
            },
            Some(Value::Object(obj)) => {
                let int = |key: &str| obj.get(key).and_then(as_int);
                let num = |key: &str| obj.get(key).and_then(Value::as_f64);
                if let (Some(width), Some(height)) = (int("width"), int("height")) {
                    Ok(SizeSpec::Size { width, height })
                } else if let Some(width) = int("width") {
                    Ok(SizeSpec::Width(width))
                } else if let Some(height) = int("height") {
                    Ok(SizeSpec::Height(height))
                } else if let Some(scale) = num("scale") {
                    Ok(SizeSpec::Scale(scale))
                } else if let (Some(x_scale), Some(y_scale)) = (num("xScale"), num("yScale")) {
                    Ok(SizeSpec::ScaleXY { x_scale, y_scale })
                } else {
                    Err(Error::validation("sizeSpec must be a valid sizeSpec object"))
                }
            }
            _ => Err(Error::validation("sizeSpec must be an integer or an object")),
        }
    }

    /// Computes the validated target `(width, height)` for a `width × height`
    /// source.
    pub fn target_size(&self, width: usize, height: usize) -> Result<(usize, usize)> {
        let aspect = height as f64 / width as f64;
        let positive = |f: f64| f.is_finite() && f > 0.0;
        let (w, h) = match *self {
            SizeSpec::Width(w) => {
                if w <= 0 {
                    return Err(Error::validation("width must be a positive integer"));
                }
                (w as f64, (w as f64 * aspect).round_ties_even())
            }
            SizeSpec::Height(h) => {
                if h <= 0 {
                    return Err(Error::validation("height must be a positive integer"));
                }
                ((h as f64 / aspect).round_ties_even(), h as f64)
            }
            SizeSpec::Size { width: w, height: h } => {
                if w <= 0 || h <= 0 {
                    return Err(Error::validation("width and height must be positive integers"));
                }
                (w as f64, h as f64)
            }
            SizeSpec::Scale(s) => {
                if !positive(s) {
                    return Err(Error::validation("scale must be a positive number"));
                }
                (
                    (width as f64 * s).round_ties_even(),
                    (height as f64 * s).round_ties_even(),
                )
            }
            SizeSpec::ScaleXY { x_scale, y_scale } => {
                if !positive(x_scale) || !positive(y_scale) {
                    return Err(Error::validation("xScale and yScale must be positive numbers"));
                }
                (
                    (width as f64 * x_scale).round_ties_even(),
                    (height as f64 * y_scale).round_ties_even(),
                )
            }
        };
        if !(w >= 1.0 && h >= 1.0) {
            return Err(Error::validation("resize target must be at least 1x1"));
        }
        let too_large = || Error::validation(format!("resize target {w}x{h} is too large"));
        if w > i32::MAX as f64 || h > i32::MAX as f64 {
            return Err(too_large());
        }
        let (w, h) = (w as usize, h as usize);
        // Resampling buffers hold up to four f64 channels per pixel.
        w.checked_mul(h)
            .and_then(|n| n.checked_mul(4 * size_of::<f64>()))
            .filter(|&bytes| bytes <= isize::MAX as usize)
            .ok_or_else(too_large)?;
        Ok((w, h))
    }
}

/// Taps for one axis of a 2× pyramid reduction.
fn down_taps(len: usize) -> Vec<Vec<Tap>> {
    const K: [f64; 5] = [1.0, 4.0, 6.0, 4.0, 1.0];
    (0..len.div_ceil(2) as i64)
        .map(|o| {
            K.iter()
                .enumerate()
                .map(|(i, &w)| (BorderPolicy::Reflect101.resolve(2 * o + i as i64 - 2, len), w))
                .collect()
        })
        .collect()
}

/// Taps for one axis of a 2× pyramid expansion.
///
/// Even outputs weigh `(1, 6, 1)` around the source sample, odd outputs
/// `(4, 4)` between neighbours. The sample before the first mirrors the
/// second, the one past the last repeats the last.
fn up_taps(len: usize) -> Vec<Vec<Tap>> {
    let at = |i: i64| -> usize {
        if i < 0 {
            usize::from(len > 1)
        } else {
            (i as usize).min(len - 1)
        }
    };
    (0..len as i64)
        .flat_map(|i| {
            [
                vec![(Some(at(i - 1)), 1.0), (Some(at(i)), 6.0), (Some(at(i + 1)), 1.0)],
                vec![(Some(at(i)), 4.0), (Some(at(i + 1)), 4.0)],
            ]
        })
        .collect()
}

/// Halves `m` with a 5×5 Gaussian, producing `((w+1)/2, (h+1)/2)`.
pub fn pyr_down(m: &PixelMatrix) -> Result<PixelMatrix> {
    let (w, h) = m.dims();
    let out = convolve_separable(&m.samples().to_f64(), w, m.channels(), &down_taps(w), &down_taps(h), 0.0);
    let out = out.into_iter().map(|v| v / 256.0).collect();
    saturated(w.div_ceil(2), h.div_ceil(2), m.encoding(), out)
}

/// Doubles `m` with the interpolating Gaussian, producing `(2w, 2h)`.
pub fn pyr_up(m: &PixelMatrix) -> Result<PixelMatrix> {
    let (w, h) = m.dims();
    let out = convolve_separable(&m.samples().to_f64(), w, m.channels(), &up_taps(w), &up_taps(h), 0.0);
    let out = out.into_iter().map(|v| v / 64.0).collect();
    saturated(w * 2, h * 2, m.encoding(), out)
}

/// Bicubic taps mapping `dst_len` outputs onto `src_len` inputs.
fn cubic_taps(src_len: usize, dst_len: usize) -> Vec<Vec<Tap>> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| {
            let f = (d as f64 + 0.5) * scale - 0.5;
            let base = f.floor();
            let weights = cubic_weights(f - base);
            let base = base as i64;
            weights
                .iter()
                .enumerate()
                .map(|(i, &w)| (BorderPolicy::Replicate.resolve(base - 1 + i as i64, src_len), w))
                .collect()
        })
        .collect()
}

/// Bicubic resample of `m` to exactly `width × height`.
pub fn resize_cubic(m: &PixelMatrix, width: usize, height: usize) -> Result<PixelMatrix> {
    let (w, h) = m.dims();
    let out = convolve_separable(
        &m.samples().to_f64(),
        w,
        m.channels(),
        &cubic_taps(w, width),
        &cubic_taps(h, height),
        0.0,
    );
    saturated(width, height, m.encoding(), out)
}

/// Resizes `m` to an exact `width × height`.
pub fn resize_to(m: &PixelMatrix, width: usize, height: usize) -> Result<PixelMatrix> {
    let mut out = m.clone();
    let mut levels = 0i32;
    if width > out.width() {
        while out.width() * 2 <= width {
            out = pyr_up(&out)?;
            levels += 1;
        }
    } else {
        while out.width() / 2 >= width {
            out = pyr_down(&out)?;
            levels -= 1;
        }
    }
    trace!(levels, width = out.width(), height = out.height(), "pyramid");
    if out.dims() != (width, height) {
        out = resize_cubic(&out, width, height)?;
    }
    Ok(out)
}

/// Resizes `m` according to `spec` into a new matrix.
pub fn resize(m: &PixelMatrix, spec: &SizeSpec) -> Result<PixelMatrix> {
    let (width, height) = spec.target_size(m.width(), m.height())?;
    debug!(from_w = m.width(), from_h = m.height(), width, height, "resize");
    resize_to(m, width, height)
}
