//! Affine warping by inverse mapping.
//!
//! Each destination pixel `(x, y)` is sampled from the source at
//! `M⁻¹ · (x, y, 1)` with a bicubic kernel (A = -0.75). Source coordinates
//! are snapped to a 1/32 sub-pixel grid before the kernel weights are taken,
//! so integer-valued transforms reproduce source samples exactly.
//!
//! - [`rotation_matrix`] - Build a 2×3 rotation about a center
//! - [`warp_affine`] - Apply a 2×3 transform
//! - [`rotate`] - Rotate about a center, filling uncovered pixels with zero
//!
//! # Example
//!
//! ```rust
//! use scv_core::{Encoding, PixelMatrix};
//! use scv_ops::warp::{warp_affine, WarpOptions};
//!
//! let m = PixelMatrix::from_planar(3, 3, Encoding::Gray, &[1., 2., 0., 3., 4., 0., 0., 0., 0.]).unwrap();
//! let transpose = PixelMatrix::from_rows(&[vec![0., 1., 0.], vec![1., 0., 0.]]).unwrap();
//! let out = warp_affine(&m, &transpose, &WarpOptions::default()).unwrap();
//! assert_eq!(out.to_vec(), vec![1., 3., 0., 2., 4., 0., 0., 0., 0.]);
//! ```

use crate::guard::saturated;
use crate::parallel::for_each_row;
use scv_core::{BorderPolicy, Encoding, Error, PixelMatrix, Point, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Sub-pixel grid resolution for source coordinates.
const SUBPIXEL_STEPS: f64 = 32.0;

/// Keys cubic convolution weights for taps at `-1, 0, 1, 2` around a sample
/// offset `t` in `[0, 1)`.
pub(crate) fn cubic_weights(t: f64) -> [f64; 4] {
    const A: f64 = -0.75;
    let c0 = ((A * (t + 1.0) - 5.0 * A) * (t + 1.0) + 8.0 * A) * (t + 1.0) - 4.0 * A;
    let c1 = ((A + 2.0) * t - (A + 3.0)) * t * t + 1.0;
    let c2 = ((A + 2.0) * (1.0 - t) - (A + 3.0)) * (1.0 - t) * (1.0 - t) + 1.0;
    [c0, c1, c2, 1.0 - c0 - c1 - c2]
}

/// Options for [`warp_affine`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WarpOptions {
    /// Out-of-bounds handling; the `Constant` value fills every channel.
    #[serde(default, rename = "borderType", alias = "border")]
    pub border: BorderPolicy,
}

/// Returns the 2×3 Float matrix rotating by `angle` degrees about `center`.
///
/// Positive angles rotate content counter-clockwise on screen (y down), and
/// `center` maps onto itself. `scale` multiplies the linear part.
///
/// ```rust
/// use scv_core::Point;
/// use scv_ops::warp::rotation_matrix;
///
/// let m = rotation_matrix(Point::new(1.0, 1.0), 90.0, 1.0);
/// let v = m.to_vec();
/// assert!((v[1] - 1.0).abs() < 1e-12 && (v[5] - 2.0).abs() < 1e-12);
/// ```
pub fn rotation_matrix(center: Point, angle: f64, scale: f64) -> PixelMatrix {
    let rad = angle.to_radians();
    let a = scale * rad.cos();
    let b = scale * rad.sin();
    PixelMatrix::from_affine([
        a,
        b,
        (1.0 - a) * center.x - b * center.y,
        -b,
        a,
        b * center.x + (1.0 - a) * center.y,
    ])
}

/// Reads the six coefficients of a 2×3 Float transform.
pub fn transform_coefficients(transform: &PixelMatrix) -> Result<[f64; 6]> {
    let invalid = || Error::validation("transformation must be a 2x3 Float matrix");
    if transform.encoding() != Encoding::Float || transform.dims() != (3, 2) {
        return Err(invalid());
    }
    let data = transform.as_f64().ok_or_else(invalid)?;
    let mut out = [0.0; 6];
    out.copy_from_slice(data);
    Ok(out)
}

/// Inverts the affine map `[a b c; d e f]`. A singular map inverts to zero.
pub fn invert_affine(m: [f64; 6]) -> [f64; 6] {
    let det = m[0] * m[4] - m[1] * m[3];
    let d = if det != 0.0 { 1.0 / det } else { 0.0 };
    let a11 = m[4] * d;
    let a22 = m[0] * d;
    let a12 = -m[1] * d;
    let a21 = -m[3] * d;
    let b1 = -a11 * m[2] - a12 * m[5];
    let b2 = -a21 * m[2] - a22 * m[5];
    [a11, a12, b1, a21, a22, b2]
}

/// Splits a coordinate into its integer tap and snapped fraction.
#[inline]
fn snap(v: f64) -> (i64, f64) {
    let q = (v * SUBPIXEL_STEPS + 0.5).floor() as i64;
    (q.div_euclid(32), q.rem_euclid(32) as f64 / SUBPIXEL_STEPS)
}

/// Warps `m` by the forward coefficients `coeffs` (already validated).
pub fn warp_with(m: &PixelMatrix, coeffs: [f64; 6], border: BorderPolicy) -> Result<PixelMatrix> {
    let (w, h) = m.dims();
    let ch = m.channels();
    let inv = invert_affine(coeffs);
    let src = m.samples().to_f64();
    let fill = border.constant();
    trace!(width = w, height = h, ?border, "warp_affine");

    let mut dst = vec![0.0f64; src.len()];
    for_each_row(&mut dst, w * ch, |y, row| {
        let yf = y as f64;
        for x in 0..w {
            let xf = x as f64;
            let (ix, fx) = snap(inv[0] * xf + inv[1] * yf + inv[2]);
            let (iy, fy) = snap(inv[3] * xf + inv[4] * yf + inv[5]);
            let wx = cubic_weights(fx);
            let wy = cubic_weights(fy);

            let cols: [Option<usize>; 4] = std::array::from_fn(|i| border.resolve(ix - 1 + i as i64, w));
            let rows: [Option<usize>; 4] = std::array::from_fn(|j| border.resolve(iy - 1 + j as i64, h));

            for c in 0..ch {
                let mut acc = 0.0;
                for (j, ry) in rows.iter().enumerate() {
                    let mut line = 0.0;
                    for (i, rx) in cols.iter().enumerate() {
                        let v = match (rx, ry) {
                            (Some(px), Some(py)) => src[(py * w + px) * ch + c],
                            _ => fill,
                        };
                        line += wx[i] * v;
                    }
                    acc += wy[j] * line;
                }
                row[x * ch + c] = acc;
            }
        }
    });

    saturated(w, h, m.encoding(), dst)
}

/// Warps `m` through the forward 2×3 `transform`.
///
/// The output has the input's size and encoding.
pub fn warp_affine(m: &PixelMatrix, transform: &PixelMatrix, options: &WarpOptions) -> Result<PixelMatrix> {
    let coeffs = transform_coefficients(transform)?;
    warp_with(m, coeffs, options.border)
}

/// Rotation argument: a bare angle or an angle with an optional center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RotateSpec {
    /// Angle in degrees about the image center.
    Angle(f64),
    /// Angle in degrees about `(x_center, y_center)`.
    Options {
        /// Angle in degrees.
        angle: f64,
        /// Center column, `floor(width / 2)` when absent.
        #[serde(default, rename = "xCenter")]
        x_center: Option<f64>,
        /// Center row, `floor(height / 2)` when absent.
        #[serde(default, rename = "yCenter")]
        y_center: Option<f64>,
    },
}

/// Resolves a [`RotateSpec`] against `m` into `(center, angle)`.
pub fn rotate_params(m: &PixelMatrix, spec: &RotateSpec) -> Result<(Point, f64)> {
    let (w, h) = m.dims();
    let default_center = Point::new((w / 2) as f64, (h / 2) as f64);
    let (center, angle) = match *spec {
        RotateSpec::Angle(angle) => (default_center, angle),
        RotateSpec::Options {
            angle,
            x_center,
            y_center,
        } => (
            Point::new(
                x_center.unwrap_or(default_center.x),
                y_center.unwrap_or(default_center.y),
            ),
            angle,
        ),
    };
    if !angle.is_finite() || !center.x.is_finite() || !center.y.is_finite() {
        return Err(Error::validation("rotation angle and center must be finite numbers"));
    }
    Ok((center, angle))
}

/// Rotates `m` about a center; uncovered pixels become zero.
pub fn rotate(m: &PixelMatrix, spec: &RotateSpec) -> Result<PixelMatrix> {
    let (center, angle) = rotate_params(m, spec)?;
    debug!(angle, cx = center.x, cy = center.y, "rotate");
    let transform = rotation_matrix(center, angle, 1.0);
    warp_affine(
        m,
        &transform,
        &WarpOptions {
            border: BorderPolicy::Constant(0.0),
        },
    )
}
