//! Separable Gaussian blur.
//!
//! The blur runs an X pass then a Y pass, each a 1-D convolution whose taps
//! are resolved through a [`BorderPolicy`]. The same two-pass machinery backs
//! the pyramid and bicubic stages of [`crate::resize`].
//!
//! # Kernels
//!
//! With no sigma (or a sigma ≤ 0), sizes 1, 3, 5 and 7 use fixed binomial-like
//! tables; larger sizes derive `σ = 0.3·((k-1)·0.5 - 1) + 0.8`.
//!
//! # Example
//!
//! ```rust
//! use scv_core::PixelMatrix;
//! use scv_ops::filter::{gaussian_blur, BlurOptions, KernelSize};
//!
//! let m = PixelMatrix::from_f64(3, 3, vec![0., 0., 0., 0., 1., 0., 0., 0., 0.]).unwrap();
//! let opts = BlurOptions { kernel_size: KernelSize::Square(3), ..Default::default() };
//! let out = gaussian_blur(&m, &opts).unwrap();
//! assert_eq!(out.to_vec()[4], 0.25);
//! ```

use crate::guard::saturated;
use crate::parallel::for_each_row;
use scv_core::{BorderPolicy, Error, PixelMatrix, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One source tap: the resolved index (`None` reads the border fill) and
/// its weight.
pub(crate) type Tap = (Option<usize>, f64);

/// Runs a horizontal then a vertical 1-D pass over interleaved samples.
///
/// `cols[x]` lists the source columns feeding output column `x`; `rows[y]`
/// lists the intermediate rows feeding output row `y`.
pub(crate) fn convolve_separable(
    src: &[f64],
    width: usize,
    channels: usize,
    cols: &[Vec<Tap>],
    rows: &[Vec<Tap>],
    fill: f64,
) -> Vec<f64> {
    let src_stride = width * channels;
    let out_stride = cols.len() * channels;
    let height = src.len() / src_stride.max(1);

    let mut tmp = vec![0.0f64; out_stride * height];
    for_each_row(&mut tmp, out_stride, |y, row| {
        let line = &src[y * src_stride..(y + 1) * src_stride];
        for (x, taps) in cols.iter().enumerate() {
            for c in 0..channels {
                row[x * channels + c] = taps
                    .iter()
                    .map(|&(i, w)| w * i.map_or(fill, |i| line[i * channels + c]))
                    .sum();
            }
        }
    });

    let mut dst = vec![0.0f64; out_stride * rows.len()];
    for_each_row(&mut dst, out_stride, |y, row| {
        for &(r, w) in &rows[y] {
            match r {
                Some(r) => {
                    let line = &tmp[r * out_stride..(r + 1) * out_stride];
                    row.iter_mut().zip(line).for_each(|(d, s)| *d += w * s);
                }
                None => row.iter_mut().for_each(|d| *d += w * fill),
            }
        }
    });
    dst
}

/// Centered taps of `kernel` for every output index along an axis of `len`.
pub(crate) fn centered_taps(kernel: &[f64], len: usize, border: BorderPolicy) -> Vec<Vec<Tap>> {
    let half = (kernel.len() / 2) as i64;
    (0..len as i64)
        .map(|o| {
            kernel
                .iter()
                .enumerate()
                .map(|(i, &w)| (border.resolve(o + i as i64 - half, len), w))
                .collect()
        })
        .collect()
}

/// Kernel size: one odd side for both axes, or separate odd sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KernelSize {
    /// `k × k`
    Square(i64),
    /// `width × height`
    Rect {
        /// Horizontal extent
        width: i64,
        /// Vertical extent
        height: i64,
    },
}

impl Default for KernelSize {
    fn default() -> Self {
        KernelSize::Square(3)
    }
}

impl KernelSize {
    /// Returns validated `(width, height)`.
    pub fn dims(self) -> Result<(usize, usize)> {
        let (w, h) = match self {
            KernelSize::Square(k) => (k, k),
            KernelSize::Rect { width, height } => (width, height),
        };
        let odd = |v: i64| v > 0 && v % 2 == 1;
        if !odd(w) || !odd(h) {
            return Err(Error::validation(format!(
                "kernelSize must be a positive odd integer or a {{width, height}} record of positive odd integers, got {w}x{h}"
            )));
        }
        Ok((w as usize, h as usize))
    }
}

fn default_blur_border() -> BorderPolicy {
    BorderPolicy::Reflect101
}

/// Options for [`gaussian_blur`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlurOptions {
    /// Kernel extent, 3×3 by default.
    #[serde(default)]
    pub kernel_size: KernelSize,
    /// Sigma for both axes; wins over `x_sigma` / `y_sigma`.
    #[serde(default)]
    pub sigma: Option<f64>,
    /// Sigma for both axes unless `y_sigma` is given.
    #[serde(default)]
    pub x_sigma: Option<f64>,
    /// Sigma for the y axis.
    #[serde(default)]
    pub y_sigma: Option<f64>,
    /// Out-of-bounds handling.
    #[serde(default = "default_blur_border", alias = "borderType")]
    pub border: BorderPolicy,
}

impl Default for BlurOptions {
    fn default() -> Self {
        Self {
            kernel_size: KernelSize::default(),
            sigma: None,
            x_sigma: None,
            y_sigma: None,
            border: default_blur_border(),
        }
    }
}

impl BlurOptions {
    /// Resolves `(x_sigma, y_sigma)`; values ≤ 0 mean "derive from size".
    pub fn sigmas(&self) -> (f64, f64) {
        let sx = self.sigma.or(self.x_sigma).unwrap_or(0.0);
        let sy = self.sigma.or(self.y_sigma).unwrap_or(sx);
        (sx, if sy > 0.0 { sy } else { sx })
    }
}

/// Checks blur options before any work is queued.
pub fn validate_blur(options: &BlurOptions) -> Result<(usize, usize)> {
    let dims = options.kernel_size.dims()?;
    let finite = [options.sigma, options.x_sigma, options.y_sigma]
        .iter()
        .flatten()
        .all(|s| s.is_finite());
    if !finite {
        return Err(Error::validation("sigma, xSigma and ySigma must be finite numbers"));
    }
    if !options.border.constant().is_finite() {
        return Err(Error::validation("border constant must be a finite number"));
    }
    Ok(dims)
}

/// Returns the normalized 1-D Gaussian of `size` taps.
///
/// A `sigma` ≤ 0 selects the fixed table for sizes up to 7, or the
/// size-derived sigma otherwise.
///
/// ```rust
/// use scv_ops::filter::gaussian_kernel;
///
/// assert_eq!(gaussian_kernel(3, 0.0), vec![0.25, 0.5, 0.25]);
/// ```
pub fn gaussian_kernel(size: usize, sigma: f64) -> Vec<f64> {
    if sigma <= 0.0 {
        match size {
            1 => return vec![1.0],
            3 => return vec![0.25, 0.5, 0.25],
            5 => return [1.0, 4.0, 6.0, 4.0, 1.0].map(|v| v / 16.0).to_vec(),
            7 => return [1.0, 3.5, 7.0, 9.0, 7.0, 3.5, 1.0].map(|v| v / 32.0).to_vec(),
            _ => {}
        }
    }
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let half = (size / 2) as f64;
    let scale = -0.5 / (sigma * sigma);
    let raw: Vec<f64> = (0..size)
        .map(|i| {
            let x = i as f64 - half;
            (scale * x * x).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / sum).collect()
}

/// Blurs `m` into a new matrix of the same size and encoding.
pub fn gaussian_blur(m: &PixelMatrix, options: &BlurOptions) -> Result<PixelMatrix> {
    let (kw, kh) = validate_blur(options)?;
    let (sx, sy) = options.sigmas();
    let (w, h) = m.dims();
    debug!(kw, kh, sx, sy, border = ?options.border, "gaussian_blur");

    let cols = centered_taps(&gaussian_kernel(kw, sx), w, options.border);
    let rows = centered_taps(&gaussian_kernel(kh, sy), h, options.border);
    let out = convolve_separable(
        &m.samples().to_f64(),
        w,
        m.channels(),
        &cols,
        &rows,
        options.border.constant(),
    );
    saturated(w, h, m.encoding(), out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use scv_core::{Encoding, ErrorKind};

    fn impulse(size: usize, value: f64) -> PixelMatrix {
        let mut data = vec![0.0; size * size];
        data[size * size / 2] = value;
        PixelMatrix::from_f64(size, size, data).unwrap()
    }

    fn tenths(m: &PixelMatrix) -> Vec<f64> {
        m.to_vec().iter().map(|v| (v * 10.0).round()).collect()
    }

    fn opts(kernel_size: KernelSize) -> BlurOptions {
        BlurOptions {
            kernel_size,
            ..Default::default()
        }
    }

    #[test]
    fn test_kernel_tables() {
        assert_eq!(gaussian_kernel(1, 0.0), vec![1.0]);
        assert_eq!(gaussian_kernel(5, -1.0), vec![0.0625, 0.25, 0.375, 0.25, 0.0625]);
        let k9 = gaussian_kernel(9, 0.0);
        assert_eq!(k9.len(), 9);
        assert_abs_diff_eq!(k9.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(k9[0], k9[8], epsilon = 1e-15);
    }

    #[test]
    fn test_blur_kernel_5() {
        let out = gaussian_blur(&impulse(5, 10.0), &opts(KernelSize::Square(5))).unwrap();
        #[rustfmt::skip]
        let expected = vec![
            2., 3., 5., 3., 2.,
            3., 6., 9., 6., 3.,
            5., 9., 14., 9., 5.,
            3., 6., 9., 6., 3.,
            2., 3., 5., 3., 2.,
        ];
        assert_eq!(tenths(&out), expected);
    }

    #[test]
    fn test_blur_horizontal_only() {
        let k = KernelSize::Rect { width: 5, height: 1 };
        let out = gaussian_blur(&impulse(5, 10.0), &opts(k)).unwrap();
        let t = tenths(&out);
        assert_eq!(&t[10..15], &[13., 25., 38., 25., 13.]);
        assert!(t[..10].iter().chain(&t[15..]).all(|&v| v == 0.0));
    }

    #[test]
    fn test_blur_sigma() {
        let o = BlurOptions {
            sigma: Some(0.8),
            ..opts(KernelSize::Square(5))
        };
        let out = gaussian_blur(&impulse(5, 10.0), &o).unwrap();
        #[rustfmt::skip]
        let expected = vec![
            0., 1., 2., 1., 0.,
            1., 5., 11., 5., 1.,
            2., 11., 25., 11., 2.,
            1., 5., 11., 5., 1.,
            0., 1., 2., 1., 0.,
        ];
        assert_eq!(tenths(&out), expected);
    }

    #[test]
    fn test_blur_xy_sigma() {
        let o = BlurOptions {
            x_sigma: Some(0.5),
            y_sigma: Some(0.5),
            ..Default::default()
        };
        let out = gaussian_blur(&impulse(3, 1.0), &o).unwrap();
        assert_eq!(tenths(&out), vec![0., 2., 0., 2., 6., 2., 0., 2., 0.]);

        let o = BlurOptions {
            sigma: Some(0.6),
            ..Default::default()
        };
        let out = gaussian_blur(&impulse(3, 1.0), &o).unwrap();
        assert_eq!(tenths(&out), vec![1., 2., 1., 2., 4., 2., 1., 2., 1.]);
    }

    #[test]
    fn test_sigma_precedence() {
        let o = BlurOptions {
            sigma: Some(2.0),
            x_sigma: Some(1.0),
            y_sigma: Some(3.0),
            ..Default::default()
        };
        assert_eq!(o.sigmas(), (2.0, 2.0));
        let o = BlurOptions {
            x_sigma: Some(1.0),
            ..Default::default()
        };
        assert_eq!(o.sigmas(), (1.0, 1.0));
        let o = BlurOptions {
            x_sigma: Some(1.0),
            y_sigma: Some(0.0),
            ..Default::default()
        };
        assert_eq!(o.sigmas(), (1.0, 1.0));
    }

    #[test]
    fn test_blur_u8_constant_keeps_flat() {
        let m = PixelMatrix::from_planar(4, 4, Encoding::Bgr, &[100.0; 48]).unwrap();
        let out = gaussian_blur(&m, &opts(KernelSize::Square(5))).unwrap();
        assert_eq!(out, m);
    }

    #[test]
    fn test_blur_constant_border() {
        let m = PixelMatrix::from_f64(1, 1, vec![8.0]).unwrap();
        let o = BlurOptions {
            border: BorderPolicy::Constant(0.0),
            ..Default::default()
        };
        let out = gaussian_blur(&m, &o).unwrap();
        assert_eq!(out.to_vec(), vec![2.0]);
    }

    #[test]
    fn test_invalid_kernel() {
        for k in [KernelSize::Square(4), KernelSize::Square(0), KernelSize::Rect { width: 3, height: -1 }] {
            let err = gaussian_blur(&impulse(3, 1.0), &opts(k)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[test]
    fn test_options_deserialize() {
        let o: BlurOptions = serde_json::from_str(r#"{"kernelSize": {"width": 5, "height": 1}, "xSigma": 1.5}"#).unwrap();
        assert_eq!(o.kernel_size, KernelSize::Rect { width: 5, height: 1 });
        assert_eq!(o.x_sigma, Some(1.5));
        assert_eq!(o.border, BorderPolicy::Reflect101);
    }
}
