//! Color-space conversion and color temperature.
//!
//! - [`convert_color`] - Fixed per-pixel conversions between Gray, BGR and BGRA
//! - [`color_temperature`] - Warm or cool an image toward a black-body tint
//!
//! Gray is computed with 14-bit fixed point weights
//! (`0.114 B + 0.587 G + 0.299 R`), rounding half up.

use crate::guard::ensure_encoding;
use crate::parallel::for_each_row;
use scv_core::sample::{saturate_even_u8, saturate_u8};
use scv_core::{Encoding, Error, PixelMatrix, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A conversion between two 8-bit encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conversion {
    /// BGR to luma
    #[serde(rename = "BGRToGray")]
    BgrToGray,
    /// Luma replicated to B, G and R
    #[serde(rename = "GrayToBGR")]
    GrayToBgr,
    /// Adds an opaque alpha channel
    #[serde(rename = "BGRToBGRA")]
    BgrToBgra,
    /// Drops alpha
    #[serde(rename = "BGRAToBGR")]
    BgraToBgr,
    /// BGRA to luma, ignoring alpha
    #[serde(rename = "BGRAToGray")]
    BgraToGray,
    /// Luma replicated to B, G and R with opaque alpha
    #[serde(rename = "GrayToBGRA")]
    GrayToBgra,
}

impl Conversion {
    /// Every conversion.
    pub const ALL: [Conversion; 6] = [
        Conversion::BgrToGray,
        Conversion::GrayToBgr,
        Conversion::BgrToBgra,
        Conversion::BgraToBgr,
        Conversion::BgraToGray,
        Conversion::GrayToBgra,
    ];

    /// Encoding the input must have.
    pub fn source(self) -> Encoding {
        match self {
            Conversion::BgrToGray | Conversion::BgrToBgra => Encoding::Bgr,
            Conversion::GrayToBgr | Conversion::GrayToBgra => Encoding::Gray,
            Conversion::BgraToBgr | Conversion::BgraToGray => Encoding::Bgra,
        }
    }

    /// Encoding of the output.
    pub fn target(self) -> Encoding {
        match self {
            Conversion::BgrToGray | Conversion::BgraToGray => Encoding::Gray,
            Conversion::GrayToBgr | Conversion::BgraToBgr => Encoding::Bgr,
            Conversion::BgrToBgra | Conversion::GrayToBgra => Encoding::Bgra,
        }
    }

    /// Display name, e.g. `BGRToGray`.
    pub fn name(self) -> &'static str {
        match self {
            Conversion::BgrToGray => "BGRToGray",
            Conversion::GrayToBgr => "GrayToBGR",
            Conversion::BgrToBgra => "BGRToBGRA",
            Conversion::BgraToBgr => "BGRAToBGR",
            Conversion::BgraToGray => "BGRAToGray",
            Conversion::GrayToBgra => "GrayToBGRA",
        }
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Conversion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Conversion::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<&str> = Conversion::ALL.iter().map(|c| c.name()).collect();
                Error::validation(format!("conversion must be one of [{}], got {s:?}", names.join(", ")))
            })
    }
}

#[inline]
fn luma(b: u8, g: u8, r: u8) -> u8 {
    const SHIFT: u32 = 14;
    let v = u32::from(b) * 1868 + u32::from(g) * 9617 + u32::from(r) * 4899 + (1 << (SHIFT - 1));
    (v >> SHIFT) as u8
}

/// Checks that `conversion` applies to `m`.
pub fn validate_conversion(m: &PixelMatrix, conversion: Conversion) -> Result<()> {
    if m.encoding() != conversion.source() {
        return Err(Error::validation(format!(
            "{conversion} requires a {} matrix, got {}",
            conversion.source(),
            m.encoding()
        )));
    }
    Ok(())
}

/// Converts `m` into a new matrix of `conversion.target()` encoding.
///
/// ```rust
/// use scv_core::{Encoding, PixelMatrix};
/// use scv_ops::color::{convert_color, Conversion};
///
/// let m = PixelMatrix::from_planar(1, 1, Encoding::Gray, &[7.0]).unwrap();
/// let bgr = convert_color(&m, Conversion::GrayToBgr).unwrap();
/// assert_eq!(bgr.to_vec(), vec![7.0, 7.0, 7.0]);
/// ```
pub fn convert_color(m: &PixelMatrix, conversion: Conversion) -> Result<PixelMatrix> {
    validate_conversion(m, conversion)?;
    let src = m
        .as_u8()
        .ok_or_else(|| Error::validation("color conversion requires an 8-bit matrix"))?;
    let (w, h) = m.dims();
    let in_ch = conversion.source().channels();
    let out: Vec<u8> = match conversion {
        Conversion::BgrToGray | Conversion::BgraToGray => {
            src.chunks_exact(in_ch).map(|p| luma(p[0], p[1], p[2])).collect()
        }
        Conversion::GrayToBgr => src.iter().flat_map(|&v| [v, v, v]).collect(),
        Conversion::GrayToBgra => src.iter().flat_map(|&v| [v, v, v, u8::MAX]).collect(),
        Conversion::BgrToBgra => src.chunks_exact(3).flat_map(|p| [p[0], p[1], p[2], u8::MAX]).collect(),
        Conversion::BgraToBgr => src.chunks_exact(4).flat_map(|p| [p[0], p[1], p[2]]).collect(),
    };
    PixelMatrix::from_u8(w, h, conversion.target(), out)
}

// 8-bit HLS: H in 0..180, L and S in 0..255.

fn bgr_to_hls(b: u8, g: u8, r: u8) -> [u8; 3] {
    const SCALE: f32 = 1.0 / 255.0;
    let (b, g, r) = (f32::from(b) * SCALE, f32::from(g) * SCALE, f32::from(r) * SCALE);
    let vmax = r.max(g).max(b);
    let vmin = r.min(g).min(b);
    let mut diff = vmax - vmin;
    let l = (vmax + vmin) * 0.5;
    let (mut h, mut s) = (0.0f32, 0.0f32);
    if diff > f32::EPSILON {
        s = if l < 0.5 {
            diff / (vmax + vmin)
        } else {
            diff / (2.0 - vmax - vmin)
        };
        diff = 60.0 / diff;
        h = if vmax == r {
            (g - b) * diff
        } else if vmax == g {
            (b - r) * diff + 120.0
        } else {
            (r - g) * diff + 240.0
        };
        if h < 0.0 {
            h += 360.0;
        }
    }
    [
        saturate_even_u8(f64::from(h * 0.5)),
        saturate_even_u8(f64::from(l * 255.0)),
        saturate_even_u8(f64::from(s * 255.0)),
    ]
}

fn hls_to_bgr(h: u8, l: u8, s: u8) -> [u8; 3] {
    const SCALE: f32 = 1.0 / 255.0;
    const SECTORS: [[usize; 3]; 6] = [[1, 3, 0], [1, 0, 2], [3, 0, 1], [0, 2, 1], [0, 1, 3], [2, 1, 0]];
    let l = f32::from(l) * SCALE;
    let s = f32::from(s) * SCALE;
    let (b, g, r) = if s == 0.0 {
        (l, l, l)
    } else {
        let p2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p1 = 2.0 * l - p2;
        let mut h = f32::from(h) * (6.0 / 180.0);
        while h >= 6.0 {
            h -= 6.0;
        }
        let sector = h.floor() as usize;
        h -= sector as f32;
        let tab = [p2, p1, p1 + (p2 - p1) * (1.0 - h), p1 + (p2 - p1) * h];
        let idx = SECTORS[sector];
        (tab[idx[0]], tab[idx[1]], tab[idx[2]])
    };
    [b, g, r].map(|v| saturate_even_u8(f64::from(v * 255.0)))
}

/// Black-body tint for `kelvin`, as `[b, g, r]`.
///
/// ```rust
/// use scv_ops::color::kelvin_to_bgr;
///
/// assert_eq!(kelvin_to_bgr(6600.0)[2], 255);
/// ```
pub fn kelvin_to_bgr(kelvin: f64) -> [u8; 3] {
    let t = kelvin / 100.0;
    let r = if t <= 66.0 {
        255.0
    } else {
        329.698727446 * (t - 60.0).powf(-0.1332047592)
    };
    let g = if t <= 66.0 {
        99.4708025861 * t.ln() - 161.1195681661
    } else {
        288.1221695283 * (t - 60.0).powf(-0.0755148492)
    };
    let b = if t >= 66.0 {
        255.0
    } else {
        138.5177312231 * (t - 10.0).ln() - 305.0447927307
    };
    [saturate_u8(b), saturate_u8(g), saturate_u8(r)]
}

/// Checks color temperature arguments.
pub fn validate_temperature(m: &PixelMatrix, kelvin: f64, strength: f64) -> Result<()> {
    ensure_encoding(m, &[Encoding::Bgr, Encoding::Bgra], "colorTemperature")?;
    if !(1000.0..=40000.0).contains(&kelvin) {
        return Err(Error::validation("temperature must be between 1000K and 40000K"));
    }
    if !(0.0..=1.0).contains(&strength) {
        return Err(Error::validation("strength must be between 0 and 1"));
    }
    Ok(())
}

/// Shifts `m` toward the tint of `kelvin` by `strength`, keeping each
/// pixel's HLS lightness. Alpha is copied through.
pub fn color_temperature(m: &PixelMatrix, kelvin: f64, strength: f64) -> Result<PixelMatrix> {
    validate_temperature(m, kelvin, strength)?;
    let src = m
        .as_u8()
        .ok_or_else(|| Error::validation("colorTemperature requires an 8-bit matrix"))?;
    let tint = kelvin_to_bgr(kelvin);
    let alpha = strength * 0.5;
    debug!(kelvin, strength, ?tint, "color_temperature");

    let tint_part = tint.map(|t| saturate_even_u8(alpha * f64::from(t)));
    let ch = m.channels();
    let mut out = src.to_vec();
    for_each_row(&mut out, m.width() * ch, |_, row| {
        for px in row.chunks_exact_mut(ch) {
            let mut blended = [0u8; 3];
            for c in 0..3 {
                let own = saturate_even_u8((1.0 - alpha) * f64::from(px[c]));
                blended[c] = own.saturating_add(tint_part[c]);
            }
            let original = bgr_to_hls(px[0], px[1], px[2]);
            let shifted = bgr_to_hls(blended[0], blended[1], blended[2]);
            let bgr = hls_to_bgr(shifted[0], original[1], shifted[2]);
            px[..3].copy_from_slice(&bgr);
        }
    });
    PixelMatrix::from_u8(m.width(), m.height(), m.encoding(), out)
}
