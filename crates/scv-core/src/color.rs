//! Per-channel color operands.

use crate::encoding::Encoding;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A color value addressed by channel role rather than storage position.
///
/// The same `Rgb { red, green, blue }` value lands on channel 2, 1, 0 of a
/// BGR matrix; [`ColorScalar::to_channels`] does the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorScalar {
    /// Red, green, blue and alpha components.
    Rgba {
        /// Red component
        red: f64,
        /// Green component
        green: f64,
        /// Blue component
        blue: f64,
        /// Alpha component
        alpha: f64,
    },
    /// Red, green and blue components.
    Rgb {
        /// Red component
        red: f64,
        /// Green component
        green: f64,
        /// Blue component
        blue: f64,
    },
    /// One value for every channel.
    Gray(f64),
}

impl ColorScalar {
    /// Shorthand for [`ColorScalar::Rgb`].
    #[inline]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        ColorScalar::Rgb { red, green, blue }
    }

    /// Maps the operand onto `encoding`'s channel order.
    ///
    /// `identity` fills channels the operand does not name (alpha for an
    /// `Rgb` value on BGRA): `0` for addition, `1` for multiplication.
    ///
    /// ```rust
    /// use scv_core::{ColorScalar, Encoding};
    ///
    /// let c = ColorScalar::rgb(0.6, 3.0, 2.0);
    /// assert_eq!(c.to_channels(Encoding::Bgr, 1.0).unwrap(), vec![2.0, 3.0, 0.6]);
    /// assert_eq!(c.to_channels(Encoding::Bgra, 1.0).unwrap(), vec![2.0, 3.0, 0.6, 1.0]);
    /// assert!(c.to_channels(Encoding::Gray, 1.0).is_err());
    /// ```
    pub fn to_channels(&self, encoding: Encoding, identity: f64) -> Result<Vec<f64>> {
        match (*self, encoding) {
            (ColorScalar::Gray(v), e) => {
                let mut out = vec![v; e.channels()];
                if e == Encoding::Bgra {
                    out[3] = identity;
                }
                Ok(out)
            }
            (ColorScalar::Rgb { red, green, blue }, Encoding::Bgr) => Ok(vec![blue, green, red]),
            (ColorScalar::Rgb { red, green, blue }, Encoding::Bgra) => {
                Ok(vec![blue, green, red, identity])
            }
            (ColorScalar::Rgba { red, green, blue, alpha }, Encoding::Bgra) => {
                Ok(vec![blue, green, red, alpha])
            }
            (ColorScalar::Rgba { .. }, Encoding::Bgr) => Err(Error::validation(
                "an alpha component cannot be applied to a BGR matrix",
            )),
            (_, e) => Err(Error::validation(format!(
                "a color with red/green/blue components cannot be applied to a {e} matrix"
            ))),
        }
    }

    /// Maps the color onto a pixel of `encoding` for painting.
    ///
    /// Single-channel encodings receive the BT.601 luma of the color. An
    /// unspecified alpha paints fully opaque.
    pub fn to_pixel(&self, encoding: Encoding) -> Vec<f64> {
        let (red, green, blue, alpha) = match *self {
            ColorScalar::Gray(v) => (v, v, v, 255.0),
            ColorScalar::Rgb { red, green, blue } => (red, green, blue, 255.0),
            ColorScalar::Rgba { red, green, blue, alpha } => (red, green, blue, alpha),
        };
        match encoding {
            Encoding::Gray | Encoding::Float => match *self {
                ColorScalar::Gray(v) => vec![v],
                _ => vec![0.299 * red + 0.587 * green + 0.114 * blue],
            },
            Encoding::Bgr => vec![blue, green, red],
            Encoding::Bgra => vec![blue, green, red, alpha],
        }
    }
}

impl From<f64> for ColorScalar {
    fn from(v: f64) -> Self {
        ColorScalar::Gray(v)
    }
}
