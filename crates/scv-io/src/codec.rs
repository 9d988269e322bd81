//! In-memory image codec.
//!
//! [`decode`] sniffs the container from its magic bytes; [`encode`] takes the
//! target format explicitly.
//!
//! # Example
//!
//! ```rust
//! use scv_core::{Encoding, PixelMatrix};
//! use scv_io::codec::{decode, encode, EncodeFormat};
//!
//! let m = PixelMatrix::from_u8(2, 1, Encoding::Gray, vec![10, 20]).unwrap();
//! let bytes = encode(&m, EncodeFormat::Png).unwrap();
//! let bgr = decode(&bytes, Some(Encoding::Bgr)).unwrap();
//! assert_eq!(bgr.as_u8().unwrap(), &[10, 10, 10, 20, 20, 20]);
//! ```

use scv_core::{Encoding, Error, PixelMatrix, Result};
use scv_ops::color::{Conversion, convert_color};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Container format for [`encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncodeFormat {
    /// Lossless; keeps Gray, BGR and BGRA layouts.
    #[serde(rename = "PNG", alias = "png")]
    Png,
    /// Lossy; alpha is dropped.
    #[serde(rename = "JPEG", alias = "jpeg")]
    Jpeg,
}

impl EncodeFormat {
    /// Stable numeric identifier (`PNG = 0`, `JPEG = 1`).
    pub const fn id(self) -> i64 {
        match self {
            EncodeFormat::Png => 0,
            EncodeFormat::Jpeg => 1,
        }
    }

    /// Picks a format from a file extension (`png`, `jpg`, `jpeg`).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(EncodeFormat::Png),
            "jpg" | "jpeg" => Some(EncodeFormat::Jpeg),
            _ => None,
        }
    }
}

impl fmt::Display for EncodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EncodeFormat::Png => "PNG",
            EncodeFormat::Jpeg => "JPEG",
        })
    }
}

impl FromStr for EncodeFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        EncodeFormat::from_extension(s)
            .ok_or_else(|| Error::validation(format!("encode format must be one of [PNG, JPEG], got {s:?}")))
    }
}

/// Checks that `m` can be encoded.
pub fn validate_encode(m: &PixelMatrix) -> Result<()> {
    if !m.encoding().is_u8() {
        return Err(Error::validation("only Gray, BGR and BGRA matrices can be encoded"));
    }
    Ok(())
}

/// Checks a decode hint; only the 8-bit encodings are allowed.
pub fn validate_hint(hint: Option<Encoding>) -> Result<()> {
    match hint {
        Some(Encoding::Float) => Err(Error::shape("decode hint must be one of [Gray, BGR, BGRA]")),
        _ => Ok(()),
    }
}

/// Encodes `m` as `format`.
pub fn encode(m: &PixelMatrix, format: EncodeFormat) -> Result<Vec<u8>> {
    encode_with_quality(m, format, DEFAULT_JPEG_QUALITY)
}

/// JPEG quality used by [`encode`].
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Encodes `m` as `format`, with an explicit JPEG quality (1..=100).
pub fn encode_with_quality(m: &PixelMatrix, format: EncodeFormat, quality: u8) -> Result<Vec<u8>> {
    validate_encode(m)?;
    debug!(format = %format, width = m.width(), height = m.height(), encoding = %m.encoding(), "encode");
    match format {
        #[cfg(feature = "png")]
        EncodeFormat::Png => crate::png::encode(m),
        #[cfg(feature = "jpeg")]
        EncodeFormat::Jpeg => crate::jpeg::encode(m, quality),
        #[allow(unreachable_patterns)]
        other => {
            let _ = quality;
            Err(Error::validation(format!("{other} support is not compiled in")))
        }
    }
}

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Identifies the container of an encoded payload.
pub fn sniff(bytes: &[u8]) -> Option<EncodeFormat> {
    if bytes.starts_with(PNG_MAGIC) {
        Some(EncodeFormat::Png)
    } else if bytes.starts_with(JPEG_MAGIC) {
        Some(EncodeFormat::Jpeg)
    } else {
        None
    }
}

fn conversion(from: Encoding, to: Encoding) -> Option<Conversion> {
    Conversion::ALL
        .into_iter()
        .find(|c| c.source() == from && c.target() == to)
}

/// Decodes an encoded payload.
///
/// Without a hint the decoded layout picks the encoding (gray gives Gray,
/// color gives BGR, anything with alpha gives BGRA). With a hint the
/// pixels are converted to it.
pub fn decode(bytes: &[u8], hint: Option<Encoding>) -> Result<PixelMatrix> {
    validate_hint(hint)?;
    let decoded = match sniff(bytes) {
        #[cfg(feature = "png")]
        Some(EncodeFormat::Png) => crate::png::decode(bytes)?,
        #[cfg(feature = "jpeg")]
        Some(EncodeFormat::Jpeg) => crate::jpeg::decode(bytes)?,
        _ => return Err(Error::decode("invalid image data")),
    };
    debug!(
        width = decoded.width(),
        height = decoded.height(),
        encoding = %decoded.encoding(),
        ?hint,
        "decode"
    );
    match hint.and_then(|h| conversion(decoded.encoding(), h)) {
        Some(c) => convert_color(&decoded, c),
        None => Ok(decoded),
    }
}
