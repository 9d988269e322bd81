//! The pixel matrix buffer type.
//!
//! A [`PixelMatrix`] owns a contiguous, row-major, channel-interleaved sample
//! buffer whose length always equals `width * height * channels`.
//!
//! # Memory Layout
//!
//! ```text
//! Storage: [B G R B G R B G R ...]  ← Row 0
//!          [B G R B G R B G R ...]  ← Row 1
//! ```
//!
//! # Planar data
//!
//! The flat `data` sequence accepted by [`MatrixArgs`] and produced by
//! [`PixelMatrix::to_vec`] is **channel-planar**: every sample of channel 0
//! in row-major order, then channel 1, and so on. For single-channel
//! encodings this is just row-major order.
//!
//! # Construction
//!
//! ```rust
//! use scv_core::{Encoding, MatrixArgs, MatrixInit, PixelMatrix};
//!
//! // Zero-filled
//! let m = PixelMatrix::new(10, 20, Encoding::Bgr).unwrap();
//! assert_eq!(m.len(), 10 * 20 * 3);
//!
//! // Record with data; 8-bit samples wrap modulo 256
//! let m = PixelMatrix::from_init(MatrixInit::Record(MatrixArgs {
//!     width: Some(2),
//!     height: Some(1),
//!     encoding: Some(Encoding::Gray),
//!     data: Some(vec![300.0, 7.0]),
//! }))
//! .unwrap();
//! assert_eq!(m.to_vec(), vec![44.0, 7.0]);
//!
//! // Nested rows infer Float
//! let m = PixelMatrix::from_rows(&[vec![1.5, 2.0], vec![3.0, 4.0]]).unwrap();
//! assert_eq!(m.encoding(), Encoding::Float);
//! ```

use crate::encoding::{Channel, Encoding};
use crate::error::{Error, Result};
use crate::sample::wrap_u8;
use serde::Deserialize;
use serde_json::Value;

/// Sample storage: 8-bit for Gray/BGR/BGRA, `f64` for Float.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    /// 8-bit unsigned samples.
    U8(Vec<u8>),
    /// Double-precision samples.
    F64(Vec<f64>),
}

impl Samples {
    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Samples::U8(v) => v.len(),
            Samples::F64(v) => v.len(),
        }
    }

    /// Returns `true` if there are no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample `i` widened to `f64`.
    #[inline]
    pub fn get(&self, i: usize) -> f64 {
        match self {
            Samples::U8(v) => f64::from(v[i]),
            Samples::F64(v) => v[i],
        }
    }

    /// All samples widened to `f64`.
    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            Samples::U8(v) => v.iter().map(|&s| f64::from(s)).collect(),
            Samples::F64(v) => v.clone(),
        }
    }

    /// Raw bytes; `f64` samples are written little-endian.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            Samples::U8(v) => v.clone(),
            Samples::F64(v) => v.iter().flat_map(|s| s.to_le_bytes()).collect(),
        }
    }
}

/// Mutable view of a matrix's storage.
///
/// The slices keep the storage length and variant fixed.
#[derive(Debug)]
pub enum SamplesMut<'a> {
    /// 8-bit unsigned samples.
    U8(&'a mut [u8]),
    /// Double-precision samples.
    F64(&'a mut [f64]),
}

/// One channel of a matrix, detached for external consumption.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelBuffer {
    /// Channel identity.
    pub channel: Channel,
    /// `width * height` samples in row-major order.
    pub samples: Samples,
}

impl ChannelBuffer {
    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if the buffer holds no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Raw bytes; Float buffers are little-endian `f64`.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples.to_le_bytes()
    }
}

/// Record form of matrix construction.
///
/// Deserializes from `{width, height, type?, data?}`; `encoding` is accepted
/// as an alias of `type`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MatrixArgs {
    /// Width in pixels.
    pub width: Option<i64>,
    /// Height in pixels.
    pub height: Option<i64>,
    /// Encoding; Float when `data` is given, Gray otherwise.
    #[serde(rename = "type", alias = "encoding")]
    pub encoding: Option<Encoding>,
    /// Channel-planar samples.
    pub data: Option<Vec<f64>>,
}

/// The accepted construction forms.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixInit {
    /// `{width, height, type?, data?}`
    Record(MatrixArgs),
    /// Rectangular rows of numbers, Float encoded.
    Rows(Vec<Vec<f64>>),
    /// `(width, height, type?)`, zero-filled.
    Dims {
        /// Width in pixels.
        width: i64,
        /// Height in pixels.
        height: i64,
        /// Encoding, Gray when absent.
        encoding: Option<Encoding>,
    },
}

impl MatrixInit {
    /// Classifies a JSON value into one of the construction forms.
    ///
    /// Objects are records, arrays of arrays are rows, and arrays of two or
    /// three numbers are dimensions. Anything else is a shape error.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => {
                let width = map.get("width").map(|v| json_int(v, "width")).transpose()?;
                let height = map.get("height").map(|v| json_int(v, "height")).transpose()?;
                let encoding = map
                    .get("type")
                    .or_else(|| map.get("encoding"))
                    .map(json_encoding)
                    .transpose()?;
                let data = match map.get("data") {
                    None | Some(Value::Null) => None,
                    Some(Value::Array(items)) => Some(json_numbers(items, "data must contain numbers")?),
                    Some(_) => return Err(Error::shape("data must be an array of numbers")),
                };
                Ok(MatrixInit::Record(MatrixArgs {
                    width,
                    height,
                    encoding,
                    data,
                }))
            }
            Value::Array(items) if items.first().is_some_and(Value::is_array) => {
                let rows = items
                    .iter()
                    .map(|row| match row {
                        Value::Array(cells) => {
                            json_numbers(cells, "all items in the rows must be numbers")
                        }
                        _ => Err(Error::shape("every row must be an array")),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(MatrixInit::Rows(rows))
            }
            Value::Array(items) if items.len() == 2 || items.len() == 3 => {
                let width = json_int(&items[0], "width")?;
                let height = json_int(&items[1], "height")?;
                let encoding = items.get(2).map(json_encoding).transpose()?;
                Ok(MatrixInit::Dims {
                    width,
                    height,
                    encoding,
                })
            }
            _ => Err(Error::shape(
                "expected either an object with a subset of fields {width, height, type?, data?}, \
                 an array of rows, or (width, height, type?)",
            )),
        }
    }
}

fn json_int(value: &Value, field: &str) -> Result<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        .ok_or_else(|| Error::shape(format!("{field} must be an integer")))
}

fn json_encoding(value: &Value) -> Result<Encoding> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().and_then(Encoding::from_id),
        Value::String(s) => s.parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| Error::shape("type must be one of [Gray, BGR, BGRA, Float]"))
}

fn json_numbers(items: &[Value], msg: &str) -> Result<Vec<f64>> {
    items
        .iter()
        .map(|v| v.as_f64().ok_or_else(|| Error::shape(msg)))
        .collect()
}

/// A 2D pixel buffer with a fixed [`Encoding`].
#[derive(Debug, Clone, PartialEq)]
pub struct PixelMatrix {
    width: usize,
    height: usize,
    encoding: Encoding,
    samples: Samples,
}

impl PixelMatrix {
    /// Creates a zero-filled matrix.
    pub fn new(width: usize, height: usize, encoding: Encoding) -> Result<Self> {
        let len = sample_count(width, height, encoding)?;
        let samples = if encoding.is_u8() {
            Samples::U8(vec![0; len])
        } else {
            Samples::F64(vec![0.0; len])
        };
        Ok(Self {
            width,
            height,
            encoding,
            samples,
        })
    }

    /// Wraps existing interleaved storage.
    ///
    /// The sample variant must match the encoding and the length must equal
    /// `width * height * channels`.
    pub fn from_samples(width: usize, height: usize, encoding: Encoding, samples: Samples) -> Result<Self> {
        let expected = sample_count(width, height, encoding)?;
        if samples.len() != expected {
            return Err(Error::shape(format!(
                "expected {expected} samples for a {width}x{height} {encoding} matrix, got {}",
                samples.len()
            )));
        }
        match (&samples, encoding.is_u8()) {
            (Samples::U8(_), true) | (Samples::F64(_), false) => Ok(Self {
                width,
                height,
                encoding,
                samples,
            }),
            _ => Err(Error::shape(format!(
                "sample storage does not match the {encoding} encoding"
            ))),
        }
    }

    /// Wraps interleaved 8-bit storage.
    #[inline]
    pub fn from_u8(width: usize, height: usize, encoding: Encoding, data: Vec<u8>) -> Result<Self> {
        Self::from_samples(width, height, encoding, Samples::U8(data))
    }

    /// Wraps row-major `f64` storage as a Float matrix.
    #[inline]
    pub fn from_f64(width: usize, height: usize, data: Vec<f64>) -> Result<Self> {
        Self::from_samples(width, height, Encoding::Float, Samples::F64(data))
    }

    /// Builds a matrix from channel-planar numbers.
    ///
    /// 8-bit encodings truncate each value toward zero and wrap it modulo 256.
    pub fn from_planar(width: usize, height: usize, encoding: Encoding, data: &[f64]) -> Result<Self> {
        let len = sample_count(width, height, encoding)?;
        let channels = encoding.channels();
        let plane = width * height;
        if data.len() != len {
            return Err(Error::shape(
                "data must contain width * height * channels elements",
            ));
        }
        let mut m = Self::new(width, height, encoding)?;
        match &mut m.samples {
            Samples::U8(out) => {
                for (c, chunk) in data.chunks_exact(plane).enumerate() {
                    for (i, &v) in chunk.iter().enumerate() {
                        out[i * channels + c] = wrap_u8(v);
                    }
                }
            }
            Samples::F64(out) => out.copy_from_slice(data),
        }
        Ok(m)
    }

    /// A 2×3 Float matrix holding the affine coefficients `[a, b, c, d, e, f]`
    /// row by row.
    pub fn from_affine(coeffs: [f64; 6]) -> Self {
        Self {
            width: 3,
            height: 2,
            encoding: Encoding::Float,
            samples: Samples::F64(coeffs.to_vec()),
        }
    }

    /// Builds a Float matrix from rectangular rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let first = rows
            .first()
            .ok_or_else(|| Error::shape("row array must have at least one element"))?;
        if first.is_empty() {
            return Err(Error::shape("each row must have at least one element"));
        }
        if rows.iter().any(|r| r.len() != first.len()) {
            return Err(Error::shape("all rows must have the same length"));
        }
        let data: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::from_f64(first.len(), rows.len(), data)
    }

    /// Dispatches on the construction form.
    pub fn from_init(init: MatrixInit) -> Result<Self> {
        match init {
            MatrixInit::Record(args) => {
                let width = args.width.ok_or_else(|| Error::shape("missing width: width and height are required"))?;
                let height = args.height.ok_or_else(|| Error::shape("missing height: width and height are required"))?;
                let (width, height) = positive_dims(width, height)?;
                match args.data {
                    Some(data) => {
                        let encoding = args.encoding.unwrap_or(Encoding::Float);
                        Self::from_planar(width, height, encoding, &data)
                    }
                    None => Self::new(width, height, args.encoding.unwrap_or_default()),
                }
            }
            MatrixInit::Rows(rows) => Self::from_rows(&rows),
            MatrixInit::Dims {
                width,
                height,
                encoding,
            } => {
                let (width, height) = positive_dims(width, height)?;
                Self::new(width, height, encoding.unwrap_or_default())
            }
        }
    }

    /// Parses a JSON value and constructs from it.
    ///
    /// ```rust
    /// use scv_core::PixelMatrix;
    ///
    /// let v = serde_json::json!({"width": 2, "height": 1, "type": "Gray", "data": [1, 2]});
    /// let m = PixelMatrix::from_json(&v).unwrap();
    /// assert_eq!(m.to_vec(), vec![1.0, 2.0]);
    /// ```
    pub fn from_json(value: &Value) -> Result<Self> {
        Self::from_init(MatrixInit::from_json(value)?)
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Sample encoding.
    #[inline]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Interleaved channel count.
    #[inline]
    pub fn channels(&self) -> usize {
        self.encoding.channels()
    }

    /// Total sample count.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`; a matrix has at least one pixel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `(width, height)`.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Interleaved sample storage.
    #[inline]
    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    /// Mutable interleaved sample storage.
    #[inline]
    pub fn samples_mut(&mut self) -> SamplesMut<'_> {
        match &mut self.samples {
            Samples::U8(v) => SamplesMut::U8(v),
            Samples::F64(v) => SamplesMut::F64(v),
        }
    }

    /// Consumes the matrix, returning its storage.
    #[inline]
    pub fn into_samples(self) -> Samples {
        self.samples
    }

    /// 8-bit storage, if the encoding is 8-bit.
    pub fn as_u8(&self) -> Option<&[u8]> {
        match &self.samples {
            Samples::U8(v) => Some(v),
            Samples::F64(_) => None,
        }
    }

    /// Mutable 8-bit storage, if the encoding is 8-bit.
    pub fn as_u8_mut(&mut self) -> Option<&mut [u8]> {
        match &mut self.samples {
            Samples::U8(v) => Some(v),
            Samples::F64(_) => None,
        }
    }

    /// `f64` storage, if the encoding is Float.
    pub fn as_f64(&self) -> Option<&[f64]> {
        match &self.samples {
            Samples::F64(v) => Some(v),
            Samples::U8(_) => None,
        }
    }

    /// Mutable `f64` storage, if the encoding is Float.
    pub fn as_f64_mut(&mut self) -> Option<&mut [f64]> {
        match &mut self.samples {
            Samples::F64(v) => Some(v),
            Samples::U8(_) => None,
        }
    }

    /// Sample at `(x, y)` in channel `c`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates or channel are out of range.
    #[inline]
    pub fn sample(&self, x: usize, y: usize, c: usize) -> f64 {
        assert!(x < self.width && y < self.height && c < self.channels());
        self.samples.get((y * self.width + x) * self.channels() + c)
    }

    /// Channel-planar sequence of all samples.
    pub fn to_vec(&self) -> Vec<f64> {
        let channels = self.channels();
        let plane = self.width * self.height;
        let mut out = Vec::with_capacity(self.len());
        for c in 0..channels {
            out.extend((0..plane).map(|i| self.samples.get(i * channels + c)));
        }
        out
    }

    /// One buffer per channel, in storage order.
    pub fn channel_buffers(&self) -> Vec<ChannelBuffer> {
        let channels = self.channels();
        self.encoding
            .channel_ids()
            .iter()
            .enumerate()
            .map(|(c, &channel)| {
                let samples = match &self.samples {
                    Samples::U8(v) => Samples::U8(v.iter().skip(c).step_by(channels).copied().collect()),
                    Samples::F64(v) => Samples::F64(v.iter().skip(c).step_by(channels).copied().collect()),
                };
                ChannelBuffer { channel, samples }
            })
            .collect()
    }

    /// Interleaved raw bytes; Float samples are little-endian `f64`.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.samples.to_le_bytes()
    }

    /// Returns `true` if both matrices share width, height and channel count.
    pub fn same_shape(&self, other: &PixelMatrix) -> bool {
        self.dims() == other.dims() && self.channels() == other.channels()
    }
}

/// Largest accepted width or height.
pub const MAX_DIM: usize = i32::MAX as usize;

/// Checks `width × height` and returns the interleaved sample count.
///
/// Fails when a side is zero or above [`MAX_DIM`], or when the storage
/// would not fit in the address space.
///
/// ```rust
/// use scv_core::Encoding;
/// use scv_core::matrix::sample_count;
///
/// assert_eq!(sample_count(4, 3, Encoding::Bgra).unwrap(), 48);
/// assert!(sample_count(0, 3, Encoding::Gray).is_err());
/// assert!(sample_count(1 << 31, 1 << 31, Encoding::Bgr).is_err());
/// ```
pub fn sample_count(width: usize, height: usize, encoding: Encoding) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::shape(format!(
            "width and height must be positive integers, got {width}x{height}"
        )));
    }
    if width > MAX_DIM || height > MAX_DIM {
        return Err(Error::shape(format!(
            "width and height must not exceed {MAX_DIM}, got {width}x{height}"
        )));
    }
    let sample_size = if encoding.is_u8() {
        size_of::<u8>()
    } else {
        size_of::<f64>()
    };
    width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(encoding.channels()))
        .filter(|&n| n.checked_mul(sample_size).is_some_and(|bytes| bytes <= isize::MAX as usize))
        .ok_or_else(|| Error::shape(format!("matrix dimensions overflow: {width}x{height} {encoding}")))
}

/// Converts signed construction dimensions, rejecting non-positive values.
fn positive_dims(width: i64, height: i64) -> Result<(usize, usize)> {
    match (usize::try_from(width), usize::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(Error::shape(format!(
            "width and height must be positive integers, got {width}x{height}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn bgr_3x3() -> PixelMatrix {
        let data: Vec<f64> = (1..=9).flat_map(|v| [v as f64; 3]).collect();
        PixelMatrix::from_planar(3, 3, Encoding::Bgr, &data).unwrap()
    }

    #[test]
    fn test_sample_count() {
        for e in Encoding::ALL {
            let m = PixelMatrix::new(10, 20, e).unwrap();
            assert_eq!(m.len(), 10 * 20 * e.channels());
            assert_eq!(m.to_vec().len(), m.len());
        }
    }

    #[test]
    fn test_wraparound() {
        let m = PixelMatrix::from_planar(1, 1, Encoding::Gray, &[300.0]).unwrap();
        assert_eq!(m.to_vec(), vec![44.0]);
        let m = PixelMatrix::from_planar(2, 1, Encoding::Float, &[300.0, -1.5]).unwrap();
        assert_eq!(m.to_vec(), vec![300.0, -1.5]);
    }

    #[test]
    fn test_record_defaults() {
        let m = PixelMatrix::from_init(MatrixInit::Record(MatrixArgs {
            width: Some(2),
            height: Some(2),
            encoding: None,
            data: Some(vec![1.5, 2.0, 3.0, 4.0]),
        }))
        .unwrap();
        assert_eq!(m.encoding(), Encoding::Float);

        let m = PixelMatrix::from_init(MatrixInit::Record(MatrixArgs {
            width: Some(2),
            height: Some(3),
            ..Default::default()
        }))
        .unwrap();
        assert_eq!(m.encoding(), Encoding::Gray);
        assert!(m.to_vec().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_record_errors() {
        let missing = PixelMatrix::from_init(MatrixInit::Record(MatrixArgs {
            width: Some(2),
            ..Default::default()
        }))
        .unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::Shape);
        assert!(missing.to_string().starts_with("missing height"));

        let wrong_len = PixelMatrix::from_init(MatrixInit::Record(MatrixArgs {
            width: Some(2),
            height: Some(2),
            encoding: Some(Encoding::Bgr),
            data: Some(vec![0.0; 4]),
        }))
        .unwrap_err();
        assert_eq!(wrong_len.kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_dims_form() {
        let m = PixelMatrix::from_init(MatrixInit::Dims {
            width: 10,
            height: 20,
            encoding: Some(Encoding::Bgr),
        })
        .unwrap();
        assert_eq!(m.dims(), (10, 20));
        assert_eq!(m.encoding(), Encoding::Bgr);
        assert!(PixelMatrix::from_init(MatrixInit::Dims { width: 0, height: 2, encoding: None }).is_err());
    }

    #[test]
    fn test_rows() {
        let m = PixelMatrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.dims(), (3, 2));
        assert_eq!(m.sample(2, 1, 0), 6.0);
        assert_eq!(
            PixelMatrix::from_rows(&[vec![1.0], vec![1.0, 2.0]]).unwrap_err().to_string(),
            "all rows must have the same length"
        );
        assert!(PixelMatrix::from_rows(&[]).is_err());
        assert!(PixelMatrix::from_rows(&[vec![]]).is_err());
    }

    #[test]
    fn test_planar_layout() {
        let m = bgr_3x3();
        assert_eq!(&m.to_bytes()[..9], &[1, 4, 7, 1, 4, 7, 1, 4, 7]);
        let buffers = m.channel_buffers();
        assert_eq!(buffers.len(), 3);
        assert_eq!(buffers[0].channel, Channel::Blue);
        assert_eq!(buffers[0].samples, Samples::U8(vec![1, 1, 1, 2, 2, 2, 3, 3, 3]));
        assert_eq!(buffers[1].samples, Samples::U8(vec![4, 4, 4, 5, 5, 5, 6, 6, 6]));
        assert_eq!(buffers[2].channel, Channel::Red);
        assert_eq!(buffers[2].samples, Samples::U8(vec![7, 7, 7, 8, 8, 8, 9, 9, 9]));
        let planar: Vec<f64> = (1..=9).flat_map(|v| [v as f64; 3]).collect();
        assert_eq!(m.to_vec(), planar);
    }

    #[test]
    fn test_float_buffers_are_le_f64() {
        let m = PixelMatrix::from_f64(2, 1, vec![1.5, -2.0]).unwrap();
        let buffers = m.channel_buffers();
        assert_eq!(buffers[0].channel, Channel::Float);
        let bytes = buffers[0].to_le_bytes();
        assert_eq!(bytes.len(), 16);
        assert_eq!(f64::from_le_bytes(bytes[8..16].try_into().unwrap()), -2.0);
    }

    #[test]
    fn test_from_samples_checks() {
        assert!(PixelMatrix::from_u8(2, 2, Encoding::Float, vec![0; 4]).is_err());
        assert!(PixelMatrix::from_u8(2, 2, Encoding::Bgr, vec![0; 4]).is_err());
        assert!(PixelMatrix::from_u8(2, 2, Encoding::Bgr, vec![0; 12]).is_ok());
    }

    #[test]
    fn test_json_forms() {
        let m = PixelMatrix::from_json(&json!([[1, 2], [3, 4.5]])).unwrap();
        assert_eq!(m.encoding(), Encoding::Float);
        assert_eq!(m.to_vec(), vec![1.0, 2.0, 3.0, 4.5]);

        let m = PixelMatrix::from_json(&json!([4, 2, "BGRA"])).unwrap();
        assert_eq!((m.width(), m.height(), m.encoding()), (4, 2, Encoding::Bgra));

        let m = PixelMatrix::from_json(&json!({"width": 1, "height": 1, "type": 0, "data": [300]})).unwrap();
        assert_eq!(m.to_vec(), vec![44.0]);
    }

    #[test]
    fn test_oversized_dims_are_shape_errors() {
        let err = PixelMatrix::from_json(&json!({"width": 4294967296u64, "height": 4294967296u64, "encoding": "BGR"}))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);

        let err = PixelMatrix::new(usize::MAX, 2, Encoding::Gray).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
        assert!(err.to_string().contains(&format!("{}x2", usize::MAX)), "{err}");
        assert!(!err.to_string().contains('-'), "{err}");

        let huge = MAX_DIM;
        assert!(PixelMatrix::new(huge, huge, Encoding::Float).is_err());
        assert!(PixelMatrix::from_u8(huge + 1, 1, Encoding::Gray, vec![0; 4]).is_err());
        assert!(PixelMatrix::from_planar(huge, huge, Encoding::Bgra, &[0.0; 4]).is_err());
        assert!(PixelMatrix::from_init(MatrixInit::Dims { width: -3, height: 2, encoding: None })
            .unwrap_err()
            .to_string()
            .contains("-3x2"));
    }

    #[test]
    fn test_from_affine() {
        let m = PixelMatrix::from_affine([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.dims(), (3, 2));
        assert_eq!(m.encoding(), Encoding::Float);
        assert_eq!(m.sample(0, 1, 0), 4.0);
    }

    #[test]
    fn test_samples_mut_keeps_length() {
        let mut m = PixelMatrix::new(2, 2, Encoding::Bgr).unwrap();
        match m.samples_mut() {
            SamplesMut::U8(s) => s.fill(9),
            SamplesMut::F64(_) => panic!("expected 8-bit storage"),
        }
        assert_eq!(m.len(), 12);
        assert_eq!(m.to_vec(), vec![9.0; 12]);
    }

    #[test]
    fn test_json_errors() {
        for bad in [
            json!([[1, 2], [3, "x"]]),
            json!([[1, 2], [3]]),
            json!({"width": 1, "height": 1, "data": ["a"]}),
            json!({"width": 1.5, "height": 1}),
            json!({"width": 1, "height": 1, "type": 99}),
            json!("matrix"),
            json!([1]),
        ] {
            let err = PixelMatrix::from_json(&bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Shape, "{bad}");
        }
    }
}
