//! PNG encoding and decoding.
//!
//! Decoding expands palettes and low bit depths and strips 16-bit samples to
//! 8 bits, so every image arrives as 8-bit gray, gray+alpha, RGB or RGBA.

use scv_core::{Encoding, Error, PixelMatrix, Result};
use std::io::Cursor;
use tracing::trace;

fn decode_error(e: png::DecodingError) -> Error {
    trace!(error = %e, "png decode failed");
    Error::decode("invalid image data")
}

/// Decodes a PNG payload into a Gray, BGR or BGRA matrix.
pub(crate) fn decode(bytes: &[u8]) -> Result<PixelMatrix> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info().map_err(decode_error)?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| Error::decode("invalid image data"))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader.next_frame(&mut buf).map_err(decode_error)?;
    buf.truncate(info.buffer_size());

    let (width, height) = (info.width as usize, info.height as usize);
    let (encoding, data) = match info.color_type {
        png::ColorType::Grayscale => (Encoding::Gray, buf),
        png::ColorType::GrayscaleAlpha => (
            Encoding::Bgra,
            buf.chunks_exact(2).flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]]).collect(),
        ),
        png::ColorType::Rgb => (
            Encoding::Bgr,
            buf.chunks_exact(3).flat_map(|p| [p[2], p[1], p[0]]).collect(),
        ),
        png::ColorType::Rgba => (
            Encoding::Bgra,
            buf.chunks_exact(4).flat_map(|p| [p[2], p[1], p[0], p[3]]).collect(),
        ),
        other => {
            trace!(color_type = ?other, "unexpected png color type after expansion");
            return Err(Error::decode("invalid image data"));
        }
    };
    PixelMatrix::from_u8(width, height, encoding, data).map_err(|_| Error::decode("invalid image data"))
}

/// Encodes an 8-bit matrix as PNG, keeping its channel layout.
pub(crate) fn encode(m: &PixelMatrix) -> Result<Vec<u8>> {
    let src = m
        .as_u8()
        .ok_or_else(|| Error::validation("only Gray, BGR and BGRA matrices can be encoded"))?;
    let (color_type, data): (png::ColorType, Vec<u8>) = match m.encoding() {
        Encoding::Gray => (png::ColorType::Grayscale, src.to_vec()),
        Encoding::Bgr => (
            png::ColorType::Rgb,
            src.chunks_exact(3).flat_map(|p| [p[2], p[1], p[0]]).collect(),
        ),
        Encoding::Bgra => (
            png::ColorType::Rgba,
            src.chunks_exact(4).flat_map(|p| [p[2], p[1], p[0], p[3]]).collect(),
        ),
        Encoding::Float => {
            return Err(Error::validation("only Gray, BGR and BGRA matrices can be encoded"));
        }
    };
    let (width, height) = (
        u32::try_from(m.width()).map_err(|_| Error::validation("matrix too wide for PNG"))?,
        u32::try_from(m.height()).map_err(|_| Error::validation("matrix too tall for PNG"))?,
    );

    let encode_error = |e: png::EncodingError| Error::validation(format!("PNG encoding failed: {e}"));
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::default());
        let mut writer = encoder.write_header().map_err(encode_error)?;
        writer.write_image_data(&data).map_err(encode_error)?;
        writer.finish().map_err(encode_error)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_bgr() {
        let data: Vec<u8> = (0..48).map(|v| (v * 5) as u8).collect();
        let m = PixelMatrix::from_u8(4, 4, Encoding::Bgr, data).unwrap();
        let bytes = encode(&m).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
        assert_eq!(decode(&bytes).unwrap(), m);
    }

    #[test]
    fn test_round_trip_gray_and_bgra() {
        let gray = PixelMatrix::from_u8(3, 2, Encoding::Gray, vec![0, 50, 100, 150, 200, 250]).unwrap();
        assert_eq!(decode(&encode(&gray).unwrap()).unwrap(), gray);
        let bgra = PixelMatrix::from_u8(1, 2, Encoding::Bgra, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(decode(&encode(&bgra).unwrap()).unwrap(), bgra);
    }

    #[test]
    fn test_truncated_payload() {
        let m = PixelMatrix::new(8, 8, Encoding::Gray).unwrap();
        let bytes = encode(&m).unwrap();
        let err = decode(&bytes[..bytes.len() / 2]).unwrap_err();
        assert_eq!(err.to_string(), "invalid image data");
    }
}
