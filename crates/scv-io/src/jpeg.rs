//! JPEG encoding and decoding.

use scv_core::{Encoding, Error, PixelMatrix, Result};
use std::io::Cursor;
use tracing::trace;

/// Decodes a baseline or progressive JPEG into a Gray or BGR matrix.
pub(crate) fn decode(bytes: &[u8]) -> Result<PixelMatrix> {
    let mut decoder = jpeg_decoder::Decoder::new(Cursor::new(bytes));
    let pixels = decoder.decode().map_err(|e| {
        trace!(error = %e, "jpeg decode failed");
        Error::decode("invalid image data")
    })?;
    let info = decoder
        .info()
        .ok_or_else(|| Error::decode("invalid image data"))?;

    let (width, height) = (usize::from(info.width), usize::from(info.height));
    let (encoding, data) = match info.pixel_format {
        jpeg_decoder::PixelFormat::L8 => (Encoding::Gray, pixels),
        jpeg_decoder::PixelFormat::L16 => (Encoding::Gray, pixels.chunks_exact(2).map(|p| p[0]).collect()),
        jpeg_decoder::PixelFormat::RGB24 => (
            Encoding::Bgr,
            pixels.chunks_exact(3).flat_map(|p| [p[2], p[1], p[0]]).collect(),
        ),
        jpeg_decoder::PixelFormat::CMYK32 => (
            Encoding::Bgr,
            pixels
                .chunks_exact(4)
                .flat_map(|cmyk| {
                    let k = 1.0 - f32::from(cmyk[3]) / 255.0;
                    let channel = |v: u8| ((1.0 - f32::from(v) / 255.0) * k * 255.0) as u8;
                    [channel(cmyk[2]), channel(cmyk[1]), channel(cmyk[0])]
                })
                .collect(),
        ),
    };
    PixelMatrix::from_u8(width, height, encoding, data).map_err(|_| Error::decode("invalid image data"))
}

/// Encodes a Gray, BGR or BGRA matrix as JPEG; alpha is dropped.
pub(crate) fn encode(m: &PixelMatrix, quality: u8) -> Result<Vec<u8>> {
    use jpeg_encoder::{ColorType, Encoder};

    let src = m
        .as_u8()
        .ok_or_else(|| Error::validation("only Gray, BGR and BGRA matrices can be encoded"))?;
    let color_type = match m.encoding() {
        Encoding::Gray => ColorType::Luma,
        Encoding::Bgr => ColorType::Bgr,
        Encoding::Bgra => ColorType::Bgra,
        Encoding::Float => {
            return Err(Error::validation("only Gray, BGR and BGRA matrices can be encoded"));
        }
    };
    let (width, height) = match (u16::try_from(m.width()), u16::try_from(m.height())) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(Error::validation(format!(
                "JPEG dimensions are limited to 65535x65535, got {}x{}",
                m.width(),
                m.height()
            )));
        }
    };

    let mut buffer = Vec::new();
    let encoder = Encoder::new(&mut buffer, quality.clamp(1, 100));
    encoder
        .encode(src, width, height, color_type)
        .map_err(|e: jpeg_encoder::EncodingError| Error::validation(format!("JPEG encoding failed: {e}")))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_flat_gray() {
        let m = PixelMatrix::from_u8(16, 8, Encoding::Gray, vec![120; 128]).unwrap();
        let bytes = encode(&m, crate::codec::DEFAULT_JPEG_QUALITY).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let back = decode(&bytes).unwrap();
        assert_eq!(back.encoding(), Encoding::Gray);
        assert_eq!(back.dims(), (16, 8));
        assert!(back.as_u8().unwrap().iter().all(|&v| v.abs_diff(120) <= 2));
    }

    #[test]
    fn test_bgra_drops_alpha() {
        let data: Vec<u8> = [200u8, 100, 50, 7].repeat(64);
        let m = PixelMatrix::from_u8(8, 8, Encoding::Bgra, data).unwrap();
        let back = decode(&encode(&m, 90).unwrap()).unwrap();
        assert_eq!(back.encoding(), Encoding::Bgr);
        let px = &back.as_u8().unwrap()[..3];
        assert!(px[0].abs_diff(200) <= 4 && px[1].abs_diff(100) <= 4 && px[2].abs_diff(50) <= 4);
    }

    #[test]
    fn test_garbage() {
        let err = decode(&[0xFF, 0xD8, 0xFF, 0x00, 0x01]).unwrap_err();
        assert_eq!(err.to_string(), "invalid image data");
    }
}
