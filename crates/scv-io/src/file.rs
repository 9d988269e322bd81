//! Reading and writing image files.

use crate::codec::{self, EncodeFormat};
use scv_core::{Encoding, Error, PixelMatrix, Result};
use std::path::Path;
use tracing::{debug, trace};

/// Resolves the output format of `path` from its extension.
pub fn format_for_path(path: &Path) -> Result<EncodeFormat> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(EncodeFormat::from_extension)
        .ok_or_else(|| Error::write(path, "unsupported file extension, expected .png, .jpg or .jpeg"))
}

/// Checks everything about a write that can be known before touching disk.
pub fn validate_write(m: &PixelMatrix, path: &Path) -> Result<EncodeFormat> {
    let format = format_for_path(path)?;
    codec::validate_encode(m)?;
    Ok(format)
}

/// Reads and decodes the image at `path`.
///
/// Any failure to read or decode the file becomes
/// `invalid image file "<path>"`.
pub fn read_image(path: impl AsRef<Path>, hint: Option<Encoding>) -> Result<PixelMatrix> {
    let path = path.as_ref();
    codec::validate_hint(hint)?;
    let bytes = std::fs::read(path).map_err(|e| {
        trace!(path = %path.display(), error = %e, "read failed");
        Error::read(path)
    })?;
    let m = codec::decode(&bytes, hint).map_err(|e| {
        trace!(path = %path.display(), error = %e, "decode failed");
        Error::read(path)
    })?;
    debug!(path = %path.display(), width = m.width(), height = m.height(), encoding = %m.encoding(), "read_image");
    Ok(m)
}

/// Encodes `m` by the extension of `path` and writes it.
pub fn write_image(m: &PixelMatrix, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let format = validate_write(m, path)?;
    let bytes = codec::encode(m, format).map_err(|e| Error::write(path, e.to_string()))?;
    std::fs::write(path, &bytes).map_err(|e| Error::write(path, e.to_string()))?;
    debug!(path = %path.display(), format = %format, bytes = bytes.len(), "write_image");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scv_core::ErrorKind;

    #[test]
    fn test_write_read_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.PNG");
        let m = PixelMatrix::from_u8(3, 1, Encoding::Bgr, (0..9).collect()).unwrap();
        write_image(&m, &path).unwrap();
        assert_eq!(read_image(&path, None).unwrap(), m);
    }

    #[test]
    fn test_read_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.png");
        let err = read_image(&path, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Read);
        assert_eq!(err.to_string(), format!("invalid image file \"{}\"", path.display()));
    }

    #[test]
    fn test_read_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.jpg");
        std::fs::write(&path, b"junk").unwrap();
        assert_eq!(read_image(&path, None).unwrap_err().kind(), ErrorKind::Read);
    }

    #[test]
    fn test_write_errors() {
        let dir = tempfile::tempdir().unwrap();
        let m = PixelMatrix::new(2, 2, Encoding::Gray).unwrap();
        let err = write_image(&m, dir.path().join("out.bmp")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Write);
        let err = write_image(&m, dir.path().join("no/such/dir/out.png")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Write);
        let f = PixelMatrix::new(2, 2, Encoding::Float).unwrap();
        assert_eq!(write_image(&f, dir.path().join("f.png")).unwrap_err().kind(), ErrorKind::Validation);
    }
}
