//! CLI command implementations

pub mod blur;
pub mod color;
pub mod dump;
pub mod info;
pub mod resize;
pub mod transform;

use anyhow::{Context, Result};
use scv_compute::Matrix;
use std::path::Path;

/// Load image from path
pub fn load_image(path: &Path) -> Result<Matrix> {
    Matrix::read_image(path, None).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &Matrix) -> Result<()> {
    image
        .write_image(path)
        .with_context(|| format!("Failed to save: {}", path.display()))
}

/// One-line description of a matrix.
pub fn describe(m: &Matrix) -> String {
    let (w, h) = m.dims();
    format!("{w}x{h} {} ({} ch)", m.encoding(), m.channels())
}

#[cfg(test)]
pub(crate) mod testing {
    use scv_compute::Matrix;
    use scv_core::{Encoding, PixelMatrix};
    use std::path::{Path, PathBuf};

    /// Writes a small BGR gradient PNG into `dir`.
    pub fn sample_png(dir: &Path, width: usize, height: usize) -> PathBuf {
        let data: Vec<u8> = (0..width * height * 3).map(|i| (i * 7 % 256) as u8).collect();
        let m = Matrix::from(PixelMatrix::from_u8(width, height, Encoding::Bgr, data).unwrap());
        let path = dir.join("in.png");
        m.write_image(&path).unwrap();
        path
    }
}
