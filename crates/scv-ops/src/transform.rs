//! Axis flips.
//!
//! # Example
//!
//! ```rust
//! use scv_core::{Encoding, PixelMatrix};
//! use scv_ops::transform::flip_left_right;
//!
//! let m = PixelMatrix::from_planar(2, 1, Encoding::Gray, &[1.0, 2.0]).unwrap();
//! assert_eq!(flip_left_right(&m).to_vec(), vec![2.0, 1.0]);
//! ```

use scv_core::{PixelMatrix, SamplesMut};

fn flip_h<T>(data: &mut [T], width: usize, channels: usize) {
    for row in data.chunks_exact_mut(width * channels) {
        row.reverse();
        for px in row.chunks_exact_mut(channels) {
            px.reverse();
        }
    }
}

fn flip_v<T>(data: &mut [T], width: usize, channels: usize) {
    let stride = width * channels;
    let rows = data.len() / stride;
    for y in 0..rows / 2 {
        let (top, bottom) = data.split_at_mut((rows - 1 - y) * stride);
        top[y * stride..(y + 1) * stride].swap_with_slice(&mut bottom[..stride]);
    }
}

type Remap<T> = fn(&mut [T], usize, usize);

fn remap(m: &PixelMatrix, on_u8: Remap<u8>, on_f64: Remap<f64>) -> PixelMatrix {
    let mut out = m.clone();
    let (w, ch) = (m.width(), m.channels());
    match out.samples_mut() {
        SamplesMut::U8(data) => on_u8(data, w, ch),
        SamplesMut::F64(data) => on_f64(data, w, ch),
    }
    out
}

/// Mirrors `m` around its vertical axis.
pub fn flip_left_right(m: &PixelMatrix) -> PixelMatrix {
    remap(m, flip_h::<u8>, flip_h::<f64>)
}

/// Mirrors `m` around its horizontal axis.
pub fn flip_up_down(m: &PixelMatrix) -> PixelMatrix {
    remap(m, flip_v::<u8>, flip_v::<f64>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scv_core::Encoding;

    fn sample() -> PixelMatrix {
        PixelMatrix::from_planar(3, 3, Encoding::Gray, &[1., 2., 0., 3., 4., 0., 0., 0., 0.]).unwrap()
    }

    #[test]
    fn test_flip_left_right() {
        let out = flip_left_right(&sample());
        assert_eq!(out.to_vec(), vec![0., 2., 1., 0., 4., 3., 0., 0., 0.]);
    }

    #[test]
    fn test_flip_up_down() {
        let out = flip_up_down(&sample());
        assert_eq!(out.to_vec(), vec![0., 0., 0., 3., 4., 0., 1., 2., 0.]);
    }

    #[test]
    fn test_flip_keeps_pixels_whole() {
        let data: Vec<f64> = [1., 2., 10., 20., 100., 200.].to_vec();
        let m = PixelMatrix::from_planar(2, 1, Encoding::Bgr, &data).unwrap();
        let out = flip_left_right(&m);
        assert_eq!(out.to_vec(), vec![2., 1., 20., 10., 200., 100.]);
        assert_eq!(flip_left_right(&out), m);
    }

    #[test]
    fn test_flip_float() {
        let m = PixelMatrix::from_f64(1, 2, vec![0.25, -1.0]).unwrap();
        assert_eq!(flip_up_down(&m).to_vec(), vec![-1.0, 0.25]);
    }
}
