//! In-place addition and multiplication.
//!
//! The right operand is a scalar, a [`ColorScalar`] or another matrix of the
//! same size and channel count. 8-bit results are rounded to nearest (ties
//! away from zero) and wrapped modulo 256; Float results are stored as-is.
//!
//! # Example
//!
//! ```rust
//! use scv_core::{Encoding, PixelMatrix};
//! use scv_ops::arithmetic::{multiply, Operand};
//!
//! let data: Vec<f64> = (1..=9).map(f64::from).collect();
//! let mut m = PixelMatrix::from_planar(3, 3, Encoding::Gray, &data).unwrap();
//! multiply(&mut m, &Operand::Scalar(1.6)).unwrap();
//! assert_eq!(m.to_vec(), vec![2., 3., 5., 6., 8., 10., 11., 13., 14.]);
//! ```

use crate::guard::ensure_same_shape;
use scv_core::sample::round_wrap_u8;
use scv_core::{ColorScalar, PixelMatrix, Result, SamplesMut};
use tracing::trace;

/// Right-hand operand of an arithmetic operation.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    /// Applied to every sample.
    Scalar(f64),
    /// Applied per channel by role.
    Color(ColorScalar),
    /// Applied element-wise.
    Matrix(&'a PixelMatrix),
}

/// Arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    /// `a + b`
    Add,
    /// `a * b`
    Multiply,
}

impl ArithOp {
    #[inline]
    fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            ArithOp::Add => a + b,
            ArithOp::Multiply => a * b,
        }
    }

    /// Neutral element, used for channels an operand leaves unnamed.
    #[inline]
    pub fn identity(self) -> f64 {
        match self {
            ArithOp::Add => 0.0,
            ArithOp::Multiply => 1.0,
        }
    }

    fn name(self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Multiply => "multiply",
        }
    }
}

/// Checks that `operand` can be combined with `target`.
pub fn validate(target: &PixelMatrix, op: ArithOp, operand: &Operand<'_>) -> Result<()> {
    match operand {
        Operand::Scalar(_) => Ok(()),
        Operand::Color(c) => c.to_channels(target.encoding(), op.identity()).map(|_| ()),
        Operand::Matrix(m) => ensure_same_shape(target, m, op.name()),
    }
}

/// Combines `operand` into `target` in place.
pub fn apply(target: &mut PixelMatrix, op: ArithOp, operand: &Operand<'_>) -> Result<()> {
    validate(target, op, operand)?;
    trace!(op = op.name(), width = target.width(), height = target.height(), "arithmetic");

    let channels = target.channels();
    let rhs: Box<dyn Fn(usize) -> f64 + '_> = match operand {
        Operand::Scalar(v) => {
            let v = *v;
            Box::new(move |_| v)
        }
        Operand::Color(c) => {
            let per_channel = c.to_channels(target.encoding(), op.identity())?;
            Box::new(move |i| per_channel[i % channels])
        }
        Operand::Matrix(m) => {
            let samples = m.samples();
            Box::new(move |i| samples.get(i))
        }
    };

    match target.samples_mut() {
        SamplesMut::U8(dst) => {
            for (i, s) in dst.iter_mut().enumerate() {
                *s = round_wrap_u8(op.apply(f64::from(*s), rhs(i)));
            }
        }
        SamplesMut::F64(dst) => {
            for (i, s) in dst.iter_mut().enumerate() {
                *s = op.apply(*s, rhs(i));
            }
        }
    }
    Ok(())
}

/// `target += operand`, in place.
#[inline]
pub fn add(target: &mut PixelMatrix, operand: &Operand<'_>) -> Result<()> {
    apply(target, ArithOp::Add, operand)
}

/// `target *= operand`, in place.
#[inline]
pub fn multiply(target: &mut PixelMatrix, operand: &Operand<'_>) -> Result<()> {
    apply(target, ArithOp::Multiply, operand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scv_core::{Encoding, ErrorKind};

    fn gray(data: &[f64]) -> PixelMatrix {
        PixelMatrix::from_planar(3, 3, Encoding::Gray, data).unwrap()
    }

    fn one_to_nine() -> Vec<f64> {
        (1..=9).map(f64::from).collect()
    }

    fn bgr_planes() -> PixelMatrix {
        let data: Vec<f64> = (1..=9).flat_map(|v| [f64::from(v); 3]).collect();
        PixelMatrix::from_planar(3, 3, Encoding::Bgr, &data).unwrap()
    }

    #[test]
    fn test_add_scalar_gray() {
        let mut m = gray(&one_to_nine());
        add(&mut m, &Operand::Scalar(1.4)).unwrap();
        assert_eq!(m.to_vec(), vec![2., 3., 4., 5., 6., 7., 8., 9., 10.]);
    }

    #[test]
    fn test_multiply_scalar_gray() {
        let mut m = gray(&one_to_nine());
        multiply(&mut m, &Operand::Scalar(1.6)).unwrap();
        assert_eq!(m.to_vec(), vec![2., 3., 5., 6., 8., 10., 11., 13., 14.]);
    }

    #[test]
    fn test_wraps_after_rounding() {
        let mut m = gray(&[250.0; 9]);
        add(&mut m, &Operand::Scalar(10.0)).unwrap();
        assert!(m.to_vec().iter().all(|&v| v == 4.0));
        multiply(&mut m, &Operand::Scalar(-1.0)).unwrap();
        assert!(m.to_vec().iter().all(|&v| v == 252.0));
    }

    #[test]
    fn test_float_unmodified() {
        let mut m = PixelMatrix::from_f64(3, 1, vec![1.0, 2.0, 3.0]).unwrap();
        multiply(&mut m, &Operand::Scalar(1.5)).unwrap();
        add(&mut m, &Operand::Scalar(300.0)).unwrap();
        assert_eq!(m.to_vec(), vec![301.5, 303.0, 304.5]);
    }

    #[test]
    fn test_matrix_operand() {
        let mut a = PixelMatrix::from_f64(2, 1, vec![1.5, 2.0]).unwrap();
        let b = PixelMatrix::from_f64(2, 1, vec![2.0, 4.0]).unwrap();
        multiply(&mut a, &Operand::Matrix(&b)).unwrap();
        assert_eq!(a.to_vec(), vec![3.0, 8.0]);
        add(&mut a, &Operand::Matrix(&b)).unwrap();
        assert_eq!(a.to_vec(), vec![5.0, 12.0]);
    }

    #[test]
    fn test_matrix_operand_shape_mismatch() {
        let mut a = gray(&one_to_nine());
        let b = PixelMatrix::new(2, 3, Encoding::Gray).unwrap();
        let err = add(&mut a, &Operand::Matrix(&b)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
        assert_eq!(a, gray(&one_to_nine()));
    }

    #[test]
    fn test_multiply_color() {
        let mut m = bgr_planes();
        let color = ColorScalar::rgb(0.6, 3.0, 2.0);
        multiply(&mut m, &Operand::Color(color)).unwrap();
        let expected: Vec<f64> = [2., 2., 2., 4., 4., 4., 6., 6., 6.]
            .into_iter()
            .chain([12., 12., 12., 15., 15., 15., 18., 18., 18.])
            .chain([4., 4., 4., 5., 5., 5., 5., 5., 5.])
            .collect();
        assert_eq!(m.to_vec(), expected);
    }

    #[test]
    fn test_add_color_to_gray_rejected() {
        let mut m = gray(&one_to_nine());
        let err = add(&mut m, &Operand::Color(ColorScalar::rgb(1.0, 2.0, 3.0))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
