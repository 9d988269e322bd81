//! # scv-ops
//!
//! Operations on [`scv_core::PixelMatrix`].
//!
//! Every function here validates its arguments completely before reading or
//! writing samples, and reports failures through [`scv_core::Error`]. In-place
//! operations take `&mut PixelMatrix`; everything else allocates a new matrix.
//!
//! # Modules
//!
//! - [`region`] - Crop and splice
//! - [`arithmetic`] - Add and multiply with scalar, color or matrix operands
//! - [`channels`] - Split, merge and table lookup
//! - [`transform`] - Axis flips
//! - [`warp`] - Rotation matrices, affine warp and rotate
//! - [`resize`] - Pyramid plus bicubic resize
//! - [`color`] - Color conversion and color temperature
//! - [`filter`] - Separable Gaussian blur
//! - [`draw`] - Rectangles and lines
//!
//! # Example
//!
//! ```rust
//! use scv_core::{Encoding, PixelMatrix, Rect};
//! use scv_ops::{region, resize::{resize, SizeSpec}, transform};
//!
//! let m = PixelMatrix::new(64, 48, Encoding::Bgr).unwrap();
//! let small = resize(&m, &SizeSpec::Scale(0.5)).unwrap();
//! let flipped = transform::flip_left_right(&small);
//! let corner = region::crop(&flipped, &Rect::new(0.0, 0.0, 8.0, 8.0)).unwrap();
//! assert_eq!(corner.dims(), (8, 8));
//! ```
//!
//! # Features
//!
//! - `parallel` (default) - Fill output rows of resampling and filtering
//!   operations on the rayon pool

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod arithmetic;
pub mod channels;
pub mod color;
pub mod draw;
pub mod filter;
pub mod guard;
mod parallel;
pub mod region;
pub mod resize;
pub mod transform;
pub mod warp;

pub use arithmetic::{ArithOp, Operand};
pub use color::Conversion;
pub use filter::{BlurOptions, KernelSize};
pub use resize::SizeSpec;
pub use warp::{RotateSpec, WarpOptions};
