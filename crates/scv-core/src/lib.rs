//! # scv-core
//!
//! Core types for the scv pixel-matrix library.
//!
//! This crate provides the foundational types used throughout scv:
//!
//! - [`PixelMatrix`] - Owned 2D sample buffer with a fixed [`Encoding`]
//! - [`Encoding`] - Gray, BGR, BGRA (8-bit) or Float (`f64`) samples
//! - [`Rect`], [`Point`] - Floating-point rectangle algebra
//! - [`ColorScalar`] - Per-channel operand addressed by channel role
//! - [`BorderPolicy`] - Out-of-bounds sampling rules for resampling
//! - [`Error`] - The shared error taxonomy
//!
//! ## Numeric policy
//!
//! 8-bit encodings reduce every stored value modulo 256 (so `300` stores as
//! `44`); Float stores values unmodified. See [`sample`] for the conversion
//! helpers the operation crates use.
//!
//! ## Crate Structure
//!
//! ```text
//! scv-core (this crate)
//!    ^
//!    |
//!    +-- scv-ops (region, arithmetic, geometry, color, filtering)
//!    +-- scv-io (PNG/JPEG codec, file I/O)
//!    +-- scv-compute (blocking / non-blocking execution)
//!    +-- scv-cli
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod border;
pub mod color;
pub mod encoding;
pub mod error;
pub mod matrix;
pub mod rect;
pub mod sample;

pub use border::BorderPolicy;
pub use color::ColorScalar;
pub use encoding::{Channel, Encoding};
pub use error::{Error, ErrorKind, Result};
pub use matrix::{ChannelBuffer, MatrixArgs, MatrixInit, PixelMatrix, Samples, SamplesMut};
pub use rect::{Point, Rect};

/// Prelude module for convenient imports.
///
/// ```
/// use scv_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::border::BorderPolicy;
    pub use crate::color::ColorScalar;
    pub use crate::encoding::{Channel, Encoding};
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::matrix::{MatrixInit, PixelMatrix, Samples};
    pub use crate::rect::{Point, Rect};
}
