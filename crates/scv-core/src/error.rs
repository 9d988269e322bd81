//! Error types shared by every scv crate.
//!
//! # Overview
//!
//! The [`Error`] enum is the single taxonomy used across matrix construction,
//! operations, codecs and the execution layer:
//!
//! - **Shape errors**: malformed construction arguments, incompatible
//!   dimensions or channel counts between operands
//! - **Bounds errors**: a crop or set region that leaves the matrix
//! - **Validation errors**: malformed option records, unsupported values
//! - **Decode errors**: malformed encoded image payloads
//! - **Read / write errors**: failures at the filesystem boundary
//! - **Worker errors**: a queued job that ended without producing a result
//!
//! # Usage
//!
//! ```rust
//! use scv_core::{Error, ErrorKind, Result};
//!
//! fn check_kernel(size: i64) -> Result<usize> {
//!     if size <= 0 || size % 2 == 0 {
//!         return Err(Error::validation("kernel size must be a positive odd integer"));
//!     }
//!     Ok(size as usize)
//! }
//!
//! assert_eq!(check_kernel(4).unwrap_err().kind(), ErrorKind::Validation);
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
///
/// Handy for tests and for callers that only branch on the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::Shape`].
    Shape,
    /// See [`Error::Bounds`].
    Bounds,
    /// See [`Error::Validation`].
    Validation,
    /// See [`Error::Decode`].
    Decode,
    /// See [`Error::Read`].
    Read,
    /// See [`Error::Write`].
    Write,
    /// See [`Error::Worker`].
    Worker,
}

/// Errors produced by matrix construction, operations and codecs.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Malformed construction arguments or incompatible operand shapes.
    #[error("{0}")]
    Shape(String),

    /// A region exceeds the matrix extents.
    ///
    /// Ranges are half-open: `x0..x1` covers columns `x0` up to `x1 - 1`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use scv_core::Error;
    ///
    /// let err = Error::bounds("crop", (10, 12), (1, 3), 3, 3);
    /// assert_eq!(
    ///     err.to_string(),
    ///     "crop (x=10..12, y=1..3) goes outside the matrix bounds (w=3, h=3)"
    /// );
    /// ```
    #[error("{op} (x={x0}..{x1}, y={y0}..{y1}) goes outside the matrix bounds (w={width}, h={height})")]
    Bounds {
        /// Operation name
        op: &'static str,
        /// First requested column
        x0: i64,
        /// One past the last requested column
        x1: i64,
        /// First requested row
        y0: i64,
        /// One past the last requested row
        y1: i64,
        /// Matrix width
        width: usize,
        /// Matrix height
        height: usize,
    },

    /// Malformed option record or unsupported argument value.
    #[error("{0}")]
    Validation(String),

    /// Encoded image payload could not be decoded.
    #[error("{0}")]
    Decode(String),

    /// Reading an image from disk failed.
    #[error("invalid image file \"{}\"", path.display())]
    Read {
        /// Path that was requested
        path: PathBuf,
    },

    /// Writing an image to disk failed.
    #[error("failed to write image file \"{}\": {reason}", path.display())]
    Write {
        /// Destination path
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// A queued job ended without delivering a result.
    #[error("worker failed: {0}")]
    Worker(String),
}

impl Error {
    /// Creates an [`Error::Shape`] error.
    #[inline]
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }

    /// Creates an [`Error::Bounds`] error from half-open x and y ranges.
    #[inline]
    pub fn bounds(op: &'static str, x: (i64, i64), y: (i64, i64), width: usize, height: usize) -> Self {
        Self::Bounds {
            op,
            x0: x.0,
            x1: x.1,
            y0: y.0,
            y1: y.1,
            width,
            height,
        }
    }

    /// Creates an [`Error::Validation`] error.
    #[inline]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates an [`Error::Decode`] error.
    #[inline]
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Creates an [`Error::Read`] error.
    #[inline]
    pub fn read(path: impl Into<PathBuf>) -> Self {
        Self::Read { path: path.into() }
    }

    /// Creates an [`Error::Write`] error.
    #[inline]
    pub fn write(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Write {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::Worker`] error.
    #[inline]
    pub fn worker(msg: impl Into<String>) -> Self {
        Self::Worker(msg.into())
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Shape(_) => ErrorKind::Shape,
            Self::Bounds { .. } => ErrorKind::Bounds,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Read { .. } => ErrorKind::Read,
            Self::Write { .. } => ErrorKind::Write,
            Self::Worker(_) => ErrorKind::Worker,
        }
    }

    /// Returns `true` if this is a bounds error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::Bounds { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_message() {
        let err = Error::bounds("set", (2, 4), (2, 4), 3, 3);
        assert_eq!(
            err.to_string(),
            "set (x=2..4, y=2..4) goes outside the matrix bounds (w=3, h=3)"
        );
        assert!(err.is_bounds_error());
        assert_eq!(err.kind(), ErrorKind::Bounds);
    }

    #[test]
    fn test_read_names_path() {
        let err = Error::read("/no/such/file.png");
        assert_eq!(err.to_string(), "invalid image file \"/no/such/file.png\"");
        assert_eq!(err.kind(), ErrorKind::Read);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Error::shape("x").kind(), ErrorKind::Shape);
        assert_eq!(Error::validation("x").kind(), ErrorKind::Validation);
        assert_eq!(Error::decode("x").kind(), ErrorKind::Decode);
        assert_eq!(Error::write("a.png", "denied").kind(), ErrorKind::Write);
        assert_eq!(Error::worker("gone").kind(), ErrorKind::Worker);
        assert!(!Error::shape("x").is_bounds_error());
    }
}
