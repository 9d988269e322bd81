//! # scv-compute
//!
//! Execution layer for scv: every pixel-matrix operation in a blocking and a
//! non-blocking form.
//!
//! - [`Matrix`] - Cloneable handle to a shared [`PixelMatrix`](scv_core::PixelMatrix)
//! - [`Executor`] - Bounded worker pool running queued operations
//! - [`Pending`] - Single-shot completion handle
//!
//! # Example
//!
//! ```rust
//! use scv_compute::Matrix;
//! use scv_core::Encoding;
//! use scv_ops::SizeSpec;
//!
//! let m = Matrix::new(64, 32, Encoding::Bgr).unwrap();
//!
//! // Blocking: runs on this thread.
//! let small = m.resize(SizeSpec::Width(16)).unwrap();
//! assert_eq!(small.dims(), (16, 8));
//!
//! // Non-blocking: bad arguments fail here, before anything is queued.
//! assert!(m.resize_async(SizeSpec::Width(-1)).is_err());
//! let pending = m.resize_async(SizeSpec::Scale(2.0)).unwrap();
//! assert_eq!(pending.wait().unwrap().dims(), (128, 64));
//! ```
//!
//! Operations on one matrix issued from several threads are not ordered
//! against each other; the handle's lock only keeps each one memory-safe.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod matrix;
pub mod pool;

pub use matrix::{Matrix, Operand};
pub use pool::{Executor, Job, Pending, PoolConfig, THREADS_ENV};
