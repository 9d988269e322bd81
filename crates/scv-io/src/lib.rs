//! # scv-io
//!
//! Image codec and file I/O for scv pixel matrices.
//!
//! # Supported Formats
//!
//! | Format | Read | Write | Feature |
//! |--------|------|-------|---------|
//! | PNG    | ✓    | ✓     | `png`   |
//! | JPEG   | ✓    | ✓     | `jpeg`  |
//!
//! Decoded images are 8-bit: Gray, BGR or BGRA. Float matrices cannot be
//! encoded.
//!
//! # Example
//!
//! ```rust,no_run
//! use scv_core::Encoding;
//! use scv_io::{read_image, write_image};
//!
//! let gray = read_image("photo.jpg", Some(Encoding::Gray))?;
//! write_image(&gray, "photo-gray.png")?;
//! # Ok::<(), scv_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod codec;
pub mod file;

#[cfg(feature = "jpeg")]
mod jpeg;
#[cfg(feature = "png")]
mod png;

pub use codec::{EncodeFormat, decode, encode};
pub use file::{read_image, write_image};
