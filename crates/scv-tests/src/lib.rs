//! Integration tests for the scv crates.
//!
//! End-to-end checks across the matrix model, the operations, the codec and
//! the execution layer. Golden vectors live in `golden/vectors.json` and are
//! driven by the `golden` module.

#[cfg(test)]
mod golden;
