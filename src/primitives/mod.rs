//! Core compute primitives.
//!
//! Composition tables are dense and small enough (hundreds of samples, ~100
//! bins) that a flat row-major buffer is all the engines need.

mod matrix;

pub use matrix::{Matrix, Rows};
