//! Binary encoding and decoding primitives.
//!
//! Values are big-endian throughout. Node types in [`crate::model`] build on
//! the [`Reader`] and [`Writer`] defined here.

pub mod primitives;

pub use primitives::{Reader, Writer};
