//! Core types for complex-valued field samples over a 2D plane.
//!
//! This crate defines the data model the codecs and the registry build on:
//!
//! - [`Sample`]: a coordinate `(x, y)` carrying a complex field value
//! - [`Dataset`]: the capability set shared by every sample collection
//! - [`PointSet`]: an insertion-ordered collection, deduplicated on `(x, y)`
//! - [`Grid`]: a dense, regularly spaced array generated by a sampling function
//!
//! Complex values are [`Complex64`] and timestamps are
//! [`jiff::civil::DateTime`]; both are re-exported for convenience.

mod dataset;
mod grid;
mod point_set;
mod sample;

pub use dataset::Dataset;
pub use grid::Grid;
pub use point_set::PointSet;
pub use sample::{PointKey, Sample};

pub use jiff::civil::DateTime;
pub use num_complex::Complex64;
