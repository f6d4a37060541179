//! A registry of named datasets with cross-dataset queries.
//!
//! A [`Registry`] owns an ordered collection of [`Dataset`]s, unique by id,
//! and answers aggregate questions over all of their samples at once:
//!
//! - [`Registry::mean_magnitude`]: mean field magnitude
//! - [`Registry::max_deviation_sample`]: the sample farthest from that mean
//! - [`Registry::duplicated_x_coordinates`]: x values of points that occur
//!   more than once
//!
//! All queries traverse samples in the same order: datasets in insertion
//! order, then each dataset's own sample order (see [`Registry::samples`]).
//!
//! [`Dataset`]: fieldset_core::Dataset

mod error;
mod registry;

pub use error::DuplicateIdError;
pub use registry::Registry;
