//! File codecs for fieldset datasets.
//!
//! Two independent codecs are provided:
//!
//! - [`text`]: a line-oriented UTF-8 format for [`PointSet`]s
//! - [`binary`]: a fixed-layout little-endian format for [`Grid`]s
//!
//! Both expose `save` and `load` functions returning `Result<(), PersistError>`.
//! A load writes into an existing target as it reads, so a failed load can
//! leave the target partially updated; see the module docs for details.
//!
//! ## Text format
//!
//! ```text
//! <id>
//! <timestamp, ISO 8601 civil datetime>
//! <count>
//! For each sample:
//!   <x>
//!   <y>
//!   <value.re>
//!   <value.im>
//! ```
//!
//! ## Binary format
//!
//! ```text
//! id:        LEB128 byte length, then UTF-8 bytes
//! timestamp: i64, microseconds since 1970-01-01T00:00:00
//! nx:        i32
//! ny:        i32
//! step_x:    f64
//! step_y:    f64
//! cells:     nx * ny pairs of f64 (re, im), row-major
//! ```
//!
//! All multi-byte values are little-endian.
//!
//! [`PointSet`]: fieldset_core::PointSet
//! [`Grid`]: fieldset_core::Grid

mod config;
mod error;
mod timestamp;

pub mod binary;
pub mod text;

pub use config::Config;
pub use error::PersistError;
