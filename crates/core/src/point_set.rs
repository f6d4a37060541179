use std::{collections::HashSet, fmt};

use jiff::civil::DateTime;
use num_complex::Complex64;

use crate::{Dataset, PointKey, Sample};

/// Stride along x used by [`PointSet::add_generated`].
const GENERATED_STRIDE_X: f64 = 15.0;

/// Stride along y used by [`PointSet::add_generated`].
const GENERATED_STRIDE_Y: f64 = 12.0;

/// An insertion-ordered collection of samples with distinct coordinates.
///
/// No two samples in a `PointSet` share the same `(x, y)`.
/// Adding a sample whose coordinates are already present is rejected,
/// even if its value differs.
///
/// # Examples
///
/// ```
/// use fieldset_core::{Complex64, DateTime, PointSet, Sample};
///
/// let mut set = PointSet::new("probe", DateTime::default());
///
/// assert!(set.add(Sample::new(0.0, 0.0, Complex64::new(1.0, 0.0))));
/// assert!(!set.add(Sample::new(0.0, 0.0, Complex64::new(2.0, 0.0))));
/// assert_eq!(set.items().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    id: String,
    timestamp: DateTime,
    items: Vec<Sample>,
    keys: HashSet<PointKey>,
}

impl PointSet {
    /// Creates an empty point set.
    pub fn new(id: impl Into<String>, timestamp: DateTime) -> Self {
        Self {
            id: id.into(),
            timestamp,
            items: Vec::new(),
            keys: HashSet::new(),
        }
    }

    /// Appends `sample` unless a sample at the same coordinates is present.
    ///
    /// Returns `true` if the sample was inserted.
    /// On `false` the set is left unchanged.
    pub fn add(&mut self, sample: Sample) -> bool {
        // A NaN coordinate never compares equal, so such samples always go in.
        if let Some(key) = sample.point_key() {
            if !self.keys.insert(key) {
                tracing::trace!(id = %self.id, x = sample.x(), y = sample.y(), "duplicate point dropped");
                return false;
            }
        }
        self.items.push(sample);
        true
    }

    /// Adds `n` samples generated by `f` along a fixed diagonal stride.
    ///
    /// Sample `i` sits at `(15·i, 12·i)` and holds `f(15·i, 12·i)`.
    /// Each sample goes through [`PointSet::add`], so colliding coordinates
    /// are skipped.
    ///
    /// Returns the number of samples actually inserted.
    pub fn add_generated<F>(&mut self, n: usize, mut f: F) -> usize
    where
        F: FnMut(f64, f64) -> Complex64,
    {
        (0..n)
            .filter(|&i| {
                let x = i as f64 * GENERATED_STRIDE_X;
                let y = i as f64 * GENERATED_STRIDE_Y;
                self.add(Sample::new(x, y, f(x, y)))
            })
            .count()
    }

    /// Returns the samples in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Sample] {
        &self.items
    }

    /// Replaces the identifier.
    ///
    /// Used by loaders that overwrite a target in place.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Replaces the timestamp.
    pub fn set_timestamp(&mut self, timestamp: DateTime) {
        self.timestamp = timestamp;
    }
}

impl Dataset for PointSet {
    fn id(&self) -> &str {
        &self.id
    }

    fn timestamp(&self) -> DateTime {
        self.timestamp
    }

    fn count(&self) -> usize {
        self.items.len()
    }

    fn samples(&self) -> Box<dyn Iterator<Item = Sample> + '_> {
        Box::new(self.items.iter().copied())
    }
}

impl fmt::Display for PointSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PointSet")?;
        writeln!(f, " id: {}", self.id)?;
        writeln!(f, " timestamp: {}", self.timestamp)?;
        writeln!(f, " count: {}", self.items.len())
    }
}
