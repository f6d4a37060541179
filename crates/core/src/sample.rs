use std::fmt;

use num_complex::Complex64;

/// A single field measurement: a point in the plane and the complex value there.
///
/// Samples are immutable once constructed.
/// Two samples describe the *same point* when their coordinates compare equal,
/// regardless of their values (see [`Sample::same_point`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    x: f64,
    y: f64,
    value: Complex64,
}

impl Sample {
    /// Creates a sample at `(x, y)` holding `value`.
    #[must_use]
    pub const fn new(x: f64, y: f64, value: Complex64) -> Self {
        Self { x, y, value }
    }

    /// Returns the x coordinate.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Returns the y coordinate.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Returns the complex field value at this point.
    #[must_use]
    pub const fn value(&self) -> Complex64 {
        self.value
    }

    /// Returns the Euclidean norm of the field value, `sqrt(re² + im²)`.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.value.norm()
    }

    /// Returns `true` if `other` sits at the same coordinates as `self`.
    ///
    /// Coordinates are compared with `==`, so `-0.0` matches `0.0` and a
    /// `NaN` coordinate never matches anything.
    #[must_use]
    pub fn same_point(&self, other: &Sample) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// Returns a hashable key for this sample's coordinates.
    ///
    /// Returns `None` if either coordinate is `NaN`, since such a point
    /// is never equal to any other.
    #[must_use]
    pub fn point_key(&self) -> Option<PointKey> {
        PointKey::new(self.x, self.y)
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "X {:.2} Y {:.2} E_C {} |E| {:.2}",
            self.x,
            self.y,
            self.value,
            self.magnitude()
        )
    }
}

/// Hashable identity of a coordinate pair.
///
/// Equality of keys agrees with [`Sample::same_point`]: negative zero is
/// folded into positive zero, and `NaN` coordinates have no key at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointKey {
    x: u64,
    y: u64,
}

impl PointKey {
    fn new(x: f64, y: f64) -> Option<Self> {
        if x.is_nan() || y.is_nan() {
            return None;
        }
        Some(Self {
            x: canonical_bits(x),
            y: canonical_bits(y),
        })
    }
}

fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 { 0.0_f64.to_bits() } else { v.to_bits() }
}
