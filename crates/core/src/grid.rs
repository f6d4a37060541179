use std::fmt;

use jiff::civil::DateTime;
use ndarray::Array2;
use num_complex::Complex64;

use crate::{Dataset, PointSet, Sample};

/// A dense rectangular array of field values sampled at regular intervals.
///
/// Cell `[i, j]` holds the value at coordinate `(i·step_x, j·step_y)`.
/// The cells are stored in row-major order, so traversals visit `i` in the
/// outer loop and `j` in the inner loop.
///
/// A grid with `nx == 0` or `ny == 0` is legal and has no samples.
///
/// # Examples
///
/// ```
/// use fieldset_core::{Complex64, Dataset, DateTime, Grid};
///
/// let grid = Grid::new("plate", DateTime::default(), 2, 3, 1.0, 0.5, |x, y| {
///     Complex64::new(x, y)
/// });
///
/// assert_eq!(grid.count(), 6);
/// assert_eq!(grid.value(1, 2), Some(Complex64::new(1.0, 1.0)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    id: String,
    timestamp: DateTime,
    step_x: f64,
    step_y: f64,
    cells: Array2<Complex64>,
}

impl Grid {
    /// Creates an `nx × ny` grid filled by evaluating `f` at every node.
    ///
    /// The sampling function is called once per cell, in row-major order.
    pub fn new<F>(
        id: impl Into<String>,
        timestamp: DateTime,
        nx: usize,
        ny: usize,
        step_x: f64,
        step_y: f64,
        mut f: F,
    ) -> Self
    where
        F: FnMut(f64, f64) -> Complex64,
    {
        let cells = Array2::from_shape_fn((nx, ny), |(i, j)| {
            f(i as f64 * step_x, j as f64 * step_y)
        });
        Self {
            id: id.into(),
            timestamp,
            step_x,
            step_y,
            cells,
        }
    }

    /// Creates a `0 × 0` grid with zero steps, typically as a load target.
    pub fn empty(id: impl Into<String>, timestamp: DateTime) -> Self {
        Self::new(id, timestamp, 0, 0, 0.0, 0.0, |_, _| Complex64::default())
    }

    /// Number of nodes along x.
    #[must_use]
    pub fn nx(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of nodes along y.
    #[must_use]
    pub fn ny(&self) -> usize {
        self.cells.ncols()
    }

    /// Returns the node spacing along x.
    #[must_use]
    pub fn step_x(&self) -> f64 {
        self.step_x
    }

    /// Returns the node spacing along y.
    #[must_use]
    pub fn step_y(&self) -> f64 {
        self.step_y
    }

    /// Returns the cell array, indexed `[i, j]`.
    #[must_use]
    pub fn cells(&self) -> &Array2<Complex64> {
        &self.cells
    }

    /// Returns mutable access to the cell values.
    ///
    /// The shape cannot be changed through this reference; use
    /// [`Grid::reshape`] for that.
    pub fn cells_mut(&mut self) -> &mut Array2<Complex64> {
        &mut self.cells
    }

    /// Returns the value of cell `[i, j]`, or `None` if out of bounds.
    #[must_use]
    pub fn value(&self, i: usize, j: usize) -> Option<Complex64> {
        self.cells.get((i, j)).copied()
    }

    /// Returns the coordinate that cell `[i, j]` corresponds to.
    #[must_use]
    pub fn coordinate(&self, i: usize, j: usize) -> (f64, f64) {
        (i as f64 * self.step_x, j as f64 * self.step_y)
    }

    /// Converts every cell into a sample of a new [`PointSet`].
    ///
    /// The point set keeps this grid's id and timestamp, and its samples
    /// follow row-major order.
    /// Cells are inserted through [`PointSet::add`]; with nonzero steps every
    /// coordinate is distinct and every cell is kept.
    #[must_use]
    pub fn to_point_set(&self) -> PointSet {
        let mut set = PointSet::new(self.id.clone(), self.timestamp);
        for sample in self.samples() {
            set.add(sample);
        }
        set
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

    /// Replaces the node spacing along x, leaving the cells untouched.
    pub fn set_step_x(&mut self, step_x: f64) {
        self.step_x = step_x;
    }

    /// Replaces the node spacing along y, leaving the cells untouched.
    pub fn set_step_y(&mut self, step_y: f64) {
        self.step_y = step_y;
    }

    /// Reallocates the cells to `nx × ny`, discarding all prior values.
    ///
    /// Every cell of the new array is zero.
    pub fn reshape(&mut self, nx: usize, ny: usize) {
        self.cells = Array2::from_elem((nx, ny), Complex64::new(0.0, 0.0));
    }
}

impl Dataset for Grid {
    fn id(&self) -> &str {
        &self.id
    }

    fn timestamp(&self) -> DateTime {
        self.timestamp
    }

    fn count(&self) -> usize {
        self.cells.len()
    }

    /// Yields one sample per cell at its logical coordinate, in row-major order.
    fn samples(&self) -> Box<dyn Iterator<Item = Sample> + '_> {
        Box::new(self.cells.indexed_iter().map(move |((i, j), &value)| {
            let (x, y) = self.coordinate(i, j);
            Sample::new(x, y, value)
        }))
    }

    fn mean_magnitude(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.cells.iter().map(|value| value.norm()).sum();
        sum / self.cells.len() as f64
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid")?;
        writeln!(f, " id: {}", self.id)?;
        writeln!(f, " timestamp: {}", self.timestamp)?;
        writeln!(f, " nx: {}", self.nx())?;
        writeln!(f, " ny: {}", self.ny())?;
        writeln!(f, " step_x: {}", self.step_x)?;
        writeln!(f, " step_y: {}", self.step_y)
    }
}
