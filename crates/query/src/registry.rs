mod queries;

use fieldset_core::{Dataset, Sample};

use crate::DuplicateIdError;

/// An ordered collection of datasets, unique by id.
///
/// The registry owns its datasets. Entries are added once and are never
/// replaced, removed, or mutated in place.
///
/// # Examples
///
/// ```
/// use fieldset_core::{Complex64, DateTime, Grid, PointSet};
/// use fieldset_query::Registry;
///
/// let mut registry = Registry::new();
/// registry.add(PointSet::new("probe", DateTime::default())).unwrap();
/// registry
///     .add(Grid::new("plate", DateTime::default(), 2, 2, 1.0, 1.0, |x, y| {
///         Complex64::new(x, y)
///     }))
///     .unwrap();
///
/// assert!(registry.add(PointSet::new("probe", DateTime::default())).is_err());
/// assert_eq!(registry.len(), 2);
/// assert_eq!(registry.samples().count(), 4);
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    datasets: Vec<Box<dyn Dataset>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a dataset with the given id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.datasets.iter().any(|dataset| dataset.id() == id)
    }

    /// Appends `dataset` unless its id is already registered.
    ///
    /// # Errors
    ///
    /// Returns a [`DuplicateIdError`] if a dataset with the same id exists.
    /// The registry is left unchanged in that case.
    pub fn add<D: Dataset + 'static>(&mut self, dataset: D) -> Result<(), DuplicateIdError> {
        self.add_boxed(Box::new(dataset))
    }

    /// Appends an already boxed `dataset` unless its id is already registered.
    ///
    /// # Errors
    ///
    /// Returns a [`DuplicateIdError`] if a dataset with the same id exists.
    pub fn add_boxed(&mut self, dataset: Box<dyn Dataset>) -> Result<(), DuplicateIdError> {
        if self.contains(dataset.id()) {
            tracing::debug!(id = dataset.id(), "rejected duplicate dataset id");
            return Err(DuplicateIdError {
                id: dataset.id().to_owned(),
            });
        }
        tracing::trace!(id = dataset.id(), count = dataset.count(), "registered dataset");
        self.datasets.push(dataset);
        Ok(())
    }

    /// Returns the number of registered datasets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Returns the dataset at `index` in insertion order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&(dyn Dataset + 'static)> {
        self.datasets.get(index).map(|dataset| &**dataset)
    }

    /// Iterates over the datasets in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(dyn Dataset + 'static)> {
        self.datasets.iter().map(|dataset| &**dataset)
    }

    /// Flattens every dataset's samples into one traversal.
    ///
    /// Datasets are visited in insertion order, and each contributes its
    /// samples in its own natural order.
    /// Each call starts a new traversal.
    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.datasets.iter().flat_map(|dataset| dataset.samples())
    }

    /// Concatenates the long descriptions of every dataset, in order.
    pub fn describe_long(&self, line: &dyn Fn(&Sample) -> String) -> String {
        self.datasets
            .iter()
            .map(|dataset| dataset.describe_long(line))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use fieldset_core::{Complex64, DateTime, Grid, PointSet};
    use jiff::civil::date;

    fn field(x: f64, y: f64) -> Complex64 {
        Complex64::new(x + y, y - x)
    }

    fn stamp() -> DateTime {
        date(2024, 3, 1).at(0, 0, 0, 0)
    }

    #[test]
    fn add_rejects_duplicate_ids() {
        let mut registry = Registry::new();
        let mut first = PointSet::new("a", stamp());
        first.add_generated(2, field);

        registry.add(first).unwrap();
        let err = registry
            .add(Grid::new("a", stamp(), 1, 1, 1.0, 1.0, field))
            .unwrap_err();

        assert_eq!(err.id, "a");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(0).unwrap().count(), 2);
    }

    #[test]
    fn contains_matches_ids_exactly() {
        let mut registry = Registry::new();
        registry.add(PointSet::new("alpha", stamp())).unwrap();

        assert!(registry.contains("alpha"));
        assert!(!registry.contains("alph"));
        assert!(!registry.contains("beta"));
    }

    #[test]
    fn samples_flatten_in_insertion_order() {
        let mut registry = Registry::new();
        registry
            .add(Grid::new("grid", stamp(), 2, 1, 1.0, 1.0, field))
            .unwrap();
        let mut set = PointSet::new("set", stamp());
        set.add_generated(2, field);
        registry.add(set).unwrap();

        let xs: Vec<f64> = registry.samples().map(|s| s.x()).collect();
        assert_eq!(xs, vec![0.0, 1.0, 0.0, 15.0]);

        let ids: Vec<&str> = registry.iter().map(|d| d.id()).collect();
        assert_eq!(ids, vec!["grid", "set"]);
    }

    #[test]
    fn describe_long_concatenates_entries() {
        let mut registry = Registry::new();
        let mut set = PointSet::new("set", stamp());
        set.add_generated(1, field);
        registry.add(set.clone()).unwrap();
        let grid = Grid::new("grid", stamp(), 1, 1, 1.0, 1.0, field);
        registry.add(grid.clone()).unwrap();

        let line = |s: &Sample| s.to_string();
        assert_eq!(
            registry.describe_long(&line),
            set.describe_long(&line) + &grid.describe_long(&line)
        );
    }

    #[test]
    fn empty_registry_has_no_samples() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert!(registry.get(0).is_none());
        assert_eq!(registry.samples().count(), 0);
    }
}
