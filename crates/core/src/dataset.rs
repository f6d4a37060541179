use std::fmt;

use jiff::civil::DateTime;

use crate::Sample;

/// The capability set shared by every collection of samples.
///
/// A dataset is identified by its [`id`](Dataset::id), which is the identity
/// key inside a registry, and carries the [`timestamp`](Dataset::timestamp)
/// it was recorded at.
///
/// The [`fmt::Display`] implementation renders the short description: a
/// header with the identity fields and shape-specific dimensions, one field
/// per line.
pub trait Dataset: fmt::Debug + fmt::Display {
    /// Returns the identifier of this dataset.
    fn id(&self) -> &str;

    /// Returns the time this dataset was recorded.
    fn timestamp(&self) -> DateTime;

    /// Returns the number of logical samples.
    fn count(&self) -> usize;

    /// Returns a fresh traversal over the samples in natural order.
    ///
    /// Each call starts a new traversal.
    fn samples(&self) -> Box<dyn Iterator<Item = Sample> + '_>;

    /// Returns the arithmetic mean of the sample magnitudes.
    ///
    /// Returns `0.0` for an empty dataset.
    fn mean_magnitude(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            return 0.0;
        }
        let sum: f64 = self.samples().map(|sample| sample.magnitude()).sum();
        sum / count as f64
    }

    /// Renders the short description followed by one line per sample.
    ///
    /// Each sample is rendered by `line`, which should not include a
    /// trailing newline.
    fn describe_long(&self, line: &dyn Fn(&Sample) -> String) -> String {
        let mut out = format!("{self}\n");
        for sample in self.samples() {
            out.push_str(&line(&sample));
            out.push('\n');
        }
        out.push('\n');
        out
    }

    /// Renders the long description using the [`Sample`] display format.
    fn describe_long_default(&self) -> String {
        self.describe_long(&|sample: &Sample| sample.to_string())
    }
}
