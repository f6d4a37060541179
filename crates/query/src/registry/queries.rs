use std::collections::HashMap;

use fieldset_core::{PointKey, Sample};

use super::Registry;

impl Registry {
    /// Returns the mean magnitude over every sample in the registry.
    ///
    /// Returns `NaN` if the registry holds no samples at all.
    /// This differs from [`Dataset::mean_magnitude`], which reports `0.0`
    /// for an empty dataset.
    ///
    /// [`Dataset::mean_magnitude`]: fieldset_core::Dataset::mean_magnitude
    #[must_use]
    pub fn mean_magnitude(&self) -> f64 {
        let (sum, count) = self
            .samples()
            .fold((0.0, 0_usize), |(sum, count), sample| {
                (sum + sample.magnitude(), count + 1)
            });
        if count == 0 {
            return f64::NAN;
        }
        sum / count as f64
    }

    /// Returns the sample whose magnitude deviates most from
    /// [`Registry::mean_magnitude`].
    ///
    /// Ties go to the sample that comes first in flattening order.
    /// A `NaN` deviation never beats a finite one.
    /// Returns `None` if the registry holds no samples.
    #[must_use]
    pub fn max_deviation_sample(&self) -> Option<Sample> {
        let mean = self.mean_magnitude();
        let mut best: Option<(Sample, f64)> = None;

        for sample in self.samples() {
            let deviation = (sample.magnitude() - mean).abs();
            let replace = match best {
                None => true,
                Some((_, current)) => exceeds(deviation, current),
            };
            if replace {
                best = Some((sample, deviation));
            }
        }

        best.map(|(sample, _)| sample)
    }

    /// Returns the distinct x coordinates of points that occur more than once.
    ///
    /// A sample counts when at least one other sample, from any dataset,
    /// has exactly the same `(x, y)`.
    /// Its x coordinate is narrowed to `f32` before deduplication, so
    /// distinct `f64` values that round to the same `f32` are reported once.
    /// Values are listed in order of first occurrence.
    ///
    /// Returns `None` if no point repeats.
    #[must_use]
    pub fn duplicated_x_coordinates(&self) -> Option<Vec<f32>> {
        let mut occurrences: HashMap<PointKey, usize> = HashMap::new();
        for key in self.samples().filter_map(|sample| sample.point_key()) {
            *occurrences.entry(key).or_default() += 1;
        }

        let mut xs: Vec<f32> = Vec::new();
        for sample in self.samples() {
            let repeated = sample
                .point_key()
                .is_some_and(|key| occurrences.get(&key).is_some_and(|&n| n > 1));
            // Narrowing is intentional; see the method docs.
            let x = sample.x() as f32;
            if repeated && !xs.contains(&x) {
                xs.push(x);
            }
        }

        (!xs.is_empty()).then_some(xs)
    }
}

/// Returns `true` if `candidate` is a strictly larger deviation than `current`.
fn exceeds(candidate: f64, current: f64) -> bool {
    if current.is_nan() {
        !candidate.is_nan()
    } else {
        candidate > current
    }
}
