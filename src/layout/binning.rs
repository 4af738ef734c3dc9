use crate::error::{LayoutError, Result};

/// Equal-width quantization of one axis of a page.
///
/// `[min, max]` is cut into `intervals` half-open slices (the last one
/// closed). Only slices that received at least one fitted value become
/// buckets, numbered from 0 in ascending order, so bucket indices stay
/// contiguous even when bands of the page are empty.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisBucketing {
    min: f64,
    max: f64,
    intervals: usize,
    occupied: Vec<usize>,
}

impl AxisBucketing {
    pub fn fit(values: &[f64], intervals: usize) -> Result<Self> {
        if intervals == 0 {
            return Err(LayoutError::InvalidBinConfiguration(
                "bucket count must be at least 1".to_string(),
            ));
        }
        if values.is_empty() {
            return Err(LayoutError::InvalidBinConfiguration(
                "cannot bin an empty set of values".to_string(),
            ));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(LayoutError::InvalidBinConfiguration(format!(
                "non-finite coordinate {bad}"
            )));
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut bucketing = Self {
            min,
            max,
            intervals,
            occupied: Vec::new(),
        };
        let mut occupied: Vec<usize> = values.iter().map(|&v| bucketing.interval_of(v)).collect();
        occupied.sort_unstable();
        occupied.dedup();
        bucketing.occupied = occupied;
        Ok(bucketing)
    }

    fn interval_of(&self, value: f64) -> usize {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0;
        }
        let width = span / self.intervals as f64;
        let raw = ((value - self.min) / width).floor();
        if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(self.intervals - 1)
        }
    }

    /// Buckets for values taken from the fitted set.
    pub fn assign(&self, values: &[f64]) -> Vec<usize> {
        values
            .iter()
            .map(|&v| {
                let interval = self.interval_of(v);
                self.occupied.partition_point(|&o| o < interval)
            })
            .collect()
    }
}

pub fn bin_axis(values: &[f64], num_buckets: usize) -> Result<Vec<usize>> {
    let bucketing = AxisBucketing::fit(values, num_buckets)?;
    Ok(bucketing.assign(values))
}
