//! Slice width schedule.
//!
//! Slices near the base are wide and shrink towards the tips, where branches
//! are thin and closely spaced. Widths follow an inverted exponential curve
//! rescaled into `[minbin, maxbin]`; the number of slices is searched so that
//! the widths just cover the largest distance in the cloud.

// Bin counts are small positive integers
#![allow(clippy::cast_precision_loss)]

use tracing::{debug, info, warn};

use crate::error::{SliceError, SliceResult};
use crate::params::BinParams;

/// Upper end of the accepted width sum, as a multiple of the max distance.
const SUM_TOLERANCE: f64 = 1.05;

/// Slice widths and their cumulative boundaries.
///
/// # Example
///
/// ```
/// use tree_slice::BinSchedule;
///
/// let schedule = BinSchedule::from_widths(vec![0.5, 0.3, 0.2]);
/// assert_eq!(schedule.slice_of(0.0), 0);
/// assert_eq!(schedule.slice_of(0.5), 1);
/// assert_eq!(schedule.slice_of(0.79), 1);
/// assert_eq!(schedule.slice_of(1.0), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinSchedule {
    widths: Vec<f64>,
    cumulative: Vec<f64>,
    iterations: usize,
}

impl BinSchedule {
    /// Schedule from explicit widths.
    #[must_use]
    pub fn from_widths(widths: Vec<f64>) -> Self {
        let cumulative = widths
            .iter()
            .scan(0.0, |acc, &w| {
                *acc += w;
                Some(*acc)
            })
            .collect();
        Self {
            widths,
            cumulative,
            iterations: 0,
        }
    }

    /// Width of every slice, base first.
    #[must_use]
    pub fn widths(&self) -> &[f64] {
        &self.widths
    }

    /// Upper boundary of every slice.
    #[must_use]
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Number of slices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    /// Returns true if the schedule has no slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Sum of all widths.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Search steps it took to find this schedule.
    #[must_use]
    pub const fn iterations(&self) -> usize {
        self.iterations
    }

    /// Width of a slice.
    ///
    /// A distance equal to the total lands one past the last slice; that slice
    /// reports the last width.
    #[must_use]
    pub fn width(&self, slice_id: usize) -> Option<f64> {
        if slice_id == self.widths.len() {
            return self.widths.last().copied();
        }
        self.widths.get(slice_id).copied()
    }

    /// Slice of a distance: the number of boundaries at or below it.
    ///
    /// Slices are right-open, so a distance exactly on a boundary belongs to
    /// the slice above it.
    #[must_use]
    pub fn slice_of(&self, distance: f64) -> usize {
        self.cumulative.partition_point(|&c| c <= distance)
    }
}

/// Width curve for `n` slices.
fn width_curve(n: usize, params: &BinParams) -> Vec<f64> {
    let span = params.maxbin - params.minbin;
    if n == 1 {
        return vec![params.maxbin];
    }
    let raw: Vec<f64> = (0..n)
        .map(|i| -(params.exponent * (i as f64 / (n - 1) as f64)).exp())
        .collect();
    let (min, max) = raw
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;
    if range <= 0.0 {
        return vec![params.maxbin; n];
    }
    raw.iter()
        .map(|&v| span.mul_add((v - min) / range, params.minbin))
        .collect()
}

/// Find the slice widths covering `max_distance`.
///
/// Starting from `initial_bins` slices the count is stepped up while the
/// widths fall short of `max_distance` and down while they reach
/// `1.05 * max_distance` or more. The search stops once the sum lands in
/// `[max_distance, 1.05 * max_distance)`.
///
/// A zero distance gets a single slice of width `maxbin`.
///
/// # Errors
///
/// - [`SliceError::InvalidParameter`] if `params` fail validation or
///   `max_distance` is negative or not finite
/// - [`SliceError::DegenerateBinning`] if the search revisits a bin count or
///   runs out of iterations; this happens when `maxbin` is too coarse for the
///   5% window around `max_distance`
///
/// # Example
///
/// ```
/// use tree_slice::{schedule_bins, BinParams};
///
/// let schedule = schedule_bins(1.0, &BinParams::default()).unwrap();
/// assert!(schedule.total() >= 1.0 && schedule.total() < 1.05);
/// ```
pub fn schedule_bins(max_distance: f64, params: &BinParams) -> SliceResult<BinSchedule> {
    params.validate()?;
    if !max_distance.is_finite() || max_distance < 0.0 {
        return Err(crate::error::invalid(format!(
            "max distance must be finite and >= 0 (got {max_distance})"
        )));
    }

    if max_distance <= 0.0 {
        warn!("All reachable points are at the base, using a single slice");
        return Ok(BinSchedule {
            iterations: 1,
            ..BinSchedule::from_widths(vec![params.maxbin])
        });
    }

    info!(
        max_distance = format!("{max_distance:.3}"),
        minbin = params.minbin,
        maxbin = params.maxbin,
        "Scheduling slice widths"
    );

    let upper = max_distance * SUM_TOLERANCE;
    let mut n = params.initial_bins;
    let mut last_step: Option<bool> = None;

    for iteration in 1..=params.max_iterations {
        let widths = width_curve(n, params);
        let sum: f64 = widths.iter().sum();

        if sum >= max_distance && sum < upper {
            let schedule = BinSchedule {
                iterations: iteration,
                ..BinSchedule::from_widths(widths)
            };
            debug!(
                bins = schedule.len(),
                sum = format!("{sum:.4}"),
                iterations = iteration,
                "Slice widths found"
            );
            return Ok(schedule);
        }

        let step_up = sum < max_distance;
        let reversed = last_step.is_some_and(|up| up != step_up);
        let stuck = !step_up && n == 1;
        if reversed || stuck || iteration == params.max_iterations {
            return Err(SliceError::DegenerateBinning {
                max_distance,
                iterations: iteration,
                last_bins: n,
                last_sum: sum,
            });
        }

        n = if step_up { n + 1 } else { n - 1 };
        last_step = Some(step_up);
    }

    // max_iterations >= 1, so the loop always returns
    Err(SliceError::DegenerateBinning {
        max_distance,
        iterations: params.max_iterations,
        last_bins: n,
        last_sum: 0.0,
    })
}

/// Slice id of every point; unreachable points get none.
#[must_use]
pub fn assign_slices(distances: &[Option<f64>], schedule: &BinSchedule) -> Vec<Option<usize>> {
    distances
        .iter()
        .map(|d| d.filter(|d| d.is_finite()).map(|d| schedule.slice_of(d)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn curve_spans_min_to_max() {
        let params = BinParams::default();
        let widths = width_curve(50, &params);

        assert_relative_eq!(widths[0], params.maxbin, epsilon = 1e-12);
        assert_relative_eq!(widths[49], params.minbin, epsilon = 1e-12);
        assert!(widths.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn flat_curve_uses_maxbin() {
        let params = BinParams::default().with_exponent(0.0);
        assert!(width_curve(10, &params).iter().all(|&w| (w - 0.02).abs() < 1e-15));
        assert_eq!(width_curve(1, &BinParams::default()), vec![0.02]);
    }

    #[test]
    fn sum_lands_in_window() {
        for &d in &[1.0, 2.5, 7.0] {
            let schedule = schedule_bins(d, &BinParams::default()).unwrap();
            assert!(schedule.total() >= d, "sum {} below {d}", schedule.total());
            assert!(schedule.total() < d * 1.05);
            assert!(schedule.iterations() >= 1);
        }
    }

    #[test]
    fn zero_distance_single_bin() {
        let schedule = schedule_bins(0.0, &BinParams::default()).unwrap();
        assert_eq!(schedule.widths(), &[0.02]);
        assert_eq!(schedule.slice_of(0.0), 0);
    }

    #[test]
    fn coarse_bins_cannot_fit_tiny_distance() {
        // One bin of 0.02 overshoots 0.01 * 1.05 and n cannot drop below 1
        let err = schedule_bins(0.01, &BinParams::default()).unwrap_err();
        assert!(matches!(err, SliceError::DegenerateBinning { last_bins: 1, .. }));
    }

    #[test]
    fn oscillation_is_reported() {
        // Uniform 0.5 bins: 2 bins give 1.0 < 1.2, 3 give 1.5 >= 1.26
        let params = BinParams::uniform(0.5);
        let err = schedule_bins(1.2, &params).unwrap_err();
        assert!(matches!(err, SliceError::DegenerateBinning { .. }));
    }

    #[test]
    fn iteration_cap() {
        let params = BinParams::default().with_max_iterations(3);
        let err = schedule_bins(100.0, &params).unwrap_err();
        assert!(matches!(
            err,
            SliceError::DegenerateBinning {
                iterations: 3,
                last_bins: 52,
                ..
            }
        ));
    }

    #[test]
    fn invalid_distance_rejected() {
        assert!(schedule_bins(-1.0, &BinParams::default()).is_err());
        assert!(schedule_bins(f64::NAN, &BinParams::default()).is_err());
    }

    #[test]
    fn slices_are_right_open() {
        let schedule = BinSchedule::from_widths(vec![0.5, 0.5]);
        let ids = assign_slices(&[Some(0.0), Some(0.4999), Some(0.5), Some(1.0), None], &schedule);
        assert_eq!(ids, vec![Some(0), Some(0), Some(1), Some(2), None]);
        assert_eq!(schedule.width(2), Some(0.5));
        assert_eq!(schedule.width(3), None);
    }
}
