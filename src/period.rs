//! Period and lag analysis over sampled population series.
//!
//! Every operation here is a pure function over a slice of samples. Values are
//! first floored to a coarse decimal precision so that integrator noise does
//! not split one physical peak into several distinct maxima, then the indices
//! sharing the global extremum are compared. Results are index differences
//! (simulation steps), never physical time.

use ordered_float::OrderedFloat;

/// Decimal places kept when flooring samples before extremum matching.
pub const DECIMAL_PLACES: u32 = 2;

/// Index gaps at or below this value are treated as the same peak.
pub const MIN_SEPARATION: i64 = 10;

/// Finest precision an f64 sample can be floored to without `10^places`
/// losing integer exactness.
pub const MAX_DECIMAL_PLACES: u32 = 15;

/// Errors produced by the period analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodError {
    /// No second occurrence of the tracked extremum lies further than the
    /// minimum separation from the first one.
    PeriodNotFound,
    /// The requested precision exceeds [`MAX_DECIMAL_PLACES`].
    UnsupportedPrecision { decimal_places: u32 },
}

impl std::fmt::Display for PeriodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodError::PeriodNotFound => write!(f, "No complete period was found"),
            PeriodError::UnsupportedPrecision { decimal_places } => write!(
                f,
                "{} decimal places requested, at most {} supported",
                decimal_places, MAX_DECIMAL_PLACES
            ),
        }
    }
}

impl std::error::Error for PeriodError {}

/// Extremum-matching analyzer with configurable precision and separation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodAnalyzer {
    decimal_places: u32,
    min_separation: i64,
}

impl Default for PeriodAnalyzer {
    fn default() -> Self {
        PeriodAnalyzer {
            decimal_places: DECIMAL_PLACES,
            min_separation: MIN_SEPARATION,
        }
    }
}

impl PeriodAnalyzer {
    /// Creates an analyzer flooring to `decimal_places` and requiring index
    /// gaps strictly greater than `min_separation`.
    ///
    /// # Errors
    /// Returns [`PeriodError::UnsupportedPrecision`] when `decimal_places`
    /// exceeds [`MAX_DECIMAL_PLACES`].
    pub fn new(decimal_places: u32, min_separation: i64) -> Result<Self, PeriodError> {
        if decimal_places > MAX_DECIMAL_PLACES {
            return Err(PeriodError::UnsupportedPrecision { decimal_places });
        }
        Ok(PeriodAnalyzer {
            decimal_places,
            min_separation,
        })
    }

    /// Floors every sample to the analyzer's precision.
    pub fn quantize(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .map(|&value| quantize_value(value, self.decimal_places))
            .collect()
    }

    /// Index gap between the first global maximum and the first later
    /// maximum separated by more than the threshold.
    ///
    /// # Errors
    /// Returns [`PeriodError::PeriodNotFound`] when the maximum occurs only
    /// once or every repeat lies within the minimum separation.
    pub fn period(&self, population: &[f64]) -> Result<i64, PeriodError> {
        let quantized = self.quantize(population);
        let maximums = max_indices(&quantized);

        if maximums.len() > 1 {
            return self.first_separated(maximums[0], maximums[1], &maximums);
        }

        Err(PeriodError::PeriodNotFound)
    }

    /// Index gap from the first global maximum to the first global minimum
    /// lying more than the threshold after it.
    ///
    /// The guard only requires the maximum to repeat; the minimum positions
    /// are what the result is measured against.
    ///
    /// # Errors
    /// Returns [`PeriodError::PeriodNotFound`] when the maximum occurs only
    /// once or no minimum lies far enough after the first maximum.
    pub fn min_to_max_time(&self, population: &[f64]) -> Result<i64, PeriodError> {
        let quantized = self.quantize(population);
        let maximums = max_indices(&quantized);
        let minimums = min_indices(&quantized);

        if maximums.len() > 1 {
            if let Some(&first_minimum) = minimums.first() {
                return self.first_separated(maximums[0], first_minimum, &minimums);
            }
        }

        Err(PeriodError::PeriodNotFound)
    }

    /// Index lag from the first prey maximum to the first predator maximum
    /// lying more than the threshold after it.
    ///
    /// Only the prey maximum is required to repeat, while the predator
    /// maxima are the ones scanned.
    ///
    /// # Errors
    /// Returns [`PeriodError::PeriodNotFound`] when the prey maximum occurs
    /// only once, whatever the predator series looks like, or when no
    /// predator maximum lies far enough after the first prey maximum.
    pub fn cross_series_lag(&self, prey: &[f64], predator: &[f64]) -> Result<i64, PeriodError> {
        let prey_maximums = max_indices(&self.quantize(prey));
        let predator_maximums = max_indices(&self.quantize(predator));

        if prey_maximums.len() > 1 {
            if let Some(&first_predator) = predator_maximums.first() {
                return self.first_separated(prey_maximums[0], first_predator, &predator_maximums);
            }
        }

        Err(PeriodError::PeriodNotFound)
    }

    /// Checks `leading - anchor` first, then scans `candidates` in order.
    /// Falling off the end of the scan is the failure path.
    fn first_separated(
        &self,
        anchor: usize,
        leading: usize,
        candidates: &[usize],
    ) -> Result<i64, PeriodError> {
        let time_difference = index_difference(leading, anchor);
        if time_difference > self.min_separation {
            return Ok(time_difference);
        }

        for &candidate in candidates {
            let time_difference = index_difference(candidate, anchor);
            if time_difference > self.min_separation {
                return Ok(time_difference);
            }
        }

        Err(PeriodError::PeriodNotFound)
    }
}

fn index_difference(later: usize, earlier: usize) -> i64 {
    later as i64 - earlier as i64
}

/// Floors `value` to `decimal_places`, rounding toward negative infinity.
///
/// `1.0049` becomes `1.00`, `0.999` becomes `0.99` and `-0.001` becomes
/// `-0.01`. The result is the largest `steps / 10^places` not above `value`,
/// so a value already on that grid (`0.29`, whose product with 100 is
/// `28.999...`) maps to itself. Precision is capped at
/// [`MAX_DECIMAL_PLACES`].
pub fn quantize_value(value: f64, decimal_places: u32) -> f64 {
    let scale = 10_f64.powi(decimal_places.min(MAX_DECIMAL_PLACES) as i32);
    let mut steps = (value * scale).floor();
    if steps / scale > value {
        steps -= 1.0;
    } else if (steps + 1.0) / scale <= value {
        steps += 1.0;
    }
    steps / scale
}

/// Ascending indices of every sample equal to the global maximum.
///
/// NaN samples never take part in the extremum. An empty (or all-NaN) slice
/// yields no indices.
pub fn max_indices(values: &[f64]) -> Vec<usize> {
    let maximum = values
        .iter()
        .copied()
        .filter(|value| !value.is_nan())
        .map(OrderedFloat)
        .max();

    match maximum {
        Some(OrderedFloat(maximum)) => indices_equal_to(values, maximum),
        None => Vec::new(),
    }
}

/// Ascending indices of every sample equal to the global minimum.
pub fn min_indices(values: &[f64]) -> Vec<usize> {
    let minimum = values
        .iter()
        .copied()
        .filter(|value| !value.is_nan())
        .map(OrderedFloat)
        .min();

    match minimum {
        Some(OrderedFloat(minimum)) => indices_equal_to(values, minimum),
        None => Vec::new(),
    }
}

fn indices_equal_to(values: &[f64], target: f64) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter(|&(_, &value)| value == target)
        .map(|(index, _)| index)
        .collect()
}

/// Oscillation period of `population` using the default precision and
/// separation.
pub fn compute_period(population: &[f64]) -> Result<i64, PeriodError> {
    PeriodAnalyzer::default().period(population)
}

/// Maximum-to-minimum offset of `population` using the default settings.
pub fn compute_min_to_max_time(population: &[f64]) -> Result<i64, PeriodError> {
    PeriodAnalyzer::default().min_to_max_time(population)
}

/// Prey-to-predator peak lag using the default settings.
pub fn compute_cross_series_lag(prey: &[f64], predator: &[f64]) -> Result<i64, PeriodError> {
    PeriodAnalyzer::default().cross_series_lag(prey, predator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_spike_series(len: usize, peaks: &[usize]) -> Vec<f64> {
        let mut values = vec![1.0; len];
        for &peak in peaks {
            values[peak] = 5.0;
        }
        values
    }

    #[test]
    fn quantize_truncates_instead_of_rounding() {
        assert_eq!(quantize_value(1.0049, 2), 1.0);
        assert_eq!(quantize_value(0.999, 2), 0.99);
        assert_eq!(quantize_value(2.5, 2), 2.5);
    }

    #[test]
    fn quantize_floors_negative_values_downward() {
        assert_eq!(quantize_value(-0.001, 2), -0.01);
        assert_eq!(quantize_value(-1.234, 2), -1.24);
    }

    #[test]
    fn quantize_keeps_values_already_on_the_grid() {
        // 0.29 * 100 and 0.57 * 100 both land just below an integer.
        assert_eq!(quantize_value(0.29, 2), 0.29);
        assert_eq!(quantize_value(0.57, 2), 0.57);
        assert_eq!(quantize_value(-1.1, 2), -1.1);

        for k in -300..=300 {
            let value = k as f64 / 100.0;
            assert_eq!(quantize_value(value, 2), value, "k = {}", k);
        }
    }

    #[test]
    fn quantize_is_idempotent() {
        let analyzer = PeriodAnalyzer::default();
        let mut values: Vec<f64> = (-300..=300).map(|k| k as f64 / 100.0).collect();
        values.extend((-3000..=3000).map(|k| k as f64 * 0.00137));
        values.extend([1.0049, 0.999, 2.5, -0.001, 3.14159, 10.0]);

        let once = analyzer.quantize(&values);
        let twice = analyzer.quantize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn quantize_never_exceeds_the_input() {
        for k in -3000..=3000 {
            let value = k as f64 * 0.00137;
            let quantized = quantize_value(value, 2);
            assert!(quantized <= value, "{} -> {}", value, quantized);
            assert!(value - quantized < 0.01 + 1e-12, "{} -> {}", value, quantized);
        }
    }

    #[test]
    fn analyzer_rejects_unsupported_precision() {
        assert_eq!(
            PeriodAnalyzer::new(16, 10),
            Err(PeriodError::UnsupportedPrecision { decimal_places: 16 })
        );
        assert_eq!(
            PeriodAnalyzer::new(u32::MAX, 10),
            Err(PeriodError::UnsupportedPrecision {
                decimal_places: u32::MAX
            })
        );
        assert!(PeriodAnalyzer::new(MAX_DECIMAL_PLACES, 10).is_ok());
        assert_eq!(quantize_value(1.25, u32::MAX), 1.25);
    }

    #[test]
    fn extremum_indices_are_ascending() {
        let values = vec![3.0, 1.0, 3.0, 0.5, 3.0, 0.5];
        assert_eq!(max_indices(&values), vec![0, 2, 4]);
        assert_eq!(min_indices(&values), vec![3, 5]);
    }

    #[test]
    fn extremum_indices_skip_nan() {
        let values = vec![f64::NAN, 2.0, 1.0, 2.0];
        assert_eq!(max_indices(&values), vec![1, 3]);
        assert_eq!(min_indices(&values), vec![2]);
        assert!(max_indices(&[f64::NAN]).is_empty());
        assert!(min_indices(&[]).is_empty());
    }

    #[test]
    fn period_fails_for_unique_maximum() {
        let values = single_spike_series(40, &[7]);
        assert_eq!(compute_period(&values), Err(PeriodError::PeriodNotFound));
    }

    #[test]
    fn period_fails_on_empty_input() {
        assert_eq!(compute_period(&[]), Err(PeriodError::PeriodNotFound));
    }

    #[test]
    fn period_requires_gap_strictly_above_threshold() {
        let values = vec![1.0, 5.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 5.0, 1.0];
        assert_eq!(compute_period(&values), Err(PeriodError::PeriodNotFound));
    }

    #[test]
    fn period_accepts_gap_of_eleven() {
        let values = vec![
            1.0, 5.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 5.0, 1.0,
        ];
        assert_eq!(compute_period(&values), Ok(11));
    }

    #[test]
    fn period_skips_close_repeats_of_the_same_peak() {
        // Plateau at 2..=4, genuine repeat at 30.
        let values = single_spike_series(40, &[2, 3, 4, 30]);
        assert_eq!(compute_period(&values), Ok(28));
    }

    #[test]
    fn period_measures_from_first_maximum_not_previous() {
        // Repeats at 8 and 15 are each within 10 of their predecessor but 15
        // is 13 steps after the first maximum.
        let values = single_spike_series(30, &[2, 8, 15, 25]);
        assert_eq!(compute_period(&values), Ok(13));
    }

    #[test]
    fn period_matches_after_flooring_noise() {
        let mut values = single_spike_series(50, &[]);
        values[5] = 5.001;
        values[25] = 5.009;
        assert_eq!(compute_period(&values), Ok(20));
    }

    #[test]
    fn period_with_custom_threshold() {
        let values = single_spike_series(30, &[1, 11]);
        assert_eq!(compute_period(&values), Err(PeriodError::PeriodNotFound));
        assert_eq!(PeriodAnalyzer::new(2, 9).unwrap().period(&values), Ok(10));
    }

    #[test]
    fn min_to_max_time_measures_to_first_distant_minimum() {
        let mut values = single_spike_series(60, &[3, 40]);
        values[20] = 0.0;
        values[50] = 0.0;
        assert_eq!(compute_min_to_max_time(&values), Ok(17));
    }

    #[test]
    fn min_to_max_time_guards_on_maximum_count_only() {
        // Two minima, one maximum: the guard rejects it.
        let mut values = single_spike_series(60, &[3]);
        values[20] = 0.0;
        values[50] = 0.0;
        assert_eq!(
            compute_min_to_max_time(&values),
            Err(PeriodError::PeriodNotFound)
        );

        // Two maxima, one minimum: the guard passes and the single minimum
        // is used.
        let mut values = single_spike_series(60, &[3, 40]);
        values[30] = 0.0;
        assert_eq!(compute_min_to_max_time(&values), Ok(27));
    }

    #[test]
    fn min_to_max_time_fails_when_minimum_precedes_maximum() {
        let mut values = single_spike_series(60, &[30, 50]);
        values[2] = 0.0;
        assert_eq!(
            compute_min_to_max_time(&values),
            Err(PeriodError::PeriodNotFound)
        );
    }

    #[test]
    fn min_to_max_time_scans_later_minima() {
        let mut values = single_spike_series(60, &[10, 45]);
        values[15] = 0.0;
        values[35] = 0.0;
        assert_eq!(compute_min_to_max_time(&values), Ok(25));
    }

    #[test]
    fn lag_fails_for_single_prey_peak_even_with_periodic_predator() {
        let prey = single_spike_series(80, &[5]);
        let predator = single_spike_series(80, &[20, 45, 70]);
        assert_eq!(
            compute_cross_series_lag(&prey, &predator),
            Err(PeriodError::PeriodNotFound)
        );
    }

    #[test]
    fn lag_uses_predator_maxima_against_first_prey_maximum() {
        let prey = single_spike_series(80, &[5, 55]);
        let predator = single_spike_series(80, &[20, 70]);
        assert_eq!(compute_cross_series_lag(&prey, &predator), Ok(15));
    }

    #[test]
    fn lag_accepts_single_predator_peak() {
        let prey = single_spike_series(80, &[5, 55]);
        let predator = single_spike_series(80, &[30]);
        assert_eq!(compute_cross_series_lag(&prey, &predator), Ok(25));
    }

    #[test]
    fn lag_skips_predator_peaks_too_close_to_prey_peak() {
        let prey = single_spike_series(80, &[5, 55]);
        let predator = single_spike_series(80, &[10, 40]);
        assert_eq!(compute_cross_series_lag(&prey, &predator), Ok(35));

        let predator = single_spike_series(80, &[1, 15]);
        assert_eq!(
            compute_cross_series_lag(&prey, &predator),
            Err(PeriodError::PeriodNotFound)
        );
    }

    #[test]
    fn lag_with_empty_predator_fails() {
        let prey = single_spike_series(80, &[5, 55]);
        assert_eq!(
            compute_cross_series_lag(&prey, &[]),
            Err(PeriodError::PeriodNotFound)
        );
    }

    #[test]
    fn error_message_is_human_readable() {
        assert_eq!(
            PeriodError::PeriodNotFound.to_string(),
            "No complete period was found"
        );
    }
}
