//! Normal-approximation confidence intervals for a mean.

use crate::descriptive::{finite_or_zero, mean, sample_std_dev};

/// z-score for a two-sided 95% interval.
pub const Z_95: f64 = 1.96;

/// A mean with its lower and upper confidence bounds.
///
/// The margin of error is `z * s / sqrt(n)` where `s` is the sample standard
/// deviation (divides by `N - 1`). With fewer than two values the margin is zero
/// and the band collapses onto the mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInterval {
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
    pub margin_of_error: f64,
    pub n: usize,
}

impl ConfidenceInterval {
    /// Computes the interval for `values` at the given `z` score.
    ///
    /// # Examples
    ///
    /// ```
    /// use cohortlab_stats::confidence::{ConfidenceInterval, Z_95};
    ///
    /// let ci = ConfidenceInterval::new(&[10.0, 12.0, 14.0], Z_95);
    /// assert_eq!(ci.mean, 12.0);
    /// assert!(ci.lower < 12.0 && ci.upper > 12.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(values: &[f64], z: f64) -> Self {
        let n = values.len();
        let mean = mean(values);
        let margin_of_error = if n < 2 {
            0.0
        } else {
            finite_or_zero(z * sample_std_dev(values) / (n as f64).sqrt())
        };
        Self {
            mean,
            lower: mean - margin_of_error,
            upper: mean + margin_of_error,
            margin_of_error,
            n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margin_uses_sample_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let ci = ConfidenceInterval::new(&values, Z_95);
        let expected = Z_95 * (32.0_f64 / 7.0).sqrt() / 8.0_f64.sqrt();
        assert!((ci.margin_of_error - expected).abs() < 1e-12);
        assert!((ci.upper - ci.lower - 2.0 * expected).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_band() {
        let empty = ConfidenceInterval::new(&[], Z_95);
        assert_eq!(empty.mean, 0.0);
        assert_eq!(empty.margin_of_error, 0.0);

        let single = ConfidenceInterval::new(&[37.2], Z_95);
        assert_eq!(single.lower, 37.2);
        assert_eq!(single.upper, 37.2);
    }
}
