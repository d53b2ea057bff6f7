//! Pearson correlation between two numeric series.

use std::fmt;

use crate::descriptive::{finite_or_zero, mean};

/// Verbal strength band of a correlation coefficient.
///
/// Bands are taken on `|r|`: below 0.3 is weak, below 0.7 moderate, otherwise strong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorrelationStrength {
    Weak,
    Moderate,
    Strong,
}

impl CorrelationStrength {
    const WEAK_LIMIT: f64 = 0.3;
    const MODERATE_LIMIT: f64 = 0.7;

    /// Classifies a correlation coefficient into its strength band.
    ///
    /// ```
    /// # use cohortlab_stats::correlation::CorrelationStrength;
    /// assert_eq!(CorrelationStrength::classify(0.1), CorrelationStrength::Weak);
    /// assert_eq!(CorrelationStrength::classify(-0.5), CorrelationStrength::Moderate);
    /// assert_eq!(CorrelationStrength::classify(0.7), CorrelationStrength::Strong);
    /// ```
    #[must_use]
    pub fn classify(r: f64) -> Self {
        let r = r.abs();
        if r < Self::WEAK_LIMIT {
            Self::Weak
        } else if r < Self::MODERATE_LIMIT {
            Self::Moderate
        } else {
            Self::Strong
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Moderate => "moderate",
            Self::Strong => "strong",
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computes the Pearson correlation coefficient of `x` and `y`.
///
/// Returns `0.0` when the series differ in length, contain fewer than two
/// points, or when either series has zero variance. The result is symmetric in
/// its arguments.
///
/// # Examples
///
/// ```
/// use cohortlab_stats::correlation::correlation;
///
/// let x = [1.0, 2.0, 3.0];
/// let y = [3.0, 2.0, 1.0];
/// assert!((correlation(&x, &y) + 1.0).abs() < 1e-12);
///
/// // constant series
/// assert_eq!(correlation(&x, &[5.0, 5.0, 5.0]), 0.0);
/// ```
#[must_use]
pub fn correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return 0.0;
    }

    let mean_x = mean(x);
    let mean_y = mean(y);
    let mut covariance = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        covariance += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    // Multiply before sqrt so that swapping x and y yields the same bits
    let denominator = (sum_sq_x * sum_sq_y).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    finite_or_zero((covariance / denominator).clamp(-1.0, 1.0))
}
