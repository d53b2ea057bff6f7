//! Simple linear regression.

use crate::descriptive::{finite_or_zero, mean};

/// Ordinary least squares fit of `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRegression {
    /// Slope of the fitted line.
    pub slope: f64,
    /// Value of the fitted line at `x = 0`.
    pub intercept: f64,
    /// Coefficient of determination (`r²`), `0.0` for degenerate fits.
    pub r_squared: f64,
    /// Number of points used in the fit.
    pub n: usize,
}

impl LinearRegression {
    /// Fits a line through the paired points `(x[i], y[i])`.
    ///
    /// Only the first `min(x.len(), y.len())` pairs are used. Degenerate input
    /// never panics:
    ///
    /// - no points: slope `0.0`, intercept `0.0`
    /// - one point, or all `x` equal: slope `0.0`, intercept `mean(y)`
    ///
    /// # Examples
    ///
    /// ```
    /// use cohortlab_stats::regression::LinearRegression;
    ///
    /// let fit = LinearRegression::fit(&[5.0], &[7.0]);
    /// assert_eq!(fit.slope, 0.0);
    /// assert_eq!(fit.intercept, 7.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fit(x: &[f64], y: &[f64]) -> Self {
        let n = x.len().min(y.len());
        let (x, y) = (&x[..n], &y[..n]);
        if n == 0 {
            return Self {
                slope: 0.0,
                intercept: 0.0,
                r_squared: 0.0,
                n,
            };
        }

        let nf = n as f64;
        let x_mean = mean(x);
        let y_mean = mean(y);
        let (sxx, sxy, syy) = x.iter().zip(y).fold((0.0, 0.0, 0.0), |(sxx, sxy, syy), (a, b)| {
            let (dx, dy) = (a - x_mean, b - y_mean);
            (sxx + dx * dx, sxy + dx * dy, syy + dy * dy)
        });

        // deviations below rounding noise of the mean count as constant x
        let tolerance = nf * (4.0 * f64::EPSILON * x_mean.abs().max(1.0)).powi(2);
        if n < 2 || sxx <= tolerance {
            return Self {
                slope: 0.0,
                intercept: y_mean,
                r_squared: 0.0,
                n,
            };
        }

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;
        let r_squared = if syy > 0.0 {
            (sxy * sxy / (sxx * syy)).min(1.0)
        } else {
            0.0
        };
        Self {
            slope: finite_or_zero(slope),
            intercept: finite_or_zero(intercept),
            r_squared: finite_or_zero(r_squared),
            n,
        }
    }

    /// Evaluates the fitted line at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_line() {
        let x = (0..20).map(f64::from).collect::<Vec<_>>();
        let y = x.iter().map(|v| 2.0 * v + 3.0).collect::<Vec<_>>();
        let fit = LinearRegression::fit(&x, &y);
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 3.0).abs() < 1e-9);
        assert!((fit.r_squared - 1.0).abs() < 1e-9);
        assert_eq!(fit.n, 20);
        assert!((fit.predict(100.0) - 203.0).abs() < 1e-6);
    }

    #[test]
    fn test_line_far_from_origin() {
        let x = (0..10).map(|i| 1.7e9 + f64::from(i)).collect::<Vec<_>>();
        let y = x.iter().map(|v| 2.0 * v + 3.0).collect::<Vec<_>>();
        let fit = LinearRegression::fit(&x, &y);
        assert!((fit.slope - 2.0).abs() < 1e-9, "{fit:?}");
        assert!((fit.intercept - 3.0).abs() < 1e-3, "{fit:?}");
        assert!((fit.r_squared - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_and_single_point() {
        let empty = LinearRegression::fit(&[], &[]);
        assert_eq!(empty.slope, 0.0);
        assert_eq!(empty.intercept, 0.0);
        assert_eq!(empty.n, 0);

        let single = LinearRegression::fit(&[3.0], &[9.0]);
        assert_eq!(single.slope, 0.0);
        assert_eq!(single.intercept, 9.0);
    }

    #[test]
    fn test_vertical_points_do_not_divide_by_zero() {
        let fit = LinearRegression::fit(&[2.0, 2.0, 2.0], &[1.0, 2.0, 6.0]);
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 3.0);
        assert!(fit.slope.is_finite() && fit.intercept.is_finite());
    }

    #[test]
    fn test_mismatched_lengths_use_common_prefix() {
        let fit = LinearRegression::fit(&[0.0, 1.0, 2.0, 99.0], &[1.0, 2.0, 3.0]);
        assert_eq!(fit.n, 3);
        assert!((fit.slope - 1.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
    }
}
