/// Descriptive statistics summarizing a dataset.
///
/// This structure contains common measures of central tendency and dispersion
/// for a dataset of `f64` values. Both the population variance (divide by `N`)
/// and the sample variance (divide by `N - 1`) are kept, since plain summaries
/// and confidence intervals need different estimators.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// The number of values in the dataset.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean (average) of the dataset.
    pub mean: f64,
    /// The median value of the dataset (average of the middle pair for even counts).
    pub median: f64,
    /// The population variance of the dataset.
    pub variance: f64,
    /// The population standard deviation of the dataset.
    pub std_dev: f64,
    /// The sample standard deviation (Bessel-corrected, `0.0` for a single value).
    pub sample_std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// This method will sort the values internally before computing statistics.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use cohortlab_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// assert_eq!(stats.variance, 2.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let mean = mean(sorted_values);
        let variance = population_variance(sorted_values);

        Some(Self {
            count: sorted_values.len(),
            min,
            max,
            mean,
            median: median_of_sorted(sorted_values),
            variance,
            std_dev: variance.sqrt(),
            sample_std_dev: sample_std_dev(sorted_values),
        })
    }
}

/// Arithmetic mean of `values`, or `0.0` for an empty slice.
///
/// ```
/// # use cohortlab_stats::descriptive::mean;
/// assert_eq!(mean(&[1.0, 2.0, 6.0]), 3.0);
/// assert_eq!(mean(&[]), 0.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median of unsorted `values`, or `0.0` for an empty slice.
///
/// For an even number of values the two middle values are averaged.
///
/// ```
/// # use cohortlab_stats::descriptive::median;
/// assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
/// ```
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    median_of_sorted(&sorted)
}

fn median_of_sorted(sorted_values: &[f64]) -> f64 {
    let n = sorted_values.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 0 {
        f64::midpoint(sorted_values[n / 2 - 1], sorted_values[n / 2])
    } else {
        sorted_values[n / 2]
    }
}

/// Most frequent value, or `0.0` for an empty slice.
///
/// Ties are resolved in favour of the value encountered first.
///
/// ```
/// # use cohortlab_stats::descriptive::mode;
/// assert_eq!(mode(&[5.0, 7.0, 7.0, 5.0, 9.0]), 5.0);
/// assert_eq!(mode(&[1.0, 2.0, 2.0]), 2.0);
/// ```
#[must_use]
pub fn mode(values: &[f64]) -> f64 {
    // (value, count) in first-seen order
    let mut counts: Vec<(f64, usize)> = Vec::new();
    for &value in values {
        match counts.iter_mut().find(|(v, _)| v.total_cmp(&value).is_eq()) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(f64, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map_or(0.0, |(value, _)| value)
}

/// Population variance (divides by `N`), `0.0` for an empty slice.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean(values);
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by `N`).
///
/// ```
/// # use cohortlab_stats::descriptive::population_std_dev;
/// assert_eq!(population_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 2.0);
/// ```
#[must_use]
pub fn population_std_dev(values: &[f64]) -> f64 {
    population_variance(values).sqrt()
}

/// Sample variance (divides by `N - 1`), `0.0` with fewer than two values.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean(values);
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Sample standard deviation (divides by `N - 1`).
#[must_use]
pub fn sample_std_dev(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

/// Divides `numerator` by `denominator`, resolving a zero denominator to `0.0`.
///
/// ```
/// # use cohortlab_stats::descriptive::ratio;
/// assert_eq!(ratio(3.0, 4.0), 0.75);
/// assert_eq!(ratio(3.0, 0.0), 0.0);
/// ```
#[must_use]
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    finite_or_zero(numerator / denominator)
}

/// Percentage of `part` in `total`, resolving an empty total to `0.0`.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn percentage(part: usize, total: usize) -> f64 {
    ratio(part as f64, total as f64) * 100.0
}

/// Rounds `value` to `decimals` fractional digits.
///
/// ```
/// # use cohortlab_stats::descriptive::round_to;
/// assert_eq!(round_to(12.3456, 2), 12.35);
/// assert_eq!(round_to(2.0 / 3.0, 1), 0.7);
/// ```
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    finite_or_zero((value * factor).round() / factor)
}

/// Maps `NaN` and infinities to `0.0`.
#[must_use]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
