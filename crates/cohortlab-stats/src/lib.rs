//! Statistical utilities for cohort analysis.
//!
//! This crate provides the numeric building blocks used by the cohort summaries,
//! relationship analysis and imputation:
//!
//! - **Descriptive statistics**: mean, median, mode, population and sample spread
//! - **Correlation**: Pearson correlation coefficient with strength classification
//! - **Regression**: ordinary least squares fit of a straight line
//! - **Confidence intervals**: mean ± margin of error bands for estimate uncertainty
//!
//! Every function here is total over finite input: empty series, zero variance and
//! zero denominators resolve to defined neutral values (usually `0.0`) instead of
//! panicking or producing `NaN`.
//!
//! # Modules
//!
//! - [`descriptive`]: Central tendency, dispersion and zero-guarded helpers
//! - [`correlation`]: Pearson correlation and its weak/moderate/strong bands
//! - [`regression`]: Simple linear regression
//! - [`confidence`]: Normal-approximation confidence intervals
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use cohortlab_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.median, 3.0);
//! ```
//!
//! ## Correlating two series
//!
//! ```
//! use cohortlab_stats::correlation::{CorrelationStrength, correlation};
//!
//! let x = [1.0, 2.0, 3.0, 4.0];
//! let y = [2.0, 4.0, 6.0, 8.0];
//! let r = correlation(&x, &y);
//! assert!((r - 1.0).abs() < 1e-12);
//! assert_eq!(CorrelationStrength::classify(r), CorrelationStrength::Strong);
//! ```
//!
//! ## Fitting a line
//!
//! ```
//! use cohortlab_stats::regression::LinearRegression;
//!
//! let x = [0.0, 1.0, 2.0, 3.0];
//! let y = [3.0, 5.0, 7.0, 9.0];
//! let fit = LinearRegression::fit(&x, &y);
//! assert!((fit.slope - 2.0).abs() < 1e-12);
//! assert!((fit.intercept - 3.0).abs() < 1e-12);
//! ```

pub mod confidence;
pub mod correlation;
pub mod descriptive;
pub mod regression;
