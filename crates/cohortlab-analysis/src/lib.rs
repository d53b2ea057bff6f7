//! Analysis of synthetic or imported patient cohorts.
//!
//! Every analysis is a pure function of a cohort slice (`&[Participant]`) and
//! never mutates it. Results are plain structs that serialize to camelCase JSON.
//!
//! # Modules
//!
//! - [`summary`]: dashboard overview ([`summary::CohortSummary`]) and grouped
//!   aggregates by condition, unit, gender or outcome
//! - [`metric`]: per-participant numeric metrics parsed from names such as
//!   `riskScore` or `vital:heartRate`
//! - [`relationship`]: correlation and linear fit between two metrics
//! - [`missingness`]: per-vital missing-value counts and percentages
//! - [`imputation`]: strategies filling missing vitals in a copy of the cohort
//! - [`timeseries`]: per-day vital means with confidence bands
//! - [`narrative`]: templated case notes
//! - [`store`]: persisted session state behind a key-value backend
//!
//! # Example
//!
//! ```
//! use cohortlab_analysis::{
//!     imputation::{ImputationOptions, impute},
//!     missingness::MissingnessReport,
//! };
//! use cohortlab_engine::{CohortGenerator, CohortSeed, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     num_participants: 10,
//!     include_missing_data: true,
//!     missing_data_probability: 0.2,
//!     ..SimulationConfig::default()
//! };
//! let cohort = CohortGenerator::new(config)
//!     .unwrap()
//!     .generate(CohortSeed::from_u128(7));
//!
//! let imputed = impute(&cohort, &ImputationOptions::default());
//! assert_eq!(MissingnessReport::new(&imputed).total_missing(), 0);
//! ```

pub mod imputation;
pub mod metric;
pub mod missingness;
pub mod narrative;
pub mod relationship;
pub mod store;
pub mod summary;
pub mod timeseries;
