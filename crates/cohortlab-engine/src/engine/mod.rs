//! Random cohort generation.
//!
//! This module turns a validated [`SimulationConfig`](crate::core::SimulationConfig)
//! into a cohort of internally consistent participants:
//!
//! - [`CohortGenerator`] - validates the configuration and builds participants
//! - [`CohortSeed`] - 128-bit seed making generation reproducible
//!
//! # Generation Flow
//!
//! For each participant index:
//!
//! 1. Derive a dedicated RNG stream from the seed and the index
//! 2. Draw demographics, condition and outcome (outcome weights follow the
//!    configured distribution)
//! 3. Derive risk score, readmission risk and length of stay from condition
//!    severity, outcome and age
//! 4. Place the stay inside the configured date window and lay out measurement times
//! 5. Synthesize vital trajectories, then inject missing values if enabled
//! 6. Attach treatments, comorbidities and the deep phenotype
//!
//! # Example
//!
//! ```
//! use cohortlab_engine::{CohortGenerator, CohortSeed, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     num_participants: 5,
//!     ..SimulationConfig::default()
//! };
//! let generator = CohortGenerator::new(config).unwrap();
//! let cohort = generator.generate(CohortSeed::from_u128(1));
//! assert_eq!(cohort.len(), 5);
//! ```

use rand::{
    Rng,
    distr::{Distribution as _, weighted::WeightedIndex},
};
use rand_distr::StandardNormal;

pub use self::{generator::*, seed::*};

mod generator;
mod phenotype;
mod seed;
mod vitals;

/// Draws from a normal distribution centred on zero with standard deviation `sd`.
fn gaussian<R>(rng: &mut R, sd: f64) -> f64
where
    R: Rng + ?Sized,
{
    let z: f64 = rng.sample(StandardNormal);
    z * sd
}

/// Picks an index with probability proportional to `weights`.
///
/// Weights that do not form a distribution always pick the first index.
fn pick_weighted<R>(rng: &mut R, weights: &[f64]) -> usize
where
    R: Rng + ?Sized,
{
    WeightedIndex::<f64>::new(weights).map_or(0, |dist| dist.sample(rng))
}
