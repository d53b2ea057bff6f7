//! Synthetic patient cohorts for healthcare quality-improvement work.
//!
//! - [`core`] - participant data model, simulation configuration and vocabularies
//! - [`engine`] - seeded random cohort generation
//! - [`import`] - validation of externally supplied cohort data

pub use self::{core::*, engine::*, import::*};

pub mod core;
pub mod engine;
pub mod import;
