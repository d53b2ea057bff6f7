//! Cohort data model.
//!
//! - [`Participant`] - one patient case with its measurement series and treatments
//! - [`Measurement`] - one time point of nullable vital signs
//! - [`VitalField`] - enumeration of the tracked vitals with accessors
//! - [`DeepPhenotype`] - typed tree of extended variables with path lookup
//! - [`SimulationConfig`] - generation parameters and their validation
//! - vocabularies, [`Outcome`] and [`RiskBand`] shared by every consumer

pub use self::{config::*, participant::*, phenotype::*, vital::*, vocabulary::*};

mod config;
mod participant;
mod phenotype;
mod vital;
mod vocabulary;
