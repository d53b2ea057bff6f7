use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
    thread,
    time::Instant,
};

use anyhow::Context;
use chrono::NaiveDate;
use cohortlab_engine::{
    CohortGenerator, CohortSeed, DataVariability, MeasurementFrequency, OutcomeDistribution,
    SimulationConfig, TimePattern,
};
use rand::Rng as _;

use crate::{
    state,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GenerateArg {
    /// Simulation config JSON file; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of participants
    #[arg(long)]
    num_participants: Option<usize>,
    /// First day of the simulated window (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<NaiveDate>,
    /// Last day of the simulated window (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<NaiveDate>,
    #[arg(long)]
    min_age: Option<u32>,
    #[arg(long)]
    max_age: Option<u32>,
    /// Attach comorbidities
    #[arg(long)]
    comorbidities: bool,
    /// Attach deep phenotypes
    #[arg(long)]
    deep_phenotyping: bool,
    /// Inject missing vital values
    #[arg(long)]
    missing_data: bool,
    /// Probability of each vital being missing (implies --missing-data)
    #[arg(long)]
    missing_probability: Option<f64>,
    /// Measurement frequency (low, medium, high)
    #[arg(long)]
    frequency: Option<MeasurementFrequency>,
    /// Time pattern (random, realistic)
    #[arg(long)]
    pattern: Option<TimePattern>,
    /// Data variability (low, medium, high)
    #[arg(long)]
    variability: Option<DataVariability>,
    /// Outcome distribution (balanced, positive, negative)
    #[arg(long)]
    outcomes: Option<OutcomeDistribution>,
    /// 32-digit hex seed [default: random]
    #[arg(long)]
    seed: Option<CohortSeed>,
    /// Worker threads [default: available parallelism]
    #[arg(long)]
    threads: Option<NonZeroUsize>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl GenerateArg {
    fn config(&self) -> anyhow::Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file::<SimulationConfig, _>("simulation config", path)?,
            None => SimulationConfig::default(),
        };
        if let Some(n) = self.num_participants {
            config.num_participants = n;
        }
        if let Some(date) = self.start_date {
            config.start_date = date;
        }
        if let Some(date) = self.end_date {
            config.end_date = date;
        }
        if let Some(age) = self.min_age {
            config.min_age = age;
        }
        if let Some(age) = self.max_age {
            config.max_age = age;
        }
        config.include_comorbidities |= self.comorbidities;
        config.include_deep_phenotyping |= self.deep_phenotyping;
        config.include_missing_data |= self.missing_data;
        if let Some(p) = self.missing_probability {
            config.include_missing_data = true;
            config.missing_data_probability = p;
        }
        if let Some(frequency) = self.frequency {
            config.measurement_frequency = frequency;
        }
        if let Some(pattern) = self.pattern {
            config.time_patterns = pattern;
        }
        if let Some(variability) = self.variability {
            config.data_variability = variability;
        }
        if let Some(outcomes) = self.outcomes {
            config.outcome_distribution = outcomes;
        }
        Ok(config)
    }
}

pub(crate) fn run(arg: &GenerateArg, state_dir: Option<&Path>) -> anyhow::Result<()> {
    let config = arg.config()?;
    let generator = CohortGenerator::new(config).context("Invalid simulation config")?;
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let threads = arg
        .threads
        .or_else(|| thread::available_parallelism().ok())
        .unwrap_or(NonZeroUsize::MIN);

    eprintln!(
        "Generating {} participants with seed {seed}...",
        generator.config().num_participants
    );
    let start = Instant::now();
    let cohort = if threads.get() == 1 {
        generator.generate(seed)
    } else {
        generator.generate_parallel(seed, threads)
    };
    eprintln!(
        "Generated {} participants with {} measurements in {:.2?}",
        cohort.len(),
        cohort.iter().map(|p| p.measurements.len()).sum::<usize>(),
        start.elapsed()
    );

    if let Some(dir) = state_dir {
        let mut store = state::open_store(dir)?;
        store.set_config(generator.config().clone())?;
        store.set_cohort(cohort.clone())?;
        log::info!("saved cohort to {}", dir.display());
        if arg.output.is_none() {
            return Ok(());
        }
    }
    Output::save_json(&cohort, arg.output.clone())?;
    Ok(())
}
