use std::path::{Path, PathBuf};

use crate::{
    state,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ValidateArg {
    /// Cohort JSON file to validate
    #[arg(long)]
    input: PathBuf,
    /// Write the normalized cohort to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ValidateArg, state_dir: Option<&Path>) -> anyhow::Result<()> {
    let cohort = util::read_cohort_file(&arg.input)?;
    let measurements = cohort.iter().map(|p| p.measurements.len()).sum::<usize>();
    eprintln!(
        "{}: {} participants, {measurements} measurements, valid",
        arg.input.display(),
        cohort.len()
    );

    if let Some(dir) = state_dir {
        let mut store = state::open_store(dir)?;
        store.set_cohort(cohort.clone())?;
        log::info!("saved cohort to {}", dir.display());
    }
    if arg.output.is_some() {
        Output::save_json(&cohort, arg.output.clone())?;
    }
    Ok(())
}
