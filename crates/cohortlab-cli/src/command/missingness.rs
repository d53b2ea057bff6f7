use std::path::{Path, PathBuf};

use cohortlab_analysis::missingness::MissingnessReport;

use crate::{command::CohortInputArg, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct MissingnessArg {
    #[clap(flatten)]
    input: CohortInputArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &MissingnessArg, state_dir: Option<&Path>) -> anyhow::Result<()> {
    let cohort = arg.input.load(state_dir)?;
    let report = MissingnessReport::new(&cohort);
    eprintln!(
        "{} of {} vital values missing ({}%)",
        report.total_missing(),
        report.total_measurements * cohortlab_engine::VitalField::LEN,
        report.overall_percent()
    );
    for field in &report.fields {
        eprintln!("  {:<24} {:>6} {:>7.2}%", field.field.label(), field.missing, field.percent);
    }
    Output::save_json(&report, arg.output.clone())?;
    Ok(())
}
