use std::path::{Path, PathBuf};

use cohortlab_analysis::timeseries::vital_time_series;
use cohortlab_engine::VitalField;
use cohortlab_stats::confidence::Z_95;

use crate::{command::CohortInputArg, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TimeseriesArg {
    #[clap(flatten)]
    input: CohortInputArg,
    /// Vital to chart
    #[arg(long, default_value_t = VitalField::HeartRate)]
    field: VitalField,
    /// z-score of the confidence band
    #[arg(long, default_value_t = Z_95)]
    z: f64,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TimeseriesArg, state_dir: Option<&Path>) -> anyhow::Result<()> {
    let cohort = arg.input.load(state_dir)?;
    let series = vital_time_series(&cohort, arg.field, arg.z);
    match (series.first(), series.last()) {
        (Some(first), Some(last)) => eprintln!(
            "{}: {} days from {} to {}",
            arg.field.label(),
            series.len(),
            first.date,
            last.date
        ),
        _ => eprintln!("{}: no observations", arg.field.label()),
    }
    Output::save_json(&series, arg.output.clone())?;
    Ok(())
}
