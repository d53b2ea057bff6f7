use std::path::{Path, PathBuf};

use cohortlab_analysis::{metric::CohortMetric, relationship::analyze_relationship};

use crate::{command::CohortInputArg, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CorrelateArg {
    #[clap(flatten)]
    input: CohortInputArg,
    /// First metric, e.g. `age`, `vital:heartRate` or `phenotype:mentalHealth.phq9`
    #[arg(long)]
    x: CohortMetric,
    /// Second metric
    #[arg(long)]
    y: CohortMetric,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CorrelateArg, state_dir: Option<&Path>) -> anyhow::Result<()> {
    let cohort = arg.input.load(state_dir)?;
    let relationship = analyze_relationship(&cohort, arg.x, arg.y);
    eprintln!(
        "{} vs {}: r = {:.3} ({}), n = {}",
        arg.x, arg.y, relationship.correlation, relationship.strength, relationship.n
    );
    eprintln!(
        "  {} = {:.3} * {} + {:.3} (r² = {:.3})",
        arg.y, relationship.slope, arg.x, relationship.intercept, relationship.r_squared
    );
    Output::save_json(&relationship, arg.output.clone())?;
    Ok(())
}
