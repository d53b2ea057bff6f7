use std::path::{Path, PathBuf};

use cohortlab_analysis::{
    metric::CohortMetric,
    summary::{CohortSummary, GroupBy, group_aggregates},
};

use crate::{command::CohortInputArg, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SummarizeArg {
    #[clap(flatten)]
    input: CohortInputArg,
    /// Report per-group aggregates instead of the cohort overview
    /// (condition, unit, gender, outcome)
    #[arg(long)]
    group_by: Option<GroupBy>,
    /// Metric averaged per group
    #[arg(long, default_value_t = CohortMetric::RiskScore)]
    metric: CohortMetric,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SummarizeArg, state_dir: Option<&Path>) -> anyhow::Result<()> {
    let cohort = arg.input.load(state_dir)?;

    if let Some(by) = arg.group_by {
        let groups = group_aggregates(&cohort, by, arg.metric);
        eprintln!("{} groups by {by:?}, mean {}:", groups.len(), arg.metric);
        for group in &groups {
            eprintln!(
                "  {:<24} n={:<5} {:>6.2}%  mean={:.2}",
                group.group, group.count, group.percentage, group.mean
            );
        }
        Output::save_json(&groups, arg.output.clone())?;
        return Ok(());
    }

    let summary = CohortSummary::new(&cohort);
    eprintln!(
        "{} participants, {} measurements, mortality {:.2}%, improvement {:.2}%",
        summary.participant_count,
        summary.measurement_count,
        summary.mortality_rate,
        summary.improvement_rate
    );
    Output::save_json(&summary, arg.output.clone())?;
    Ok(())
}
