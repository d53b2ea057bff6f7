use std::path::{Path, PathBuf};

use anyhow::bail;
use cohortlab_analysis::narrative::clinical_note;

use crate::{command::CohortInputArg, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct NarrativeArg {
    #[clap(flatten)]
    input: CohortInputArg,
    /// Participant id [default: every participant]
    #[arg(long)]
    id: Option<String>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &NarrativeArg, state_dir: Option<&Path>) -> anyhow::Result<()> {
    let cohort = arg.input.load(state_dir)?;
    let selected = cohort
        .iter()
        .filter(|p| arg.id.as_ref().is_none_or(|id| p.id == *id))
        .collect::<Vec<_>>();
    if let Some(id) = arg.id.as_ref().filter(|_| selected.is_empty()) {
        bail!("no participant with id {id}");
    }

    let mut output = Output::from_output_path(arg.output.clone())?;
    for participant in selected {
        output.write_line(&clinical_note(participant))?;
    }
    Ok(())
}
