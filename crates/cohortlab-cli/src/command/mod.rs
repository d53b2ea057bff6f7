use std::path::{Path, PathBuf};

use anyhow::bail;
use clap::{Parser, Subcommand};
use cohortlab_engine::Participant;

use self::{
    correlate::CorrelateArg, generate::GenerateArg, impute::ImputeArg,
    missingness::MissingnessArg, narrative::NarrativeArg, summarize::SummarizeArg,
    timeseries::TimeseriesArg, validate::ValidateArg,
};
use crate::{state, util};

mod correlate;
mod generate;
mod impute;
mod missingness;
mod narrative;
mod summarize;
mod timeseries;
mod validate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Directory holding the current configuration and cohorts between runs
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Generate a synthetic cohort
    Generate(#[clap(flatten)] GenerateArg),
    /// Validate a cohort JSON file
    Validate(#[clap(flatten)] ValidateArg),
    /// Summarize a cohort, optionally grouped by a category
    Summarize(#[clap(flatten)] SummarizeArg),
    /// Report missing vital values
    Missingness(#[clap(flatten)] MissingnessArg),
    /// Fill missing vital values
    Impute(#[clap(flatten)] ImputeArg),
    /// Correlate two participant metrics
    Correlate(#[clap(flatten)] CorrelateArg),
    /// Daily means of a vital with confidence band
    Timeseries(#[clap(flatten)] TimeseriesArg),
    /// Write case notes for participants
    Narrative(#[clap(flatten)] NarrativeArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let state_dir = args.state_dir.as_deref();
    match args.mode {
        Mode::Generate(arg) => generate::run(&arg, state_dir)?,
        Mode::Validate(arg) => validate::run(&arg, state_dir)?,
        Mode::Summarize(arg) => summarize::run(&arg, state_dir)?,
        Mode::Missingness(arg) => missingness::run(&arg, state_dir)?,
        Mode::Impute(arg) => impute::run(&arg, state_dir)?,
        Mode::Correlate(arg) => correlate::run(&arg, state_dir)?,
        Mode::Timeseries(arg) => timeseries::run(&arg, state_dir)?,
        Mode::Narrative(arg) => narrative::run(&arg, state_dir)?,
    }
    Ok(())
}

/// Where an analysis command reads its cohort from.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct CohortInputArg {
    /// Cohort JSON file [default: the cohort saved in --state-dir]
    #[arg(long)]
    input: Option<PathBuf>,
    /// Read the imputed cohort saved in --state-dir
    #[arg(long, conflicts_with = "input")]
    imputed: bool,
}

impl CohortInputArg {
    pub(crate) fn load(&self, state_dir: Option<&Path>) -> anyhow::Result<Vec<Participant>> {
        if let Some(path) = &self.input {
            let cohort = util::read_cohort_file(path)?;
            eprintln!("Loaded {} participants from {}", cohort.len(), path.display());
            return Ok(cohort);
        }
        let Some(dir) = state_dir else {
            bail!("no cohort given: pass --input or --state-dir");
        };
        let store = state::open_store(dir)?;
        let cohort = if self.imputed {
            match store.imputed() {
                Some(imputed) => imputed.to_vec(),
                None => bail!("no imputed cohort in {}", dir.display()),
            }
        } else {
            store.cohort().to_vec()
        };
        if cohort.is_empty() {
            bail!("no cohort in {}", dir.display());
        }
        eprintln!("Loaded {} participants from {}", cohort.len(), dir.display());
        Ok(cohort)
    }
}

#[cfg(test)]
pub(crate) fn parse_args(args: &[&str]) -> Result<CommandArgs, clap::Error> {
    CommandArgs::try_parse_from(std::iter::once("cohortlab").chain(args.iter().copied()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_state_dir() {
        let args = parse_args(&["summarize", "--state-dir", "state"]).unwrap();
        assert_eq!(args.state_dir.as_deref(), Some(Path::new("state")));
        assert!(matches!(args.mode, Mode::Summarize(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        for args in [
            vec!["correlate", "--x", "age", "--y", "weight"],
            vec!["impute", "--strategy", "knn"],
            vec!["generate", "--seed", "xyz"],
            vec!["timeseries", "--field", "bloodSugar"],
        ] {
            assert!(parse_args(&args).is_err(), "{args:?}");
        }
    }

    #[test]
    fn test_input_without_source_fails() {
        let err = CohortInputArg::default().load(None).unwrap_err();
        assert!(err.to_string().contains("--input or --state-dir"));
    }
}
