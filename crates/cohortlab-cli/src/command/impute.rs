use std::path::{Path, PathBuf};

use cohortlab_analysis::{
    imputation::{ImputationOptions, ImputationStrategy, impute},
    missingness::MissingnessReport,
};
use cohortlab_engine::VitalField;

use crate::{command::CohortInputArg, state, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ImputeArg {
    #[clap(flatten)]
    input: CohortInputArg,
    /// Imputation strategy (mean, median, mode, zero, lastObservation,
    /// nextObservation, linearInterpolation, randomForest)
    #[arg(long, default_value_t = ImputationStrategy::Mean)]
    strategy: ImputationStrategy,
    /// Vital to impute; repeat for several [default: all vitals]
    #[arg(long = "field")]
    fields: Vec<VitalField>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ImputeArg, state_dir: Option<&Path>) -> anyhow::Result<()> {
    let cohort = arg.input.load(state_dir)?;
    let options = ImputationOptions {
        strategy: arg.strategy,
        apply_to_all: arg.fields.is_empty(),
        fields: arg.fields.clone(),
    };

    let before = MissingnessReport::new(&cohort).total_missing();
    let imputed = impute(&cohort, &options);
    let after = MissingnessReport::new(&imputed).total_missing();
    eprintln!(
        "Imputed {} of {before} missing values with {}",
        before - after,
        options.strategy
    );

    if let Some(dir) = state_dir {
        let mut store = state::open_store(dir)?;
        store.set_imputed(imputed.clone())?;
        log::info!("saved imputed cohort to {}", dir.display());
        if arg.output.is_none() {
            return Ok(());
        }
    }
    Output::save_json(&imputed, arg.output.clone())?;
    Ok(())
}
