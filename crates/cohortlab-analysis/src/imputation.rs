//! Filling of missing vital values.
//!
//! Imputation works per participant and per vital: the series of one vital
//! across a participant's measurements, in chronological order, is the only
//! input for its missing entries. Values observed in other participants are
//! never used.
//!
//! Strategies that need a neighbour ([`LastObservation`], [`NextObservation`],
//! [`LinearInterpolation`]) fall back to the participant's mean of that vital
//! when no suitable neighbour exists. A vital never observed for a participant
//! resolves to `0.0` under the mean, median and mode rules.
//!
//! [`LastObservation`]: ImputationStrategy::LastObservation
//! [`NextObservation`]: ImputationStrategy::NextObservation
//! [`LinearInterpolation`]: ImputationStrategy::LinearInterpolation

use std::fmt;

use cohortlab_engine::{Participant, VitalField};
use cohortlab_stats::descriptive::{mean, median, mode};
use serde::{Deserialize, Serialize};

/// Rule used to replace a missing value.
///
/// Parsing is case-insensitive on the variant name, so the camelCase names
/// used in serialized options (`lastObservation`) are accepted.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "camelCase")]
pub enum ImputationStrategy {
    /// Mean of the observed values.
    #[default]
    Mean,
    /// Median of the observed values.
    Median,
    /// Most frequent observed value, ties resolved to the first seen.
    Mode,
    /// Constant zero.
    Zero,
    /// Nearest earlier observation (LOCF).
    LastObservation,
    /// Nearest later observation (NOCB).
    NextObservation,
    /// Interpolation between the nearest earlier and later observations,
    /// weighted by measurement index distance.
    LinearInterpolation,
    /// Accepted for compatibility; behaves exactly like [`Self::Mean`].
    RandomForest,
}

impl ImputationStrategy {
    pub const ALL: [Self; 8] = [
        Self::Mean,
        Self::Median,
        Self::Mode,
        Self::Zero,
        Self::LastObservation,
        Self::NextObservation,
        Self::LinearInterpolation,
        Self::RandomForest,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
            Self::Zero => "zero",
            Self::LastObservation => "lastObservation",
            Self::NextObservation => "nextObservation",
            Self::LinearInterpolation => "linearInterpolation",
            Self::RandomForest => "randomForest",
        }
    }

    /// Fills every `None` in `series` and returns the completed series.
    ///
    /// Observed values are returned unchanged.
    #[must_use]
    pub fn fill(self, series: &[Option<f64>]) -> Vec<f64> {
        let observed = series.iter().flatten().copied().collect::<Vec<_>>();
        let fallback = mean(&observed);
        let constant = match self {
            Self::Mean | Self::RandomForest => Some(fallback),
            Self::Median => Some(median(&observed)),
            Self::Mode => Some(mode(&observed)),
            Self::Zero => Some(0.0),
            Self::LastObservation | Self::NextObservation | Self::LinearInterpolation => None,
        };
        if let Some(constant) = constant {
            return series.iter().map(|v| v.unwrap_or(constant)).collect();
        }

        (0..series.len())
            .map(|i| {
                if let Some(v) = series[i] {
                    return v;
                }
                let prev = series[..i]
                    .iter()
                    .enumerate()
                    .rev()
                    .find_map(|(j, v)| v.map(|v| (j, v)));
                let next = series[i + 1..]
                    .iter()
                    .enumerate()
                    .find_map(|(k, v)| v.map(|v| (i + 1 + k, v)));
                let filled = match (self, prev, next) {
                    (Self::LastObservation, Some((_, v)), _)
                    | (Self::NextObservation, _, Some((_, v))) => Some(v),
                    (Self::LinearInterpolation, Some((j, vj)), Some((k, vk))) => {
                        #[expect(clippy::cast_precision_loss)]
                        let (offset, span) = ((i - j) as f64, (k - j) as f64);
                        Some(vj + (vk - vj) * offset / span)
                    }
                    _ => None,
                };
                filled.unwrap_or(fallback)
            })
            .collect()
    }
}

impl fmt::Display for ImputationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to impute and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImputationOptions {
    pub strategy: ImputationStrategy,
    /// Impute every vital, ignoring `fields`.
    pub apply_to_all: bool,
    /// Vitals to impute when `apply_to_all` is `false`.
    pub fields: Vec<VitalField>,
}

impl Default for ImputationOptions {
    fn default() -> Self {
        Self {
            strategy: ImputationStrategy::default(),
            apply_to_all: true,
            fields: vec![],
        }
    }
}

impl ImputationOptions {
    #[must_use]
    pub fn targets(&self, field: VitalField) -> bool {
        self.apply_to_all || self.fields.contains(&field)
    }
}

/// Returns a copy of `cohort` with the targeted missing vitals filled.
///
/// The input cohort is left untouched. Measurement dates are never modified.
#[must_use]
pub fn impute(cohort: &[Participant], options: &ImputationOptions) -> Vec<Participant> {
    let mut imputed = cohort.to_vec();
    let mut filled = 0;
    for participant in &mut imputed {
        for field in VitalField::ALL {
            if !options.targets(field) {
                continue;
            }
            let series = participant.vital_series(field).collect::<Vec<_>>();
            if series.iter().all(Option::is_some) {
                continue;
            }
            filled += series.iter().filter(|v| v.is_none()).count();
            let values = options.strategy.fill(&series);
            for (m, v) in participant.measurements.iter_mut().zip(values) {
                field.set(m, Some(v));
            }
        }
    }
    log::info!(
        "imputed {filled} values in {} participants using {}",
        imputed.len(),
        options.strategy
    );
    imputed
}
