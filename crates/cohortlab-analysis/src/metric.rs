use std::{fmt, str::FromStr};

use cohortlab_engine::{DeepPhenotype, Participant, VitalField};
use cohortlab_stats::descriptive::mean;
use serde::{Serialize, Serializer};

/// A per-participant numeric quantity that can be summarized or correlated.
///
/// Metrics parse from their display names:
///
/// | name | value |
/// |---|---|
/// | `age`, `riskScore`, `readmissionRisk`, `lengthOfStay` | the participant field |
/// | `measurementCount` | number of measurements |
/// | `treatmentEffectiveness` | mean effectiveness of all treatments |
/// | `vital:<field>` | mean of the observed values of a vital |
/// | `phenotype:<path>` | a deep-phenotype variable such as `mentalHealth.phq9` |
///
/// # Example
///
/// ```
/// use cohortlab_analysis::metric::CohortMetric;
/// use cohortlab_engine::VitalField;
///
/// let metric: CohortMetric = "vital:heartRate".parse().unwrap();
/// assert_eq!(metric, CohortMetric::Vital(VitalField::HeartRate));
/// assert_eq!(metric.to_string(), "vital:heartRate");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CohortMetric {
    Age,
    RiskScore,
    ReadmissionRisk,
    LengthOfStay,
    MeasurementCount,
    TreatmentEffectiveness,
    Vital(VitalField),
    Phenotype(&'static str),
}

impl CohortMetric {
    const VITAL_PREFIX: &'static str = "vital:";
    const PHENOTYPE_PREFIX: &'static str = "phenotype:";

    /// Value of the metric for `participant`, or `None` when it is undefined
    /// (no observed vital values, no treatments, no phenotype).
    #[must_use]
    pub fn value(self, participant: &Participant) -> Option<f64> {
        match self {
            Self::Age => Some(f64::from(participant.age)),
            Self::RiskScore => Some(participant.risk_score),
            Self::ReadmissionRisk => Some(participant.readmission_risk),
            Self::LengthOfStay => Some(f64::from(participant.length_of_stay)),
            #[expect(clippy::cast_precision_loss)]
            Self::MeasurementCount => Some(participant.measurements.len() as f64),
            Self::TreatmentEffectiveness => participant.mean_treatment_effectiveness(),
            Self::Vital(field) => {
                let values = participant.observed_values(field);
                (!values.is_empty()).then(|| mean(&values))
            }
            Self::Phenotype(path) => participant
                .deep_phenotype
                .as_ref()
                .and_then(|p| p.resolve(path)),
        }
    }

    /// Values of the metric across the cohort, skipping participants where it is undefined.
    #[must_use]
    pub fn values(self, cohort: &[Participant]) -> Vec<f64> {
        cohort.iter().filter_map(|p| self.value(p)).collect()
    }
}

impl fmt::Display for CohortMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Age => "age",
            Self::RiskScore => "riskScore",
            Self::ReadmissionRisk => "readmissionRisk",
            Self::LengthOfStay => "lengthOfStay",
            Self::MeasurementCount => "measurementCount",
            Self::TreatmentEffectiveness => "treatmentEffectiveness",
            Self::Vital(field) => return write!(f, "{}{field}", Self::VITAL_PREFIX),
            Self::Phenotype(path) => return write!(f, "{}{path}", Self::PHENOTYPE_PREFIX),
        };
        f.write_str(name)
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("unknown metric: {name}")]
pub struct ParseMetricError {
    #[error(not(source))]
    name: String,
}

impl FromStr for CohortMetric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ParseMetricError { name: s.to_owned() };
        if let Some(field) = s.strip_prefix(Self::VITAL_PREFIX) {
            return field.parse().map(Self::Vital).map_err(|_| unknown());
        }
        if let Some(path) = s.strip_prefix(Self::PHENOTYPE_PREFIX) {
            return DeepPhenotype::variable(path)
                .map(|v| Self::Phenotype(v.path))
                .ok_or_else(unknown);
        }
        let metric = match s.to_ascii_lowercase().as_str() {
            "age" => Self::Age,
            "riskscore" => Self::RiskScore,
            "readmissionrisk" => Self::ReadmissionRisk,
            "lengthofstay" => Self::LengthOfStay,
            "measurementcount" => Self::MeasurementCount,
            "treatmenteffectiveness" => Self::TreatmentEffectiveness,
            _ => return Err(unknown()),
        };
        Ok(metric)
    }
}

impl Serialize for CohortMetric {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};
    use cohortlab_engine::Measurement;

    use super::*;

    #[test]
    fn test_parse_and_display() {
        for name in [
            "age",
            "riskScore",
            "readmissionRisk",
            "lengthOfStay",
            "measurementCount",
            "treatmentEffectiveness",
            "vital:oxygenSaturation",
            "phenotype:mentalHealth.phq9",
        ] {
            let metric: CohortMetric = name.parse().unwrap();
            assert_eq!(metric.to_string(), name);
        }
        assert_eq!("RISKSCORE".parse::<CohortMetric>().unwrap(), CohortMetric::RiskScore);
    }

    #[test]
    fn test_unknown_metrics_rejected() {
        for name in ["", "weight", "vital:weight", "phenotype:mentalHealth", "phenotype:"] {
            let err = name.parse::<CohortMetric>().unwrap_err();
            assert!(err.to_string().starts_with("unknown metric"), "{name}");
        }
    }

    #[test]
    fn test_values() {
        let date = Utc.with_ymd_and_hms(2023, 1, 1, 8, 0, 0).unwrap();
        let mut first = Measurement::empty(date);
        first.heart_rate = Some(80.0);
        let mut second = Measurement::empty(date);
        second.heart_rate = Some(100.0);
        let participant = Participant {
            age: 40,
            length_of_stay: 3,
            measurements: vec![first, second],
            ..Participant::default()
        };
        assert_eq!(CohortMetric::Age.value(&participant), Some(40.0));
        assert_eq!(CohortMetric::LengthOfStay.value(&participant), Some(3.0));
        assert_eq!(CohortMetric::MeasurementCount.value(&participant), Some(2.0));
        assert_eq!(CohortMetric::Vital(VitalField::HeartRate).value(&participant), Some(90.0));
        assert_eq!(CohortMetric::Vital(VitalField::Pain).value(&participant), None);
        assert_eq!(CohortMetric::TreatmentEffectiveness.value(&participant), None);
        let phq9 = "phenotype:mentalHealth.phq9".parse::<CohortMetric>().unwrap();
        assert_eq!(phq9.value(&participant), None);
    }
}
