use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Parameters controlling cohort simulation.
///
/// Every field has a default, so partial JSON documents deserialize into a
/// complete configuration. Call [`SimulationConfig::validate`] (or construct a
/// [`CohortGenerator`](crate::engine::CohortGenerator)) before generating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfig {
    pub num_participants: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub min_age: u32,
    pub max_age: u32,
    pub include_comorbidities: bool,
    pub include_missing_data: bool,
    /// Per-vital probability of a missing value, used when `include_missing_data` is set.
    pub missing_data_probability: f64,
    pub measurement_frequency: MeasurementFrequency,
    pub time_patterns: TimePattern,
    pub data_variability: DataVariability,
    pub outcome_distribution: OutcomeDistribution,
    pub include_deep_phenotyping: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_participants: 100,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default(),
            min_age: 18,
            max_age: 90,
            include_comorbidities: true,
            include_missing_data: false,
            missing_data_probability: 0.05,
            measurement_frequency: MeasurementFrequency::Medium,
            time_patterns: TimePattern::Realistic,
            data_variability: DataVariability::Medium,
            outcome_distribution: OutcomeDistribution::Balanced,
            include_deep_phenotyping: false,
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigurationError {
    #[display("number of participants must be positive")]
    NoParticipants,
    #[display("end date {end} is before start date {start}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },
    #[display("minimum age {min} is greater than maximum age {max}")]
    InvertedAgeRange { min: u32, max: u32 },
    #[display("maximum age {max} exceeds {limit}")]
    AgeOutOfRange { max: u32, limit: u32 },
    #[display(
        "missing data probability {probability} is outside {}..={}",
        SimulationConfig::MISSING_PROBABILITY_MIN,
        SimulationConfig::MISSING_PROBABILITY_MAX
    )]
    MissingDataProbabilityOutOfRange { probability: f64 },
}

impl SimulationConfig {
    pub const MISSING_PROBABILITY_MIN: f64 = 0.01;
    pub const MISSING_PROBABILITY_MAX: f64 = 0.30;
    pub const MAX_AGE_LIMIT: u32 = 120;

    /// Checks the configuration for values that cannot produce a sensible cohort.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.num_participants == 0 {
            return Err(ConfigurationError::NoParticipants);
        }
        if self.end_date < self.start_date {
            return Err(ConfigurationError::InvertedDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.min_age > self.max_age {
            return Err(ConfigurationError::InvertedAgeRange {
                min: self.min_age,
                max: self.max_age,
            });
        }
        if self.max_age > Self::MAX_AGE_LIMIT {
            return Err(ConfigurationError::AgeOutOfRange {
                max: self.max_age,
                limit: Self::MAX_AGE_LIMIT,
            });
        }
        if self.include_missing_data
            && !(Self::MISSING_PROBABILITY_MIN..=Self::MISSING_PROBABILITY_MAX)
                .contains(&self.missing_data_probability)
        {
            return Err(ConfigurationError::MissingDataProbabilityOutOfRange {
                probability: self.missing_data_probability,
            });
        }
        Ok(())
    }

    /// Number of whole days between the start and end dates.
    #[must_use]
    pub fn window_days(&self) -> u32 {
        let days = (self.end_date - self.start_date).num_days();
        u32::try_from(days.max(0)).unwrap_or(u32::MAX)
    }
}

/// How many measurements each participant receives.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "camelCase")]
pub enum MeasurementFrequency {
    Low,
    #[default]
    Medium,
    High,
}

impl MeasurementFrequency {
    /// Inclusive range of measurement counts for this tier.
    #[must_use]
    pub fn count_range(self) -> (usize, usize) {
        match self {
            Self::Low => (3, 7),
            Self::Medium => (7, 14),
            Self::High => (14, 30),
        }
    }
}

/// How measurement times and vital trajectories are laid out.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "camelCase")]
pub enum TimePattern {
    /// Uniformly jittered times, vitals fluctuate around a baseline.
    Random,
    /// Evenly spaced times, vitals drift toward an outcome-consistent end state.
    #[default]
    Realistic,
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "camelCase")]
pub enum DataVariability {
    Low,
    #[default]
    Medium,
    High,
}

impl DataVariability {
    /// Multiplier applied to the per-step noise of every vital.
    #[must_use]
    pub fn noise_scale(self) -> f64 {
        match self {
            Self::Low => 0.5,
            Self::Medium => 1.0,
            Self::High => 2.0,
        }
    }
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "camelCase")]
pub enum OutcomeDistribution {
    #[default]
    Balanced,
    Positive,
    Negative,
}

impl OutcomeDistribution {
    /// Sampling weights in [`Outcome::ALL`](crate::core::Outcome::ALL) order.
    #[must_use]
    pub fn weights(self) -> [f64; 5] {
        match self {
            Self::Balanced => [0.30, 0.25, 0.20, 0.15, 0.10],
            Self::Positive => [0.50, 0.30, 0.10, 0.07, 0.03],
            Self::Negative => [0.15, 0.20, 0.30, 0.15, 0.20],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_is_valid() {
        SimulationConfig::default().validate().unwrap();
    }

    #[test]
    fn test_zero_participants_rejected() {
        let config = SimulationConfig {
            num_participants: 0,
            ..SimulationConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigurationError::NoParticipants));
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn test_inverted_dates_rejected() {
        let config = SimulationConfig {
            start_date: date(2023, 6, 1),
            end_date: date(2023, 1, 1),
            ..SimulationConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "end date 2023-01-01 is before start date 2023-06-01"
        );
    }

    #[test]
    fn test_single_day_window_is_valid() {
        let config = SimulationConfig {
            start_date: date(2023, 6, 1),
            end_date: date(2023, 6, 1),
            ..SimulationConfig::default()
        };
        config.validate().unwrap();
        assert_eq!(config.window_days(), 0);
    }

    #[test]
    fn test_missing_probability_checked_only_when_enabled() {
        let mut config = SimulationConfig {
            missing_data_probability: 0.9,
            ..SimulationConfig::default()
        };
        config.validate().unwrap();
        config.include_missing_data = true;
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::MissingDataProbabilityOutOfRange { .. })
        ));
    }

    #[test]
    fn test_age_bounds() {
        let config = SimulationConfig {
            min_age: 70,
            max_age: 40,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvertedAgeRange { min: 70, max: 40 })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "numParticipants": 20,
            "measurementFrequency": "low",
            "outcomeDistribution": "negative"
        }"#;
        let config: SimulationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.num_participants, 20);
        assert_eq!(config.measurement_frequency, MeasurementFrequency::Low);
        assert_eq!(config.outcome_distribution, OutcomeDistribution::Negative);
        assert_eq!(config.time_patterns, TimePattern::Realistic);
    }

    #[test]
    fn test_outcome_weights_sum_to_one() {
        for distribution in [
            OutcomeDistribution::Balanced,
            OutcomeDistribution::Positive,
            OutcomeDistribution::Negative,
        ] {
            let total: f64 = distribution.weights().iter().sum();
            assert!((total - 1.0).abs() < 1e-9);
        }
    }
}
