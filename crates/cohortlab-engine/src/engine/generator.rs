use std::{num::NonZeroUsize, panic, thread};

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use rand::{Rng, seq::IndexedRandom as _};

use crate::core::{
    CONDITIONS, ConfigurationError, GENDERS, Measurement, Outcome, Participant, RiskBand,
    SimulationConfig, TREATMENTS, Treatment, UNITS, VitalField, condition_severity,
};

use super::{CohortSeed, gaussian, phenotype, pick_weighted, vitals::Trajectory, vitals};

const GENDER_WEIGHTS: [f64; 3] = [0.48, 0.48, 0.04];
const MAX_LENGTH_OF_STAY: u32 = 30;
const MAX_COMORBIDITIES: usize = 3;
const MAX_TREATMENTS: usize = 3;
const ONGOING_TREATMENT_PROBABILITY: f64 = 0.3;
const FIRST_MEASUREMENT_HOUR: u32 = 8;
const LAST_MEASUREMENT_HOUR: u32 = 20;

/// Builds synthetic cohorts from a validated [`SimulationConfig`].
///
/// Construction fails fast on an invalid configuration, so a `CohortGenerator`
/// value always produces exactly `num_participants` records.
#[derive(Debug, Clone)]
pub struct CohortGenerator {
    config: SimulationConfig,
}

impl CohortGenerator {
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Generates the full cohort on the calling thread.
    #[must_use]
    pub fn generate(&self, seed: CohortSeed) -> Vec<Participant> {
        let cohort = (0..self.config.num_participants)
            .map(|index| self.generate_participant(seed, index))
            .collect::<Vec<_>>();
        log::debug!("generated {} participants with seed {seed}", cohort.len());
        cohort
    }

    /// Generates the cohort on up to `threads` scoped threads.
    ///
    /// Participants are generated in contiguous index chunks and concatenated in
    /// index order, so the result is identical to [`Self::generate`].
    #[must_use]
    pub fn generate_parallel(&self, seed: CohortSeed, threads: NonZeroUsize) -> Vec<Participant> {
        let total = self.config.num_participants;
        let chunk_size = total.div_ceil(threads.get()).max(1);
        let cohort = thread::scope(|s| {
            let handles = (0..total)
                .step_by(chunk_size)
                .map(|start| {
                    let end = (start + chunk_size).min(total);
                    s.spawn(move || {
                        (start..end)
                            .map(|index| self.generate_participant(seed, index))
                            .collect::<Vec<_>>()
                    })
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap_or_else(|e| panic::resume_unwind(e)))
                .collect::<Vec<_>>()
        });
        log::debug!(
            "generated {} participants on {} threads with seed {seed}",
            cohort.len(),
            threads
        );
        cohort
    }

    /// Generates the participant at `index`.
    ///
    /// The result depends only on the configuration, the seed and the index.
    #[must_use]
    pub fn generate_participant(&self, seed: CohortSeed, index: usize) -> Participant {
        let config = &self.config;
        let rng = &mut seed.participant_rng(index);

        let age = rng.random_range(config.min_age..=config.max_age);
        let gender = GENDERS[pick_weighted(rng, &GENDER_WEIGHTS)];
        let unit = UNITS[rng.random_range(0..UNITS.len())];
        let condition = CONDITIONS[rng.random_range(0..CONDITIONS.len())];
        let severity = condition_severity(condition);
        let outcome = Outcome::ALL[pick_weighted(rng, &config.outcome_distribution.weights())];
        let risk_score = risk_score(rng, outcome, severity, age);
        let readmission_risk = readmission_risk(rng, outcome, risk_score);
        let length_of_stay =
            length_of_stay(rng, outcome, severity, risk_score).min(config.window_days());

        // "current" date of the stay, admission is back-computed from it
        let current_offset = rng.random_range(length_of_stay..=config.window_days());
        let current_date = config.start_date + TimeDelta::days(i64::from(current_offset));
        let admission_date = current_date - TimeDelta::days(i64::from(length_of_stay));

        let mut measurements = self.measurements(rng, admission_date, current_date, length_of_stay);
        Trajectory {
            condition,
            outcome,
            risk_score,
            pattern: config.time_patterns,
            variability: config.data_variability,
        }
        .fill(rng, &mut measurements);
        if config.include_missing_data {
            inject_missing(rng, &mut measurements, config.missing_data_probability);
        }

        let treatments = treatments(rng, outcome, admission_date, current_date);
        let comorbidities = config
            .include_comorbidities
            .then(|| comorbidities(rng, condition));
        let deep_phenotype = config
            .include_deep_phenotyping
            .then(|| phenotype::generate(rng, risk_score, outcome, age));

        Participant {
            id: format!("P{:05}", index + 1),
            age,
            gender: gender.to_owned(),
            unit: unit.to_owned(),
            condition: condition.to_owned(),
            outcome,
            risk_score,
            readmission_risk,
            length_of_stay,
            admission_date: Some(admission_date),
            measurements,
            treatments,
            comorbidities,
            deep_phenotype,
        }
    }

    fn measurements<R>(
        &self,
        rng: &mut R,
        admission_date: NaiveDate,
        current_date: NaiveDate,
        length_of_stay: u32,
    ) -> Vec<Measurement>
    where
        R: Rng + ?Sized,
    {
        let (min_count, max_count) = self.config.measurement_frequency.count_range();
        // longer stays unlock the upper part of the tier
        let stay_factor = (f64::from(length_of_stay) + 1.0) / 10.0;
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_precision_loss,
            clippy::cast_sign_loss
        )]
        let upper =
            min_count + (((max_count - min_count) as f64) * stay_factor.min(1.0)).ceil() as usize;
        let count = rng.random_range(min_count..=upper.min(max_count));

        let start = admission_date
            .and_time(hour(FIRST_MEASUREMENT_HOUR))
            .and_utc();
        let end = current_date.and_time(hour(LAST_MEASUREMENT_HOUR)).and_utc();
        vitals::measurement_times(rng, self.config.time_patterns, count, start, end)
            .into_iter()
            .map(Measurement::empty)
            .collect()
    }
}

fn hour(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap_or_default()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn risk_score<R>(rng: &mut R, outcome: Outcome, severity: f64, age: u32) -> f64
where
    R: Rng + ?Sized,
{
    let base = match outcome {
        Outcome::Improved => 25.0,
        Outcome::Stable => 40.0,
        Outcome::Transferred => 55.0,
        Outcome::Deteriorated => 65.0,
        Outcome::Deceased => 80.0,
    };
    let score =
        base + (severity - 0.5) * 20.0 + (f64::from(age) - 50.0) * 0.15 + gaussian(rng, 10.0);
    round1(score.clamp(0.0, 100.0))
}

fn readmission_risk<R>(rng: &mut R, outcome: Outcome, risk_score: f64) -> f64
where
    R: Rng + ?Sized,
{
    let adjustment = match outcome {
        Outcome::Improved => -5.0,
        Outcome::Stable | Outcome::Deceased => 0.0,
        Outcome::Transferred => 10.0,
        Outcome::Deteriorated => 15.0,
    };
    let band_adjustment = match RiskBand::from_score(risk_score) {
        RiskBand::Low => 0.0,
        RiskBand::Moderate => 5.0,
        RiskBand::High => 10.0,
    };
    let risk = 10.0 + 0.6 * risk_score + adjustment + band_adjustment + gaussian(rng, 8.0);
    round1(risk.clamp(0.0, 100.0))
}

fn length_of_stay<R>(rng: &mut R, outcome: Outcome, severity: f64, risk_score: f64) -> u32
where
    R: Rng + ?Sized,
{
    let adjustment = match outcome {
        Outcome::Improved => 0.0,
        Outcome::Stable => 1.0,
        Outcome::Transferred => 2.0,
        Outcome::Deceased => 3.0,
        Outcome::Deteriorated => 4.0,
    };
    let days = 2.0 + severity * 6.0 + adjustment + risk_score / 25.0 + gaussian(rng, 2.0);
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let days = days.round().clamp(0.0, f64::from(MAX_LENGTH_OF_STAY)) as u32;
    days
}

fn inject_missing<R>(rng: &mut R, measurements: &mut [Measurement], probability: f64)
where
    R: Rng + ?Sized,
{
    for m in measurements {
        for field in VitalField::ALL {
            if rng.random_bool(probability) {
                field.set(m, None);
            }
        }
    }
}

fn treatments<R>(
    rng: &mut R,
    outcome: Outcome,
    admission_date: NaiveDate,
    current_date: NaiveDate,
) -> Vec<Treatment>
where
    R: Rng + ?Sized,
{
    let base_effectiveness = match outcome {
        Outcome::Improved => 75.0,
        Outcome::Stable => 60.0,
        Outcome::Transferred => 45.0,
        Outcome::Deteriorated => 35.0,
        Outcome::Deceased => 20.0,
    };
    let count = rng.random_range(1..=MAX_TREATMENTS);
    let names = TREATMENTS
        .choose_multiple(rng, count)
        .copied()
        .collect::<Vec<_>>();
    names
        .into_iter()
        .map(|name| {
            let stay_days = (current_date - admission_date).num_days();
            let start_date = admission_date + TimeDelta::days(rng.random_range(0..=stay_days));
            let end_date = if rng.random_bool(ONGOING_TREATMENT_PROBABILITY) {
                None
            } else {
                let remaining = (current_date - start_date).num_days();
                Some(start_date + TimeDelta::days(rng.random_range(0..=remaining)))
            };
            let effectiveness =
                round1((base_effectiveness + gaussian(rng, 10.0)).clamp(0.0, 100.0));
            Treatment {
                name: name.to_owned(),
                start_date,
                end_date,
                effectiveness,
            }
        })
        .collect()
}

fn comorbidities<R>(rng: &mut R, primary: &str) -> Vec<String>
where
    R: Rng + ?Sized,
{
    let candidates = CONDITIONS
        .iter()
        .copied()
        .filter(|c| *c != primary)
        .collect::<Vec<_>>();
    let count = rng.random_range(0..=MAX_COMORBIDITIES);
    candidates
        .choose_multiple(rng, count)
        .map(|c| (*c).to_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::NaiveTime;

    use crate::core::{MeasurementFrequency, OutcomeDistribution, TimePattern};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn generate(config: SimulationConfig) -> Vec<Participant> {
        CohortGenerator::new(config)
            .unwrap()
            .generate(CohortSeed::from_u128(0x5eed))
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let err = CohortGenerator::new(SimulationConfig {
            num_participants: 0,
            ..SimulationConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::NoParticipants));

        let err = CohortGenerator::new(SimulationConfig {
            start_date: date(2023, 6, 1),
            end_date: date(2023, 1, 1),
            ..SimulationConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvertedDateRange { .. }));
    }

    #[test]
    fn test_cardinality_and_unique_ids() {
        for n in [1, 7, 64] {
            let cohort = generate(SimulationConfig {
                num_participants: n,
                ..SimulationConfig::default()
            });
            assert_eq!(cohort.len(), n);
            let ids = cohort.iter().map(|p| p.id.as_str()).collect::<HashSet<_>>();
            assert_eq!(ids.len(), n);
        }
    }

    #[test]
    fn test_ranges() {
        let config = SimulationConfig {
            num_participants: 300,
            min_age: 30,
            max_age: 65,
            include_deep_phenotyping: true,
            ..SimulationConfig::default()
        };
        for p in generate(config) {
            assert!((0.0..=100.0).contains(&p.risk_score), "{}", p.risk_score);
            assert!((0.0..=100.0).contains(&p.readmission_risk));
            assert!(p.length_of_stay <= MAX_LENGTH_OF_STAY);
            assert!((30..=65).contains(&p.age));
            assert!(p.deep_phenotype.is_some());
        }
    }

    #[test]
    fn test_end_to_end_low_frequency_without_missing_data() {
        let config = SimulationConfig {
            num_participants: 20,
            start_date: date(2023, 1, 1),
            end_date: date(2023, 6, 1),
            include_missing_data: false,
            measurement_frequency: MeasurementFrequency::Low,
            ..SimulationConfig::default()
        };
        let lower = date(2023, 1, 1).and_time(NaiveTime::MIN).and_utc();
        let upper = date(2023, 6, 2).and_time(NaiveTime::MIN).and_utc();
        let cohort = generate(config);
        assert_eq!(cohort.len(), 20);
        for p in &cohort {
            assert!((3..=7).contains(&p.measurements.len()), "{}", p.measurements.len());
            assert!(p.measurements.is_sorted_by_key(|m| m.date));
            for m in &p.measurements {
                assert!(m.date >= lower && m.date < upper, "{}", m.date);
            }
            assert_eq!(p.missing_value_count(), 0);
            let admission = p.admission_date.unwrap();
            assert!(admission >= date(2023, 1, 1));
            assert_eq!(
                p.measurements.first().unwrap().date.date_naive(),
                admission,
            );
        }
    }

    #[test]
    fn test_frequency_tiers() {
        for (frequency, min, max) in [
            (MeasurementFrequency::Low, 3, 7),
            (MeasurementFrequency::Medium, 7, 14),
            (MeasurementFrequency::High, 14, 30),
        ] {
            for pattern in [TimePattern::Random, TimePattern::Realistic] {
                let cohort = generate(SimulationConfig {
                    num_participants: 40,
                    measurement_frequency: frequency,
                    time_patterns: pattern,
                    ..SimulationConfig::default()
                });
                for p in cohort {
                    assert!((min..=max).contains(&p.measurements.len()));
                }
            }
        }
    }

    #[test]
    #[expect(clippy::cast_precision_loss)]
    fn test_missing_rate_converges_to_probability() {
        let cohort = generate(SimulationConfig {
            num_participants: 400,
            include_missing_data: true,
            missing_data_probability: 0.2,
            ..SimulationConfig::default()
        });
        let total = cohort
            .iter()
            .map(|p| p.measurements.len() * VitalField::LEN)
            .sum::<usize>();
        let missing = cohort.iter().map(Participant::missing_value_count).sum::<usize>();
        let rate = missing as f64 / total as f64;
        assert!((rate - 0.2).abs() < 0.02, "rate={rate}");
    }

    #[test]
    fn test_outcome_distribution_bias() {
        let count_favorable = |distribution| {
            generate(SimulationConfig {
                num_participants: 500,
                outcome_distribution: distribution,
                ..SimulationConfig::default()
            })
            .iter()
            .filter(|p| p.outcome.is_favorable())
            .count()
        };
        let positive = count_favorable(OutcomeDistribution::Positive);
        let balanced = count_favorable(OutcomeDistribution::Balanced);
        let negative = count_favorable(OutcomeDistribution::Negative);
        assert!(positive > balanced && balanced > negative);
    }

    #[test]
    fn test_risk_tracks_outcome() {
        let cohort = generate(SimulationConfig {
            num_participants: 500,
            ..SimulationConfig::default()
        });
        let mean_risk = |outcome| {
            let scores = cohort
                .iter()
                .filter(|p| p.outcome == outcome)
                .map(|p| p.risk_score)
                .collect::<Vec<_>>();
            #[expect(clippy::cast_precision_loss)]
            let n = scores.len() as f64;
            scores.iter().sum::<f64>() / n
        };
        assert!(mean_risk(Outcome::Improved) < mean_risk(Outcome::Deteriorated));
        assert!(mean_risk(Outcome::Stable) < mean_risk(Outcome::Deceased));
    }

    #[test]
    fn test_comorbidities_exclude_primary_condition() {
        let cohort = generate(SimulationConfig {
            num_participants: 200,
            include_comorbidities: true,
            ..SimulationConfig::default()
        });
        for p in &cohort {
            let comorbidities = p.comorbidities.as_ref().unwrap();
            assert!(comorbidities.len() <= MAX_COMORBIDITIES);
            assert!(!comorbidities.contains(&p.condition));
        }

        let without = generate(SimulationConfig {
            num_participants: 5,
            include_comorbidities: false,
            ..SimulationConfig::default()
        });
        assert!(without.iter().all(|p| p.comorbidities.is_none()));
    }

    #[test]
    fn test_treatments_fall_within_stay() {
        for p in generate(SimulationConfig::default()) {
            let admission = p.admission_date.unwrap();
            let current = admission + TimeDelta::days(i64::from(p.length_of_stay));
            assert!((1..=MAX_TREATMENTS).contains(&p.treatments.len()));
            for t in &p.treatments {
                assert!(t.start_date >= admission && t.start_date <= current);
                if let Some(end) = t.end_date {
                    assert!(end >= t.start_date && end <= current);
                }
                assert!((0.0..=100.0).contains(&t.effectiveness));
            }
        }
    }

    #[test]
    fn test_same_seed_same_cohort() {
        let config = SimulationConfig {
            num_participants: 25,
            include_missing_data: true,
            include_deep_phenotyping: true,
            time_patterns: TimePattern::Random,
            ..SimulationConfig::default()
        };
        assert_eq!(generate(config.clone()), generate(config));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let generator = CohortGenerator::new(SimulationConfig {
            num_participants: 37,
            include_missing_data: true,
            include_deep_phenotyping: true,
            ..SimulationConfig::default()
        })
        .unwrap();
        let seed = CohortSeed::from_u128(99);
        let sequential = generator.generate(seed);
        for threads in [1, 2, 4, 64] {
            let parallel = generator.generate_parallel(seed, NonZeroUsize::new(threads).unwrap());
            assert_eq!(parallel, sequential, "threads={threads}");
        }
    }
}
