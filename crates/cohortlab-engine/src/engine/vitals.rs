//! Vital-sign trajectories for simulated participants.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::core::{DataVariability, Measurement, Outcome, TimePattern, VitalField};

use super::gaussian;

/// Physiological description of a vital used to synthesize its values.
#[derive(Debug, Clone, Copy)]
struct VitalProfile {
    /// Typical value for a healthy adult.
    normal: f64,
    /// Standard deviation of step-to-step noise at medium variability.
    noise_sd: f64,
    /// How far a severe course moves the value away from normal.
    deviation: f64,
    /// `1.0` when higher values are worse, `-1.0` otherwise.
    worse_direction: f64,
    min: f64,
    max: f64,
    decimals: i32,
}

fn profile(field: VitalField) -> VitalProfile {
    match field {
        VitalField::BloodPressureSystolic => VitalProfile {
            normal: 120.0,
            noise_sd: 5.0,
            deviation: 25.0,
            worse_direction: 1.0,
            min: 70.0,
            max: 220.0,
            decimals: 0,
        },
        VitalField::BloodPressureDiastolic => VitalProfile {
            normal: 80.0,
            noise_sd: 3.0,
            deviation: 12.0,
            worse_direction: 1.0,
            min: 40.0,
            max: 130.0,
            decimals: 0,
        },
        VitalField::HeartRate => VitalProfile {
            normal: 75.0,
            noise_sd: 4.0,
            deviation: 20.0,
            worse_direction: 1.0,
            min: 35.0,
            max: 180.0,
            decimals: 0,
        },
        VitalField::Temperature => VitalProfile {
            normal: 36.8,
            noise_sd: 0.2,
            deviation: 1.2,
            worse_direction: 1.0,
            min: 34.0,
            max: 42.0,
            decimals: 1,
        },
        VitalField::OxygenSaturation => VitalProfile {
            normal: 97.0,
            noise_sd: 1.0,
            deviation: 6.0,
            worse_direction: -1.0,
            min: 70.0,
            max: 100.0,
            decimals: 0,
        },
        VitalField::Pain => VitalProfile {
            normal: 2.0,
            noise_sd: 0.8,
            deviation: 5.0,
            worse_direction: 1.0,
            min: 0.0,
            max: 10.0,
            decimals: 0,
        },
    }
}

/// Offset of the admission baseline caused by the primary condition.
fn condition_offset(condition: &str, field: VitalField) -> f64 {
    use VitalField::{
        BloodPressureDiastolic as Dia, BloodPressureSystolic as Sys, HeartRate as Hr,
        OxygenSaturation as Spo2, Pain, Temperature as Temp,
    };
    match (condition, field) {
        ("Hypertension", Sys) => 25.0,
        ("Hypertension", Dia) => 12.0,
        ("Heart Failure", Hr) => 15.0,
        ("Heart Failure", Spo2) => -3.0,
        ("Pneumonia", Temp) => 1.0,
        ("Pneumonia", Spo2) => -4.0,
        ("Pneumonia", Hr) => 10.0,
        ("COPD", Spo2) => -5.0,
        ("Sepsis", Temp) => 1.5,
        ("Sepsis", Hr) => 25.0,
        ("Sepsis", Sys) => -15.0,
        ("Stroke", Sys) => 20.0,
        ("Asthma", Spo2) => -3.0,
        ("Cancer", Pain) => 3.0,
        ("Chronic Kidney Disease", Sys) => 10.0,
        ("Diabetes", Sys) => 5.0,
        _ => 0.0,
    }
}

/// Fraction of the severe deviation reached at the end of the stay.
fn outcome_drift(outcome: Outcome) -> f64 {
    match outcome {
        Outcome::Improved => -1.0,
        Outcome::Stable => 0.0,
        Outcome::Transferred => 0.3,
        Outcome::Deteriorated => 0.6,
        Outcome::Deceased => 1.0,
    }
}

/// Inputs shaping one participant's measurement series.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Trajectory<'a> {
    pub condition: &'a str,
    pub outcome: Outcome,
    pub risk_score: f64,
    pub pattern: TimePattern,
    pub variability: DataVariability,
}

impl Trajectory<'_> {
    fn baseline(&self, field: VitalField) -> f64 {
        let p = profile(field);
        let risk_shift = (self.risk_score / 100.0 - 0.3) * 0.5;
        p.normal
            + condition_offset(self.condition, field)
            + p.worse_direction * p.deviation * risk_shift
    }

    fn end_state(&self, field: VitalField, baseline: f64) -> f64 {
        let p = profile(field);
        let drift = outcome_drift(self.outcome);
        if drift < 0.0 {
            // recovery pulls most of the way back to normal
            p.normal + (baseline - p.normal) * 0.2
        } else {
            baseline + p.worse_direction * p.deviation * drift
        }
    }

    /// Fills every vital of `measurements` in place.
    pub fn fill<R>(&self, rng: &mut R, measurements: &mut [Measurement])
    where
        R: Rng + ?Sized,
    {
        let scale = self.variability.noise_scale();
        let last = measurements.len().saturating_sub(1).max(1);
        for field in VitalField::ALL {
            let p = profile(field);
            let baseline = self.baseline(field);
            let target = self.end_state(field, baseline);
            for (i, m) in measurements.iter_mut().enumerate() {
                let raw = match self.pattern {
                    TimePattern::Realistic => {
                        #[expect(clippy::cast_precision_loss)]
                        let progress = i as f64 / last as f64;
                        let noise = gaussian(rng, p.noise_sd * scale);
                        baseline + (target - baseline) * progress + noise
                    }
                    TimePattern::Random => {
                        baseline + rng.random_range(-1.0..=1.0) * 2.0 * p.noise_sd * scale
                    }
                };
                field.set(m, Some(round(raw.clamp(p.min, p.max), p.decimals)));
            }
        }
        for m in measurements {
            // keep pulse pressure physiological
            if let (Some(sys), Some(dia)) = (m.blood_pressure_systolic, m.blood_pressure_diastolic)
                && dia > sys - 10.0
            {
                m.blood_pressure_diastolic = Some(sys - 10.0);
            }
        }
    }
}

fn round(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Measurement times between `start` and `end` (inclusive), in chronological order.
pub(crate) fn measurement_times<R>(
    rng: &mut R,
    pattern: TimePattern,
    count: usize,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<DateTime<Utc>>
where
    R: Rng + ?Sized,
{
    let span = (end - start).num_seconds().max(0);
    let mut offsets = match pattern {
        TimePattern::Realistic => {
            let steps = i64::try_from(count.saturating_sub(1).max(1)).unwrap_or(i64::MAX);
            (0..count)
                .map(|i| span * i64::try_from(i).unwrap_or(i64::MAX) / steps)
                .collect::<Vec<_>>()
        }
        TimePattern::Random => (0..count)
            .map(|_| rng.random_range(0..=span))
            .collect::<Vec<_>>(),
    };
    offsets.sort_unstable();
    offsets
        .into_iter()
        .map(|secs| start + chrono::TimeDelta::seconds(secs))
        .collect()
}
