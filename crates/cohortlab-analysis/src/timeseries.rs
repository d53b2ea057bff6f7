use std::collections::BTreeMap;

use chrono::NaiveDate;
use cohortlab_engine::{Participant, VitalField};
use cohortlab_stats::{confidence::ConfidenceInterval, descriptive::round_to};
use serde::Serialize;

/// Cohort-wide mean of a vital on one calendar day, with its confidence band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyVital {
    pub date: NaiveDate,
    /// Number of observed values on that day.
    pub n: usize,
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Per-day mean of `field` across the cohort, days in ascending order.
///
/// Only observed values count; days without any observation are omitted. The
/// band is `mean ± z * s / sqrt(n)` with the sample standard deviation, and
/// collapses onto the mean for a single observation.
#[must_use]
pub fn vital_time_series(cohort: &[Participant], field: VitalField, z: f64) -> Vec<DailyVital> {
    let mut by_day = BTreeMap::<NaiveDate, Vec<f64>>::new();
    for m in cohort.iter().flat_map(|p| &p.measurements) {
        if let Some(value) = field.get(m) {
            by_day.entry(m.date.date_naive()).or_default().push(value);
        }
    }
    by_day
        .into_iter()
        .map(|(date, values)| {
            let ci = ConfidenceInterval::new(&values, z);
            DailyVital {
                date,
                n: ci.n,
                mean: round_to(ci.mean, 2),
                lower: round_to(ci.lower, 2),
                upper: round_to(ci.upper, 2),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};
    use cohortlab_engine::Measurement;
    use cohortlab_stats::confidence::Z_95;

    use super::*;

    fn participant(readings: &[(u32, u32, Option<f64>)]) -> Participant {
        let measurements = readings
            .iter()
            .map(|&(day, hour, hr)| {
                let date = Utc.with_ymd_and_hms(2023, 3, day, hour, 0, 0).unwrap();
                let mut m = Measurement::empty(date);
                m.heart_rate = hr;
                m
            })
            .collect();
        Participant {
            measurements,
            ..Participant::default()
        }
    }

    #[test]
    fn test_groups_by_calendar_day_across_participants() {
        let cohort = [
            participant(&[(2, 8, Some(80.0)), (1, 8, Some(70.0)), (2, 20, None)]),
            participant(&[(1, 14, Some(90.0)), (3, 9, None)]),
        ];
        let series = vital_time_series(&cohort, VitalField::HeartRate, Z_95);
        let dates = series.iter().map(|d| d.date.to_string()).collect::<Vec<_>>();
        assert_eq!(dates, ["2023-03-01", "2023-03-02"]);
        assert_eq!(series[0].n, 2);
        assert_eq!(series[0].mean, 80.0);
        // s = sqrt(200), margin = 1.96 * s / sqrt(2) = 19.6
        assert_eq!(series[0].lower, 60.4);
        assert_eq!(series[0].upper, 99.6);
        assert_eq!(series[1].n, 1);
        assert_eq!(series[1].lower, series[1].upper);
    }

    #[test]
    fn test_empty_cohort() {
        assert!(vital_time_series(&[], VitalField::Pain, Z_95).is_empty());
    }
}
