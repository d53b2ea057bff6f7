//! Cohort-level summaries and grouped aggregates.
//!
//! Everything here is a pure function of the cohort slice. Empty groups and
//! empty cohorts produce zero rates instead of NaN.

use cohortlab_engine::{Outcome, Participant, RiskBand, VitalField};
use cohortlab_stats::descriptive::{DescriptiveStats, finite_or_zero, mean, percentage, round_to};
use serde::Serialize;

use crate::metric::CohortMetric;

/// Categorical attribute used to partition a cohort.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, derive_more::FromStr)]
pub enum GroupBy {
    #[default]
    Condition,
    Unit,
    Gender,
    Outcome,
}

impl GroupBy {
    /// Group label of `participant`.
    #[must_use]
    pub fn key(self, participant: &Participant) -> &str {
        match self {
            Self::Condition => &participant.condition,
            Self::Unit => &participant.unit,
            Self::Gender => &participant.gender,
            Self::Outcome => participant.outcome.as_str(),
        }
    }
}

/// Count, share and metric mean of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAggregate {
    pub group: String,
    pub count: usize,
    /// Share of the cohort in percent, two decimals.
    pub percentage: f64,
    /// Mean of the metric over group members where it is defined; `0.0` when none is.
    pub mean: f64,
    /// Number of members contributing to `mean`.
    pub observed: usize,
}

/// Aggregates `metric` per group, groups listed in first-seen order.
#[must_use]
pub fn group_aggregates(
    cohort: &[Participant],
    by: GroupBy,
    metric: CohortMetric,
) -> Vec<GroupAggregate> {
    let mut groups: Vec<(&str, usize, Vec<f64>)> = vec![];
    for participant in cohort {
        let key = by.key(participant);
        let index = match groups.iter().position(|(k, ..)| *k == key) {
            Some(index) => index,
            None => {
                groups.push((key, 0, vec![]));
                groups.len() - 1
            }
        };
        let (_, count, values) = &mut groups[index];
        *count += 1;
        values.extend(metric.value(participant));
    }
    groups
        .into_iter()
        .map(|(group, count, values)| GroupAggregate {
            group: group.to_owned(),
            count,
            percentage: round_to(percentage(count, cohort.len()), 2),
            mean: round_to(mean(&values), 2),
            observed: values.len(),
        })
        .collect()
}

/// Number and share of participants in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
    pub percentage: f64,
}

fn category_counts<'a, I>(total: usize, names: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = (&'a str, usize)>,
{
    names
        .into_iter()
        .map(|(name, count)| CategoryCount {
            name: name.to_owned(),
            count,
            percentage: round_to(percentage(count, total), 2),
        })
        .collect()
}

/// Serializable form of [`DescriptiveStats`], rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub sample_std_dev: f64,
}

impl MetricStats {
    /// Statistics of `metric` over the participants where it is defined.
    #[must_use]
    pub fn of(cohort: &[Participant], metric: CohortMetric) -> Option<Self> {
        DescriptiveStats::new(metric.values(cohort)).map(Self::from)
    }
}

impl From<DescriptiveStats> for MetricStats {
    fn from(stats: DescriptiveStats) -> Self {
        let r = |v: f64| round_to(finite_or_zero(v), 2);
        Self {
            count: stats.count,
            min: r(stats.min),
            max: r(stats.max),
            mean: r(stats.mean),
            median: r(stats.median),
            std_dev: r(stats.std_dev),
            sample_std_dev: r(stats.sample_std_dev),
        }
    }
}

/// Mean of the observed values of one vital across every measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalMean {
    pub field: VitalField,
    pub mean: f64,
    pub observed: usize,
}

/// Dashboard-level overview of a cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CohortSummary {
    pub participant_count: usize,
    pub measurement_count: usize,
    pub age: Option<MetricStats>,
    pub risk_score: Option<MetricStats>,
    pub readmission_risk: Option<MetricStats>,
    pub length_of_stay: Option<MetricStats>,
    /// One entry per outcome, in declaration order.
    pub outcomes: Vec<CategoryCount>,
    /// One entry per risk band, low to high.
    pub risk_bands: Vec<CategoryCount>,
    /// Share of deceased participants in percent.
    pub mortality_rate: f64,
    /// Share of improved participants in percent.
    pub improvement_rate: f64,
    pub vital_means: Vec<VitalMean>,
    pub readmission_by_condition: Vec<GroupAggregate>,
    pub effectiveness_by_condition: Vec<GroupAggregate>,
    pub units: Vec<CategoryCount>,
    pub genders: Vec<CategoryCount>,
}

impl CohortSummary {
    #[must_use]
    pub fn new(cohort: &[Participant]) -> Self {
        let total = cohort.len();
        let count_outcome =
            |outcome: Outcome| cohort.iter().filter(|p| p.outcome == outcome).count();
        let outcomes = category_counts(
            total,
            Outcome::ALL.map(|outcome| (outcome.as_str(), count_outcome(outcome))),
        );
        let risk_bands = category_counts(
            total,
            RiskBand::ALL.map(|band| {
                let count = cohort
                    .iter()
                    .filter(|p| RiskBand::from_score(p.risk_score) == band)
                    .count();
                (band.as_str(), count)
            }),
        );
        let vital_means = VitalField::ALL
            .into_iter()
            .map(|field| {
                let values = cohort
                    .iter()
                    .flat_map(|p| p.observed_values(field))
                    .collect::<Vec<_>>();
                VitalMean {
                    field,
                    mean: round_to(mean(&values), 2),
                    observed: values.len(),
                }
            })
            .collect();
        let group_counts = |by| {
            let groups = group_aggregates(cohort, by, CohortMetric::Age);
            category_counts(total, groups.iter().map(|g| (g.group.as_str(), g.count)))
        };

        let summary = Self {
            participant_count: total,
            measurement_count: cohort.iter().map(|p| p.measurements.len()).sum(),
            age: MetricStats::of(cohort, CohortMetric::Age),
            risk_score: MetricStats::of(cohort, CohortMetric::RiskScore),
            readmission_risk: MetricStats::of(cohort, CohortMetric::ReadmissionRisk),
            length_of_stay: MetricStats::of(cohort, CohortMetric::LengthOfStay),
            mortality_rate: round_to(percentage(count_outcome(Outcome::Deceased), total), 2),
            improvement_rate: round_to(percentage(count_outcome(Outcome::Improved), total), 2),
            outcomes,
            risk_bands,
            vital_means,
            readmission_by_condition: group_aggregates(
                cohort,
                GroupBy::Condition,
                CohortMetric::ReadmissionRisk,
            ),
            effectiveness_by_condition: group_aggregates(
                cohort,
                GroupBy::Condition,
                CohortMetric::TreatmentEffectiveness,
            ),
            units: group_counts(GroupBy::Unit),
            genders: group_counts(GroupBy::Gender),
        };
        log::debug!(
            "summarized {} participants and {} measurements",
            summary.participant_count,
            summary.measurement_count
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};
    use cohortlab_engine::{Measurement, Treatment};

    use super::*;

    fn participant(condition: &str, unit: &str, outcome: Outcome, risk: f64) -> Participant {
        Participant {
            id: format!("{condition}-{risk}"),
            age: 50,
            gender: "Female".to_owned(),
            unit: unit.to_owned(),
            condition: condition.to_owned(),
            outcome,
            risk_score: risk,
            readmission_risk: risk / 2.0,
            ..Participant::default()
        }
    }

    fn cohort() -> Vec<Participant> {
        vec![
            participant("Sepsis", "ICU", Outcome::Deceased, 90.0),
            participant("Asthma", "Pulmonology", Outcome::Improved, 20.0),
            participant("Sepsis", "ICU", Outcome::Stable, 50.0),
            participant("Stroke", "Neurology", Outcome::Improved, 40.0),
        ]
    }

    #[test]
    fn test_group_aggregates_first_seen_order() {
        let groups = group_aggregates(&cohort(), GroupBy::Condition, CohortMetric::RiskScore);
        let names = groups.iter().map(|g| g.group.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["Sepsis", "Asthma", "Stroke"]);
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].percentage, 50.0);
        assert_eq!(groups[0].mean, 70.0);
        assert_eq!(groups[1].percentage, 25.0);
    }

    #[test]
    fn test_group_by_outcome_uses_outcome_names() {
        let groups = group_aggregates(&cohort(), GroupBy::Outcome, CohortMetric::Age);
        let names = groups.iter().map(|g| g.group.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["Deceased", "Improved", "Stable"]);
        assert_eq!(groups[1].count, 2);
    }

    #[test]
    fn test_group_without_observations_has_zero_mean() {
        let groups =
            group_aggregates(&cohort(), GroupBy::Unit, CohortMetric::TreatmentEffectiveness);
        assert!(groups.iter().all(|g| g.mean == 0.0 && g.observed == 0));
    }

    #[test]
    fn test_summary_rates_and_bands() {
        let summary = CohortSummary::new(&cohort());
        assert_eq!(summary.participant_count, 4);
        assert_eq!(summary.mortality_rate, 25.0);
        assert_eq!(summary.improvement_rate, 50.0);
        let bands = summary.risk_bands.iter().map(|b| b.count).collect::<Vec<_>>();
        assert_eq!(bands, [1, 2, 1]);
        assert_eq!(summary.outcomes.len(), Outcome::LEN);
        assert_eq!(summary.risk_score.as_ref().unwrap().mean, 50.0);
        assert_eq!(summary.units[0].name, "ICU");
        assert_eq!(summary.units[0].count, 2);
        assert_eq!(summary.genders.len(), 1);
    }

    #[test]
    fn test_vital_means_and_effectiveness() {
        let date = Utc.with_ymd_and_hms(2023, 2, 1, 8, 0, 0).unwrap();
        let mut p = participant("Sepsis", "ICU", Outcome::Stable, 50.0);
        let mut first = Measurement::empty(date);
        first.temperature = Some(38.0);
        let mut third = first.clone();
        third.temperature = Some(39.0);
        p.measurements = vec![first, Measurement::empty(date), third];
        p.treatments = vec![Treatment {
            name: "Antibiotics".to_owned(),
            start_date: date.date_naive(),
            end_date: None,
            effectiveness: 70.0,
        }];
        let summary = CohortSummary::new(&[p]);
        assert_eq!(summary.measurement_count, 3);
        let temperature = &summary.vital_means[3];
        assert_eq!(temperature.field, VitalField::Temperature);
        assert_eq!(temperature.mean, 38.5);
        assert_eq!(temperature.observed, 2);
        assert_eq!(summary.effectiveness_by_condition[0].mean, 70.0);
    }

    #[test]
    fn test_empty_cohort() {
        let summary = CohortSummary::new(&[]);
        assert_eq!(summary.participant_count, 0);
        assert_eq!(summary.mortality_rate, 0.0);
        assert!(summary.age.is_none());
        assert!(summary.outcomes.iter().all(|o| o.percentage == 0.0));
        assert!(summary.vital_means.iter().all(|v| v.mean == 0.0));
        assert!(summary.readmission_by_condition.is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(CohortSummary::new(&cohort())).unwrap();
        assert_eq!(json["participantCount"], 4);
        assert_eq!(json["vitalMeans"][0]["field"], "bloodPressureSystolic");
        assert_eq!(json["readmissionByCondition"][0]["group"], "Sepsis");
    }
}
