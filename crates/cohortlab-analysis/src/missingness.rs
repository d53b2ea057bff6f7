use cohortlab_engine::{Participant, VitalField};
use cohortlab_stats::descriptive::{percentage, round_to};
use serde::Serialize;

/// Missing-value count and share for one vital.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMissingness {
    pub field: VitalField,
    pub missing: usize,
    /// `missing / total_measurements * 100`, two decimals.
    pub percent: f64,
}

/// Missingness of every tracked vital over the flattened measurement list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingnessReport {
    pub total_measurements: usize,
    /// One entry per vital, in [`VitalField::ALL`] order.
    pub fields: Vec<FieldMissingness>,
}

impl MissingnessReport {
    /// Counts missing values across all measurements of all participants.
    ///
    /// An empty cohort reports 0% for every field.
    #[must_use]
    pub fn new(cohort: &[Participant]) -> Self {
        let mut missing = [0usize; VitalField::LEN];
        let mut total_measurements = 0;
        for m in cohort.iter().flat_map(|p| &p.measurements) {
            total_measurements += 1;
            for (count, field) in missing.iter_mut().zip(VitalField::ALL) {
                if field.get(m).is_none() {
                    *count += 1;
                }
            }
        }
        let fields = VitalField::ALL
            .into_iter()
            .zip(missing)
            .map(|(field, missing)| FieldMissingness {
                field,
                missing,
                percent: round_to(percentage(missing, total_measurements), 2),
            })
            .collect();
        Self {
            total_measurements,
            fields,
        }
    }

    #[must_use]
    pub fn get(&self, field: VitalField) -> Option<&FieldMissingness> {
        self.fields.iter().find(|f| f.field == field)
    }

    /// Total number of missing vital values.
    #[must_use]
    pub fn total_missing(&self) -> usize {
        self.fields.iter().map(|f| f.missing).sum()
    }

    /// Share of missing values over every vital slot, two decimals.
    #[must_use]
    pub fn overall_percent(&self) -> f64 {
        round_to(
            percentage(self.total_missing(), self.total_measurements * VitalField::LEN),
            2,
        )
    }
}
