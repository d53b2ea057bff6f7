use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{phenotype::DeepPhenotype, vital::VitalField, vocabulary::Outcome};

/// One simulated or imported patient case.
///
/// Fields other than `id`, `age` and `measurements` fall back to defaults when
/// absent from imported data.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub age: u32,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub outcome: Outcome,
    #[serde(default)]
    pub risk_score: f64,
    #[serde(default)]
    pub readmission_risk: f64,
    #[serde(default)]
    pub length_of_stay: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admission_date: Option<NaiveDate>,
    /// Chronological measurement series.
    pub measurements: Vec<Measurement>,
    #[serde(default)]
    pub treatments: Vec<Treatment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comorbidities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_phenotype: Option<DeepPhenotype>,
}

impl Participant {
    /// Values of `field` across the measurement series, in chronological order.
    pub fn vital_series(&self, field: VitalField) -> impl Iterator<Item = Option<f64>> + '_ {
        self.measurements.iter().map(move |m| field.get(m))
    }

    /// Non-missing values of `field`, in chronological order.
    #[must_use]
    pub fn observed_values(&self, field: VitalField) -> Vec<f64> {
        self.vital_series(field).flatten().collect()
    }

    /// Number of missing vital values across all measurements.
    #[must_use]
    pub fn missing_value_count(&self) -> usize {
        self.measurements
            .iter()
            .map(|m| VitalField::ALL.iter().filter(|f| f.get(m).is_none()).count())
            .sum()
    }

    /// Mean treatment effectiveness, `None` without treatments.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean_treatment_effectiveness(&self) -> Option<f64> {
        if self.treatments.is_empty() {
            return None;
        }
        let total = self.treatments.iter().map(|t| t.effectiveness).sum::<f64>();
        Some(total / self.treatments.len() as f64)
    }
}

/// One time point of vital signs. A `None` vital is an explicit missing value
/// and serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub date: DateTime<Utc>,
    pub blood_pressure_systolic: Option<f64>,
    pub blood_pressure_diastolic: Option<f64>,
    pub heart_rate: Option<f64>,
    pub temperature: Option<f64>,
    pub oxygen_saturation: Option<f64>,
    pub pain: Option<f64>,
}

impl Measurement {
    /// A measurement at `date` with every vital missing.
    #[must_use]
    pub fn empty(date: DateTime<Utc>) -> Self {
        Self {
            date,
            blood_pressure_systolic: None,
            blood_pressure_diastolic: None,
            heart_rate: None,
            temperature: None,
            oxygen_saturation: None,
            pain: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    pub name: String,
    pub start_date: NaiveDate,
    /// `None` while the treatment is ongoing.
    pub end_date: Option<NaiveDate>,
    pub effectiveness: f64,
}

impl Treatment {
    #[must_use]
    pub fn is_ongoing(&self) -> bool {
        self.end_date.is_none()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};

    use super::*;

    fn measurement(hour: u32, heart_rate: Option<f64>) -> Measurement {
        Measurement {
            heart_rate,
            ..Measurement::empty(Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap())
        }
    }

    #[test]
    fn test_missing_vitals_serialize_as_null() {
        let m = measurement(9, Some(72.0));
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["heartRate"], 72.0);
        assert!(json["pain"].is_null());
        assert!(json.as_object().unwrap().contains_key("pain"));
    }

    #[test]
    fn test_absent_vital_deserializes_as_missing() {
        let m: Measurement =
            serde_json::from_str(r#"{"date":"2024-01-01T09:00:00Z","heartRate":80}"#).unwrap();
        assert_eq!(m.heart_rate, Some(80.0));
        assert_eq!(m.temperature, None);
    }

    #[test]
    fn test_observed_values_skip_missing() {
        let participant = Participant {
            id: "P1".to_owned(),
            measurements: vec![
                measurement(8, Some(70.0)),
                measurement(9, None),
                measurement(10, Some(90.0)),
            ],
            ..Participant::default()
        };
        assert_eq!(participant.observed_values(VitalField::HeartRate), vec![70.0, 90.0]);
        // 3 measurements, 5 empty vitals each plus 1 missing heart rate
        assert_eq!(participant.missing_value_count(), 16);
    }

    #[test]
    fn test_mean_treatment_effectiveness() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut participant = Participant::default();
        assert_eq!(participant.mean_treatment_effectiveness(), None);
        participant.treatments = vec![
            Treatment {
                name: "Antibiotics".to_owned(),
                start_date: date,
                end_date: None,
                effectiveness: 60.0,
            },
            Treatment {
                name: "IV Fluids".to_owned(),
                start_date: date,
                end_date: Some(date),
                effectiveness: 80.0,
            },
        ];
        assert_eq!(participant.mean_treatment_effectiveness(), Some(70.0));
        assert!(participant.treatments[0].is_ongoing());
    }
}
