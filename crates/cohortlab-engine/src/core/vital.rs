use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::participant::Measurement;

/// A nullable numeric vital sign tracked on every [`Measurement`].
///
/// Parsing is case-insensitive on the variant name, so both `heartRate` and
/// `HeartRate` are accepted.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::FromStr,
)]
#[serde(rename_all = "camelCase")]
pub enum VitalField {
    BloodPressureSystolic,
    BloodPressureDiastolic,
    HeartRate,
    Temperature,
    OxygenSaturation,
    Pain,
}

impl VitalField {
    pub const LEN: usize = 6;
    pub const ALL: [Self; Self::LEN] = [
        Self::BloodPressureSystolic,
        Self::BloodPressureDiastolic,
        Self::HeartRate,
        Self::Temperature,
        Self::OxygenSaturation,
        Self::Pain,
    ];

    /// The camelCase field name used in serialized measurements.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BloodPressureSystolic => "bloodPressureSystolic",
            Self::BloodPressureDiastolic => "bloodPressureDiastolic",
            Self::HeartRate => "heartRate",
            Self::Temperature => "temperature",
            Self::OxygenSaturation => "oxygenSaturation",
            Self::Pain => "pain",
        }
    }

    /// Human-readable label with unit.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::BloodPressureSystolic => "Systolic BP (mmHg)",
            Self::BloodPressureDiastolic => "Diastolic BP (mmHg)",
            Self::HeartRate => "Heart rate (bpm)",
            Self::Temperature => "Temperature (°C)",
            Self::OxygenSaturation => "SpO2 (%)",
            Self::Pain => "Pain (0-10)",
        }
    }

    #[must_use]
    pub fn get(self, measurement: &Measurement) -> Option<f64> {
        *self.slot(measurement)
    }

    pub fn set(self, measurement: &mut Measurement, value: Option<f64>) {
        *self.slot_mut(measurement) = value;
    }

    fn slot(self, m: &Measurement) -> &Option<f64> {
        match self {
            Self::BloodPressureSystolic => &m.blood_pressure_systolic,
            Self::BloodPressureDiastolic => &m.blood_pressure_diastolic,
            Self::HeartRate => &m.heart_rate,
            Self::Temperature => &m.temperature,
            Self::OxygenSaturation => &m.oxygen_saturation,
            Self::Pain => &m.pain,
        }
    }

    fn slot_mut(self, m: &mut Measurement) -> &mut Option<f64> {
        match self {
            Self::BloodPressureSystolic => &mut m.blood_pressure_systolic,
            Self::BloodPressureDiastolic => &mut m.blood_pressure_diastolic,
            Self::HeartRate => &mut m.heart_rate,
            Self::Temperature => &mut m.temperature,
            Self::OxygenSaturation => &mut m.oxygen_saturation,
            Self::Pain => &mut m.pain,
        }
    }
}

impl fmt::Display for VitalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};

    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("heartRate".parse::<VitalField>().unwrap(), VitalField::HeartRate);
        assert_eq!(
            "OxygenSaturation".parse::<VitalField>().unwrap(),
            VitalField::OxygenSaturation
        );
        assert!("date".parse::<VitalField>().is_err());
    }

    #[test]
    fn test_get_set_roundtrip_every_field() {
        let mut m = Measurement::empty(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
        for (i, field) in VitalField::ALL.into_iter().enumerate() {
            assert_eq!(field.get(&m), None);
            field.set(&mut m, Some(f64::from(u8::try_from(i).unwrap())));
        }
        for (i, field) in VitalField::ALL.into_iter().enumerate() {
            assert_eq!(field.get(&m), Some(f64::from(u8::try_from(i).unwrap())));
        }
    }

    #[test]
    fn test_name_matches_serialized_key() {
        for field in VitalField::ALL {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.as_str()));
        }
    }
}
