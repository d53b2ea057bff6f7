use std::fmt;

use serde::{Deserialize, Serialize};

/// Gender categories assigned to simulated participants.
pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

/// Hospital units a participant can be admitted to.
pub const UNITS: [&str; 8] = [
    "ICU",
    "Cardiology",
    "Neurology",
    "Oncology",
    "Pediatrics",
    "Orthopedics",
    "General Medicine",
    "Emergency",
];

/// Primary conditions, also used as the comorbidity vocabulary.
pub const CONDITIONS: [&str; 10] = [
    "Hypertension",
    "Diabetes",
    "Heart Failure",
    "Pneumonia",
    "COPD",
    "Stroke",
    "Sepsis",
    "Chronic Kidney Disease",
    "Asthma",
    "Cancer",
];

/// Treatments a participant can receive during a stay.
pub const TREATMENTS: [&str; 8] = [
    "Medication Management",
    "Physical Therapy",
    "Surgery",
    "Dietary Counseling",
    "Oxygen Therapy",
    "IV Fluids",
    "Antibiotics",
    "Cardiac Monitoring",
];

/// Relative severity of a condition in `[0, 1]`.
///
/// Conditions outside the vocabulary (e.g. from an imported cohort) get a
/// middling severity.
#[must_use]
pub fn condition_severity(condition: &str) -> f64 {
    match condition {
        "Sepsis" => 0.9,
        "Cancer" | "Stroke" => 0.8,
        "Heart Failure" => 0.7,
        "Pneumonia" | "Chronic Kidney Disease" => 0.6,
        "COPD" => 0.5,
        "Diabetes" => 0.4,
        "Hypertension" | "Asthma" => 0.3,
        _ => 0.5,
    }
}

/// Disposition at the end of the observed stay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Improved,
    #[default]
    Stable,
    Deteriorated,
    Transferred,
    Deceased,
}

impl Outcome {
    pub const LEN: usize = 5;
    pub const ALL: [Self; Self::LEN] = [
        Self::Improved,
        Self::Stable,
        Self::Deteriorated,
        Self::Transferred,
        Self::Deceased,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Improved => "Improved",
            Self::Stable => "Stable",
            Self::Deteriorated => "Deteriorated",
            Self::Transferred => "Transferred",
            Self::Deceased => "Deceased",
        }
    }

    /// Whether the outcome counts as a good result for quality reporting.
    #[must_use]
    pub fn is_favorable(self) -> bool {
        matches!(self, Self::Improved | Self::Stable)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity band of a 0-100 risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    pub const ALL: [Self; 3] = [Self::Low, Self::Moderate, Self::High];

    /// Upper bound (exclusive) of the low band.
    pub const LOW_LIMIT: f64 = 30.0;
    /// Upper bound (exclusive) of the moderate band.
    pub const MODERATE_LIMIT: f64 = 70.0;

    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < Self::LOW_LIMIT {
            Self::Low
        } else if score < Self::MODERATE_LIMIT {
            Self::Moderate
        } else {
            Self::High
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
