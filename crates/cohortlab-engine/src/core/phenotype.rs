//! Extended per-participant variables (deep phenotyping).
//!
//! The phenotype is a fixed tree of categories, each holding numeric scores with
//! documented ranges. Scores are addressed by dot paths such as
//! `functionalStatus.physicalFunction`; [`DeepPhenotype::resolve`] looks a path up
//! and returns `None` for anything it does not know.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepPhenotype {
    pub quality_of_life: QualityOfLife,
    pub patient_satisfaction: PatientSatisfaction,
    pub symptom_burden: SymptomBurden,
    pub activities_of_daily_living: ActivitiesOfDailyLiving,
    pub mental_health: MentalHealth,
    pub functional_status: FunctionalStatus,
    pub social_determinants: SocialDeterminants,
}

/// Quality-of-life scores, 0-100, higher is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityOfLife {
    pub overall: f64,
    pub physical: f64,
    pub mental: f64,
    pub social: f64,
}

/// Patient-reported satisfaction, 0-10.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSatisfaction {
    pub overall: f64,
    pub communication: f64,
    pub care_coordination: f64,
}

/// Symptom severities, 0-10, higher is worse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomBurden {
    pub pain: f64,
    pub fatigue: f64,
    pub dyspnea: f64,
    pub nausea: f64,
}

/// Katz ADL index (0-6) and Lawton IADL scale (0-8), higher is more independent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitiesOfDailyLiving {
    pub katz_index: f64,
    pub lawton_iadl: f64,
}

/// PHQ-9 (0-27) and GAD-7 (0-21) screening totals, higher is worse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentalHealth {
    pub phq9: f64,
    pub gad7: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionalStatus {
    /// 0-100, higher is better.
    pub physical_function: f64,
    /// 0-100, higher is better.
    pub mobility: f64,
    /// Kilograms, 5-60.
    pub grip_strength: f64,
    /// Deficit accumulation index, 0-1, higher is frailer.
    pub frailty_index: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialDeterminants {
    /// 0-100, higher is better.
    pub social_support: f64,
    /// 0-100, higher is better.
    pub health_literacy: f64,
    /// 0-10, higher is worse.
    pub financial_strain: f64,
}

/// A resolvable phenotype variable: its dot path, documented range and accessor.
#[derive(Debug, Clone, Copy)]
pub struct PhenotypeVariable {
    pub path: &'static str,
    pub bounds: (f64, f64),
    accessor: fn(&DeepPhenotype) -> f64,
}

impl PhenotypeVariable {
    const fn new(
        path: &'static str,
        min: f64,
        max: f64,
        accessor: fn(&DeepPhenotype) -> f64,
    ) -> Self {
        Self {
            path,
            bounds: (min, max),
            accessor,
        }
    }

    #[must_use]
    pub fn range(&self) -> RangeInclusive<f64> {
        self.bounds.0..=self.bounds.1
    }

    #[must_use]
    pub fn value(&self, phenotype: &DeepPhenotype) -> f64 {
        (self.accessor)(phenotype)
    }
}

impl DeepPhenotype {
    /// Every variable of the tree, in category order.
    pub const VARIABLES: &'static [PhenotypeVariable] = &[
        PhenotypeVariable::new("qualityOfLife.overall", 0.0, 100.0, |p| p.quality_of_life.overall),
        PhenotypeVariable::new("qualityOfLife.physical", 0.0, 100.0, |p| {
            p.quality_of_life.physical
        }),
        PhenotypeVariable::new("qualityOfLife.mental", 0.0, 100.0, |p| p.quality_of_life.mental),
        PhenotypeVariable::new("qualityOfLife.social", 0.0, 100.0, |p| p.quality_of_life.social),
        PhenotypeVariable::new("patientSatisfaction.overall", 0.0, 10.0, |p| {
            p.patient_satisfaction.overall
        }),
        PhenotypeVariable::new("patientSatisfaction.communication", 0.0, 10.0, |p| {
            p.patient_satisfaction.communication
        }),
        PhenotypeVariable::new("patientSatisfaction.careCoordination", 0.0, 10.0, |p| {
            p.patient_satisfaction.care_coordination
        }),
        PhenotypeVariable::new("symptomBurden.pain", 0.0, 10.0, |p| p.symptom_burden.pain),
        PhenotypeVariable::new("symptomBurden.fatigue", 0.0, 10.0, |p| p.symptom_burden.fatigue),
        PhenotypeVariable::new("symptomBurden.dyspnea", 0.0, 10.0, |p| p.symptom_burden.dyspnea),
        PhenotypeVariable::new("symptomBurden.nausea", 0.0, 10.0, |p| p.symptom_burden.nausea),
        PhenotypeVariable::new("activitiesOfDailyLiving.katzIndex", 0.0, 6.0, |p| {
            p.activities_of_daily_living.katz_index
        }),
        PhenotypeVariable::new("activitiesOfDailyLiving.lawtonIadl", 0.0, 8.0, |p| {
            p.activities_of_daily_living.lawton_iadl
        }),
        PhenotypeVariable::new("mentalHealth.phq9", 0.0, 27.0, |p| p.mental_health.phq9),
        PhenotypeVariable::new("mentalHealth.gad7", 0.0, 21.0, |p| p.mental_health.gad7),
        PhenotypeVariable::new("functionalStatus.physicalFunction", 0.0, 100.0, |p| {
            p.functional_status.physical_function
        }),
        PhenotypeVariable::new("functionalStatus.mobility", 0.0, 100.0, |p| {
            p.functional_status.mobility
        }),
        PhenotypeVariable::new("functionalStatus.gripStrength", 5.0, 60.0, |p| {
            p.functional_status.grip_strength
        }),
        PhenotypeVariable::new("functionalStatus.frailtyIndex", 0.0, 1.0, |p| {
            p.functional_status.frailty_index
        }),
        PhenotypeVariable::new("socialDeterminants.socialSupport", 0.0, 100.0, |p| {
            p.social_determinants.social_support
        }),
        PhenotypeVariable::new("socialDeterminants.healthLiteracy", 0.0, 100.0, |p| {
            p.social_determinants.health_literacy
        }),
        PhenotypeVariable::new("socialDeterminants.financialStrain", 0.0, 10.0, |p| {
            p.social_determinants.financial_strain
        }),
    ];

    /// Looks up the variable description for `path`.
    #[must_use]
    pub fn variable(path: &str) -> Option<&'static PhenotypeVariable> {
        Self::VARIABLES.iter().find(|v| v.path == path)
    }

    /// Resolves a dot path such as `functionalStatus.frailtyIndex`.
    ///
    /// Returns `None` for unknown or partial paths.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<f64> {
        Self::variable(path).map(|v| v.value(self))
    }
}
