//! Deep-phenotype synthesis.

use rand::Rng;

use crate::core::{
    ActivitiesOfDailyLiving, DeepPhenotype, FunctionalStatus, MentalHealth, Outcome,
    PatientSatisfaction, QualityOfLife, SocialDeterminants, SymptomBurden,
};

use super::gaussian;

/// Overall illness burden in `[0, 1]` that drives every phenotype score.
fn burden(risk_score: f64, outcome: Outcome, age: u32) -> f64 {
    let outcome_penalty = match outcome {
        Outcome::Improved => -0.1,
        Outcome::Stable => 0.0,
        Outcome::Transferred => 0.05,
        Outcome::Deteriorated => 0.1,
        Outcome::Deceased => 0.15,
    };
    let age_penalty = (f64::from(age) - 50.0) / 400.0;
    (risk_score / 100.0 + outcome_penalty + age_penalty).clamp(0.0, 1.0)
}

struct ScoreSampler<'a, R: ?Sized> {
    rng: &'a mut R,
    burden: f64,
}

impl<R> ScoreSampler<'_, R>
where
    R: Rng + ?Sized,
{
    /// A score where higher values mean better health.
    fn better(&mut self, min: f64, max: f64, decimals: i32) -> f64 {
        let span = max - min;
        let mean = max - span * (0.15 + 0.6 * self.burden);
        self.finish(mean, min, max, decimals)
    }

    /// A score where higher values mean worse health.
    fn worse(&mut self, min: f64, max: f64, decimals: i32) -> f64 {
        let span = max - min;
        let mean = min + span * (0.1 + 0.6 * self.burden);
        self.finish(mean, min, max, decimals)
    }

    fn finish(&mut self, mean: f64, min: f64, max: f64, decimals: i32) -> f64 {
        let value = mean + gaussian(&mut *self.rng, (max - min) * 0.08);
        let factor = 10f64.powi(decimals);
        ((value.clamp(min, max) * factor).round() / factor).clamp(min, max)
    }
}

/// Generates a phenotype consistent with the participant's risk and outcome.
///
/// Higher risk (and worse outcomes) shift every score toward its unhealthy end.
pub(crate) fn generate<R>(rng: &mut R, risk_score: f64, outcome: Outcome, age: u32) -> DeepPhenotype
where
    R: Rng + ?Sized,
{
    let mut s = ScoreSampler {
        rng,
        burden: burden(risk_score, outcome, age),
    };
    DeepPhenotype {
        quality_of_life: QualityOfLife {
            overall: s.better(0.0, 100.0, 0),
            physical: s.better(0.0, 100.0, 0),
            mental: s.better(0.0, 100.0, 0),
            social: s.better(0.0, 100.0, 0),
        },
        patient_satisfaction: PatientSatisfaction {
            overall: s.better(0.0, 10.0, 1),
            communication: s.better(0.0, 10.0, 1),
            care_coordination: s.better(0.0, 10.0, 1),
        },
        symptom_burden: SymptomBurden {
            pain: s.worse(0.0, 10.0, 0),
            fatigue: s.worse(0.0, 10.0, 0),
            dyspnea: s.worse(0.0, 10.0, 0),
            nausea: s.worse(0.0, 10.0, 0),
        },
        activities_of_daily_living: ActivitiesOfDailyLiving {
            katz_index: s.better(0.0, 6.0, 0),
            lawton_iadl: s.better(0.0, 8.0, 0),
        },
        mental_health: MentalHealth {
            phq9: s.worse(0.0, 27.0, 0),
            gad7: s.worse(0.0, 21.0, 0),
        },
        functional_status: FunctionalStatus {
            physical_function: s.better(0.0, 100.0, 0),
            mobility: s.better(0.0, 100.0, 0),
            grip_strength: s.better(5.0, 60.0, 1),
            frailty_index: s.worse(0.0, 1.0, 2),
        },
        social_determinants: SocialDeterminants {
            social_support: s.better(0.0, 100.0, 0),
            health_literacy: s.better(0.0, 100.0, 0),
            financial_strain: s.worse(0.0, 10.0, 0),
        },
    }
}
