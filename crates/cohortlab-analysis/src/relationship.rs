use cohortlab_engine::Participant;
use cohortlab_stats::{
    correlation::{CorrelationStrength, correlation},
    descriptive::round_to,
    regression::LinearRegression,
};
use serde::Serialize;

use crate::metric::CohortMetric;

/// Correlation and least-squares fit between two cohort metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub x: CohortMetric,
    pub y: CohortMetric,
    /// Participants where both metrics are defined.
    pub n: usize,
    pub correlation: f64,
    pub strength: &'static str,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl Relationship {
    #[must_use]
    pub fn strength(&self) -> CorrelationStrength {
        CorrelationStrength::classify(self.correlation)
    }
}

/// Relates metric `x` to metric `y` across the cohort.
///
/// Only participants for which both metrics are defined contribute. Degenerate
/// inputs (fewer than two pairs, a constant series) give a zero correlation and
/// a flat regression line.
#[must_use]
pub fn analyze_relationship(
    cohort: &[Participant],
    x: CohortMetric,
    y: CohortMetric,
) -> Relationship {
    let (xs, ys): (Vec<f64>, Vec<f64>) = cohort
        .iter()
        .filter_map(|p| Some((x.value(p)?, y.value(p)?)))
        .unzip();
    let r = correlation(&xs, &ys);
    let fit = LinearRegression::fit(&xs, &ys);
    log::debug!("{x} vs {y}: n={} r={r:.3}", xs.len());
    Relationship {
        x,
        y,
        n: xs.len(),
        correlation: round_to(r, 3),
        strength: CorrelationStrength::classify(r).as_str(),
        slope: round_to(fit.slope, 3),
        intercept: round_to(fit.intercept, 3),
        r_squared: round_to(fit.r_squared, 3),
    }
}

#[cfg(test)]
mod tests {
    use cohortlab_engine::{CohortGenerator, CohortSeed, SimulationConfig};

    use super::*;

    fn with(age: u32, risk: f64, los: u32) -> Participant {
        Participant {
            age,
            risk_score: risk,
            length_of_stay: los,
            ..Participant::default()
        }
    }

    #[test]
    fn test_exact_linear_relationship() {
        let cohort = (1..=5)
            .map(|i| with(i, f64::from(i) * 2.0 + 3.0, 0))
            .collect::<Vec<_>>();
        let rel = analyze_relationship(&cohort, CohortMetric::Age, CohortMetric::RiskScore);
        assert_eq!(rel.n, 5);
        assert_eq!(rel.correlation, 1.0);
        assert_eq!(rel.strength, "strong");
        assert_eq!(rel.slope, 2.0);
        assert_eq!(rel.intercept, 3.0);
        assert_eq!(rel.r_squared, 1.0);
    }

    #[test]
    fn test_symmetric_correlation() {
        let cohort = [with(30, 10.0, 4), with(50, 35.0, 2), with(70, 30.0, 9), with(80, 90.0, 5)];
        let ab = analyze_relationship(&cohort, CohortMetric::Age, CohortMetric::LengthOfStay);
        let ba = analyze_relationship(&cohort, CohortMetric::LengthOfStay, CohortMetric::Age);
        assert_eq!(ab.correlation, ba.correlation);
    }

    #[test]
    fn test_constant_series_is_degenerate() {
        let cohort = [with(30, 10.0, 4), with(50, 35.0, 4), with(70, 30.0, 4)];
        let rel =
            analyze_relationship(&cohort, CohortMetric::LengthOfStay, CohortMetric::RiskScore);
        assert_eq!(rel.correlation, 0.0);
        assert_eq!(rel.slope, 0.0);
        assert_eq!(rel.strength(), CorrelationStrength::Weak);
    }

    #[test]
    fn test_skips_undefined_pairs() {
        let cohort = [with(30, 10.0, 4), with(50, 35.0, 4)];
        let rel =
            analyze_relationship(&cohort, CohortMetric::Age, CohortMetric::TreatmentEffectiveness);
        assert_eq!(rel.n, 0);
        assert_eq!(rel.correlation, 0.0);
        assert_eq!(rel.intercept, 0.0);
    }

    #[test]
    fn test_generated_risk_predicts_readmission() {
        let cohort = CohortGenerator::new(SimulationConfig {
            num_participants: 300,
            ..SimulationConfig::default()
        })
        .unwrap()
        .generate(CohortSeed::from_u128(3));
        let rel =
            analyze_relationship(&cohort, CohortMetric::RiskScore, CohortMetric::ReadmissionRisk);
        assert_eq!(rel.n, 300);
        assert!(rel.correlation > 0.5, "{}", rel.correlation);
        assert!(rel.slope > 0.0);
    }
}
