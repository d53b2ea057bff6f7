use std::fmt::Write as _;

use cohortlab_engine::{Outcome, Participant, RiskBand, VitalField};

fn outcome_phrase(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Improved => "improved over the course of the stay",
        Outcome::Stable => "remained clinically stable",
        Outcome::Deteriorated => "deteriorated during the stay",
        Outcome::Transferred => "was transferred to another facility",
        Outcome::Deceased => "died during the admission",
    }
}

/// Short free-text case note describing `participant`.
///
/// The note only restates computed fields: demographics, risk band, stay,
/// outcome, the latest observed vitals, treatments and comorbidities.
#[must_use]
pub fn clinical_note(participant: &Participant) -> String {
    let p = participant;
    let mut note = String::new();

    write!(
        note,
        "{} is a {}-year-old {} patient on the {} unit with a primary diagnosis of {}.",
        p.id,
        p.age,
        p.gender.to_lowercase(),
        p.unit,
        p.condition
    )
    .unwrap();
    if let Some(date) = p.admission_date {
        write!(note, " Admitted on {date}.").unwrap();
    }
    let band = RiskBand::from_score(p.risk_score);
    write!(
        note,
        " Risk score {:.1} ({band} risk), readmission risk {:.1}%.",
        p.risk_score, p.readmission_risk
    )
    .unwrap();
    let day_word = if p.length_of_stay == 1 { "day" } else { "days" };
    write!(
        note,
        " Over a {} {day_word} stay the patient {}.",
        p.length_of_stay,
        outcome_phrase(p.outcome)
    )
    .unwrap();

    let latest = VitalField::ALL
        .into_iter()
        .filter_map(|field| {
            let value = p.vital_series(field).flatten().last()?;
            Some(format!("{} {value}", field.label()))
        })
        .collect::<Vec<_>>();
    if !latest.is_empty() {
        write!(note, " Latest observed vitals: {}.", latest.join(", ")).unwrap();
    }

    if !p.treatments.is_empty() {
        let treatments = p
            .treatments
            .iter()
            .map(|t| {
                let status = if t.is_ongoing() { "ongoing" } else { "completed" };
                format!("{} ({status}, {:.0}% effective)", t.name, t.effectiveness)
            })
            .collect::<Vec<_>>();
        write!(note, " Treatments: {}.", treatments.join("; ")).unwrap();
    }
    if let Some(comorbidities) = p.comorbidities.as_ref().filter(|c| !c.is_empty()) {
        write!(note, " Comorbidities: {}.", comorbidities.join(", ")).unwrap();
    }
    note
}
