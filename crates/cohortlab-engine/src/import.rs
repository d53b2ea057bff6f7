//! Validation of externally supplied cohort data.
//!
//! Imported data is checked structurally first, so that errors name the
//! offending element, and then deserialized into [`Participant`] values.
//! Import is all-or-nothing: any invalid element rejects the whole cohort.

use std::collections::HashSet;

use serde_json::Value;

use crate::core::Participant;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ValidationError {
    #[display("invalid JSON: {_0}")]
    Json(serde_json::Error),
    #[display("cohort data must be an array of participants")]
    NotAnArray,
    #[display("participant at index {index} is not an object")]
    NotAnObject { index: usize },
    #[display("participant at index {index} has no non-empty string id")]
    MissingId { index: usize },
    #[display("participant at index {index} has no numeric age")]
    NonNumericAge { index: usize },
    #[display("participant at index {index} has an age that is not a whole number of years")]
    InvalidAge { index: usize },
    #[display("participant at index {index} has no measurements array")]
    MeasurementsNotArray { index: usize },
    #[display("participant at index {index} is malformed: {source}")]
    Malformed {
        index: usize,
        source: serde_json::Error,
    },
    #[display("duplicate participant id {id:?}")]
    DuplicateId {
        #[error(not(source))]
        id: String,
    },
}

/// Parses and validates a cohort from JSON text.
pub fn import_cohort_str(json: &str) -> Result<Vec<Participant>, ValidationError> {
    let value = serde_json::from_str(json).map_err(ValidationError::Json)?;
    import_cohort(value)
}

/// Validates a cohort given as a JSON value.
///
/// Every element must be an object with a non-empty string `id`, a numeric
/// `age` and a `measurements` array. An age written as a float is accepted when
/// it is a whole number. Other participant fields are optional and take their
/// defaults when absent.
pub fn import_cohort(value: Value) -> Result<Vec<Participant>, ValidationError> {
    let Value::Array(mut elements) = value else {
        return Err(ValidationError::NotAnArray);
    };

    for (index, element) in elements.iter_mut().enumerate() {
        check_shape(index, element)?;
    }

    let mut seen = HashSet::new();
    let mut cohort = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        let participant = serde_json::from_value::<Participant>(element)
            .map_err(|source| ValidationError::Malformed { index, source })?;
        if !seen.insert(participant.id.clone()) {
            return Err(ValidationError::DuplicateId { id: participant.id });
        }
        cohort.push(participant);
    }
    log::info!("imported {} participants", cohort.len());
    Ok(cohort)
}

fn check_shape(index: usize, element: &mut Value) -> Result<(), ValidationError> {
    let Some(object) = element.as_object_mut() else {
        return Err(ValidationError::NotAnObject { index });
    };
    match object.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => {}
        _ => return Err(ValidationError::MissingId { index }),
    }
    match object.get_mut("age") {
        Some(age) if age.is_number() => {
            let years = whole_age(age).ok_or(ValidationError::InvalidAge { index })?;
            *age = years.into();
        }
        _ => return Err(ValidationError::NonNumericAge { index }),
    }
    if !object.get("measurements").is_some_and(Value::is_array) {
        return Err(ValidationError::MeasurementsNotArray { index });
    }
    Ok(())
}

fn whole_age(age: &Value) -> Option<u32> {
    if let Some(age) = age.as_u64() {
        return u32::try_from(age).ok();
    }
    let age = age.as_f64()?;
    if age.fract() > 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&age) {
        return None;
    }
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let years = age as u32;
    Some(years)
}
