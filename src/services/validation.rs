use chrono::{Datelike, NaiveDate};
use phonenumber::{country, Mode};

use crate::models::{Command, Field, FieldValue};

const MIN_AGE: i32 = -1;
const MAX_AGE: i32 = 150;

pub fn default_next_step() -> String {
    format!(
        "repeat back to the caller the value inputted, and confirm that's correct. To save and submit, use {}",
        Command::ValidateAllAndSubmitIfValid
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuleError {
    MissingLastName,
    BadDateFormat,
    AgeOutOfRange { age: i32 },
    UnparseablePhone { value: String },
    InvalidPhone { value: String },
    WrongType { reason: String },
}

impl std::fmt::Display for RuleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleError::MissingLastName => write!(f, "patient should give first and last name"),
            RuleError::BadDateFormat => write!(
                f,
                "error parsing date: patient should give their full date of birth, month, day and year in the format YYYY-MM-DD ."
            ),
            RuleError::AgeOutOfRange { age } => {
                write!(f, "calculated age was {age} which is invalid")
            }
            RuleError::UnparseablePhone { value } => {
                write!(f, "could not parse provided number: {value}")
            }
            RuleError::InvalidPhone { value } => {
                write!(f, "number provided is not valid: {value}")
            }
            RuleError::WrongType { reason } => write!(f, "{reason}"),
        }
    }
}

impl RuleError {
    pub fn next_step(&self) -> String {
        let base = default_next_step();
        match self {
            RuleError::BadDateFormat => format!(
                "{base} If the month, day, year are present, but the format is wrong, try reinputting with the same month, day and year."
            ),
            RuleError::UnparseablePhone { .. } | RuleError::InvalidPhone { .. } => {
                format!("{base} please retry.")
            }
            _ => base,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Accepted {
    pub value: FieldValue,
    pub info: String,
    pub next_step: String,
}

pub fn validate_field(
    field: Field,
    value: &FieldValue,
    today: NaiveDate,
) -> Result<Accepted, RuleError> {
    let next_step = default_next_step();
    match field {
        Field::PatientName => {
            let name = require_text(field, value)?;
            validate_name(name)?;
            Ok(Accepted {
                value: value.clone(),
                info: format!("{field} is valid"),
                next_step: format!("{next_step} note: Spell back the name inputted."),
            })
        }
        Field::PatientDob => {
            validate_dob(require_text(field, value)?, today)?;
            Ok(Accepted {
                value: value.clone(),
                info: format!("{field} is valid"),
                next_step,
            })
        }
        Field::PatientPhoneNumber => {
            let formatted = validate_phone(require_text(field, value)?)?;
            Ok(Accepted {
                info: format!("The parsed number that will be used is {formatted}"),
                value: FieldValue::Text(formatted),
                next_step: format!(
                    "{next_step} If the user doesn't say the number is correct, tell the user for international numbers a plus sign should be added in front (E.164 format)."
                ),
            })
        }
        _ => Ok(Accepted {
            value: value.clone(),
            info: format!("{field} is valid"),
            next_step,
        }),
    }
}

fn require_text(field: Field, value: &FieldValue) -> Result<&str, RuleError> {
    value.as_text().ok_or_else(|| RuleError::WrongType {
        reason: format!("{field} should be text, got {value}"),
    })
}

/// Heuristic: a first and a last name are separated by at least one space.
pub fn validate_name(name: &str) -> Result<(), RuleError> {
    if name.trim().contains(' ') {
        Ok(())
    } else {
        Err(RuleError::MissingLastName)
    }
}

pub fn validate_dob(value: &str, today: NaiveDate) -> Result<NaiveDate, RuleError> {
    let dob =
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| RuleError::BadDateFormat)?;
    let age = years_since(dob, today);
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(RuleError::AgeOutOfRange { age });
    }
    Ok(dob)
}

pub fn years_since(date: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - date.year();
    if (today.month(), today.day()) < (date.month(), date.day()) {
        years -= 1;
    }
    years
}

pub fn validate_phone(value: &str) -> Result<String, RuleError> {
    let number = phonenumber::parse(Some(country::Id::US), value).map_err(|_| {
        RuleError::UnparseablePhone {
            value: value.to_string(),
        }
    })?;
    if !phonenumber::is_valid(&number) {
        return Err(RuleError::InvalidPhone {
            value: value.to_string(),
        });
    }
    Ok(number.format().mode(Mode::E164).to_string())
}
