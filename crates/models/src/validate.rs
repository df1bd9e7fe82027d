//! Field checks shared by request validation in the service layer.

use crate::errors::{FieldViolation, ModelError};

/// Oldest model year accepted for a bike.
pub const MIN_BIKE_YEAR: i32 = 1900;

/// Collects every failed check so callers see all problems at once.
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    pub fn new() -> Self { Self::default() }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.0.push(FieldViolation { field: field.to_string(), message: message.to_string() });
        }
        self
    }

    pub fn finish(self) -> Result<(), ModelError> {
        if self.0.is_empty() { Ok(()) } else { Err(ModelError::Fields(self.0)) }
    }
}

pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Aadhar numbers are exactly twelve ASCII digits.
pub fn is_aadhar(value: &str) -> bool {
    value.len() == 12 && value.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_email(value: &str) -> bool {
    let value = value.trim();
    let Some((local, domain)) = value.split_once('@') else { return false };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
}

/// Model year in `[1900, current_year + 1]`.
pub fn is_valid_year(year: i32, current_year: i32) -> bool {
    (MIN_BIKE_YEAR..=current_year + 1).contains(&year)
}

pub fn is_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
