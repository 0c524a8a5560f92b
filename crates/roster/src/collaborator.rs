//! Core collaborator types for roster.
//!
//! This module defines the registration record, the normalized insert
//! payload, and the raw form input the operator fills in.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validate::{is_valid_birth_date, is_valid_phone, is_valid_postal_code};

/// Date format accepted for birth dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A persisted collaborator registration.
///
/// Built by the storage layer from a row; never mutated after insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    /// Identifier assigned by the store.
    pub id: i64,

    /// Full name, never empty.
    pub full_name: String,

    /// Street address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// District or neighbourhood.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,

    /// City.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Two-letter state code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_code: Option<String>,

    /// Postal code, as typed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    /// Phone number, as typed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Date of birth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,

    /// Job role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// When the store registered this record (UTC).
    pub created_at: NaiveDateTime,
}

/// A validated, normalized record ready to be inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCollaborator {
    /// Full name, trimmed and non-empty.
    pub full_name: String,
    /// Street address.
    pub address: Option<String>,
    /// District or neighbourhood.
    pub district: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Two-letter state code.
    pub state_code: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Date of birth.
    pub birth_date: Option<NaiveDate>,
    /// Job role.
    pub role: Option<String>,
}

impl NewCollaborator {
    /// Create a payload carrying only a name.
    #[must_use]
    pub fn named(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Self::default()
        }
    }
}

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The name is missing or blank.
    #[error("full name is required")]
    FullNameRequired,

    /// The postal code does not look like `12345-678`.
    #[error("postal code must have the format 12345-678")]
    InvalidPostalCode,

    /// The phone number has too few digits.
    #[error("phone must have at least 10 digits")]
    InvalidPhone,

    /// The birth date could not be parsed.
    #[error("birth date must have the format YYYY-MM-DD")]
    InvalidBirthDate,

    /// The birth date is before 1900 or in the future.
    #[error("birth date must be between 1900-01-01 and today")]
    BirthDateOutOfRange,
}

/// Raw operator input, one string per form field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollaboratorForm {
    /// Full name (required).
    pub full_name: String,
    /// Street address.
    pub address: String,
    /// District or neighbourhood.
    pub district: String,
    /// City.
    pub city: String,
    /// State code, picked from the configured options.
    pub state_code: String,
    /// Postal code.
    pub postal_code: String,
    /// Phone number.
    pub phone: String,
    /// Birth date as `YYYY-MM-DD`.
    pub birth_date: String,
    /// Role, picked from the configured options.
    pub role: String,
}

impl CollaboratorForm {
    /// Validate and normalize the form.
    ///
    /// Blank optional fields become `None` and skip validation. Every
    /// offending field contributes one [`FieldError`], in form order.
    ///
    /// # Errors
    ///
    /// Returns the list of field errors if any field is rejected.
    pub fn validate(&self, today: NaiveDate) -> Result<NewCollaborator, Vec<FieldError>> {
        let mut errors = Vec::new();

        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            errors.push(FieldError::FullNameRequired);
        }

        // Checked as typed: surrounding spaces are not part of a postal code.
        let postal_code = non_blank(&self.postal_code);
        if postal_code.is_some() && !is_valid_postal_code(&self.postal_code) {
            errors.push(FieldError::InvalidPostalCode);
        }

        let phone = non_blank(&self.phone);
        if phone.as_deref().is_some_and(|s| !is_valid_phone(s)) {
            errors.push(FieldError::InvalidPhone);
        }

        let birth_date = match non_blank(&self.birth_date) {
            None => None,
            Some(raw) => match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
                Ok(date) if is_valid_birth_date(date, today) => Some(date),
                Ok(_) => {
                    errors.push(FieldError::BirthDateOutOfRange);
                    None
                }
                Err(_) => {
                    errors.push(FieldError::InvalidBirthDate);
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewCollaborator {
            full_name: full_name.to_string(),
            address: non_blank(&self.address),
            district: non_blank(&self.district),
            city: non_blank(&self.city),
            state_code: non_blank(&self.state_code),
            postal_code,
            phone,
            birth_date,
            role: non_blank(&self.role),
        })
    }
}

/// Trim `s`, mapping blank input to `None`.
fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
