//! Form handling shared by the create and update pages
//!
//! A submitted form either produces a saved record or a set of per-field
//! error messages. Errors are not failures: the page is rendered again with
//! the submitted values and the messages attached.

use std::collections::BTreeMap;

use serde::Serialize;
use validator::{Validate, ValidateEmail, ValidateUrl, ValidationError, ValidationErrors};

pub const REQUIRED: &str = "This field is required.";
pub const TOO_LONG: &str = "Ensure this value has at most 255 characters.";

/// Per-field error messages, keyed by form field name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn merge(&mut self, other: FormErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FormErrors::default();
        for (field, list) in errors.field_errors() {
            for error in list.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", error.code));
                out.add(&field.to_string(), message);
            }
        }
        out
    }
}

/// Outcome of a create or update submission
#[derive(Debug)]
pub enum Submission<T> {
    Saved(T),
    Invalid(FormErrors),
}

/// A form whose fields are the allow-list of a record type
pub trait CatalogForm: Validate + Serialize {
    /// Trim surrounding whitespace from every text field
    fn normalize(&mut self);

    /// Run the field rules, returning the collected messages
    fn check(&self) -> FormErrors {
        match self.validate() {
            Ok(()) => FormErrors::default(),
            Err(errors) => errors.into(),
        }
    }
}

pub(crate) fn required(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(message("required", REQUIRED))
    } else {
        Ok(())
    }
}

pub(crate) fn optional_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_email() {
        Ok(())
    } else {
        Err(message("email", "Enter a valid email address."))
    }
}

pub(crate) fn optional_url(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_url() {
        Ok(())
    } else {
        Err(message("url", "Enter a valid URL."))
    }
}

pub(crate) fn optional_date(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
        Ok(())
    } else {
        Err(message("date", "Enter a valid date."))
    }
}

pub(crate) fn required_id(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(message("required", REQUIRED))
    } else if value.parse::<i32>().is_err() {
        Err(message("invalid_choice", "Select a valid choice."))
    } else {
        Ok(())
    }
}

pub(crate) fn id_list(values: &[String]) -> Result<(), ValidationError> {
    if values.is_empty() {
        Err(message("required", REQUIRED))
    } else if values.iter().any(|v| v.trim().parse::<i32>().is_err()) {
        Err(message("invalid_pk_value", "Enter a list of values."))
    } else {
        Ok(())
    }
}

fn message(code: &'static str, text: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(text.into());
    error
}
