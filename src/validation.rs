//! Explicit input validation. Payload structs call into a [`Validator`] that
//! collects field-level problems and turns them into one 400 response, so a
//! client sees every broken field at once rather than the first failure.

use std::collections::HashMap;

use crate::error::ApiError;

#[derive(Debug, Default)]
pub struct Validator {
    errors: HashMap<String, String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field must be present and non-blank
    pub fn require_text(&mut self, field: &str, value: Option<&str>) {
        match value {
            None => self.missing(field),
            Some(s) if s.trim().is_empty() => self.add(field, "must not be blank"),
            Some(_) => {}
        }
    }

    /// Field must be present and look like an email address
    pub fn require_email(&mut self, field: &str, value: Option<&str>) {
        match value {
            None => self.missing(field),
            Some(s) if !looks_like_email(s) => self.add(field, "must be a valid email address"),
            Some(_) => {}
        }
    }

    /// Field must be present and consist of `min` to `max` ASCII digits
    pub fn require_digits(&mut self, field: &str, value: Option<&str>, min: usize, max: usize) {
        match value {
            None => self.missing(field),
            Some(s) if !is_digits(s, min, max) => self.add(field, &digits_message(min, max)),
            Some(_) => {}
        }
    }

    /// Non-required variant of `require_text`: absent is fine, blank is not
    pub fn optional_text(&mut self, field: &str, value: Option<&str>) {
        if let Some(s) = value {
            if s.trim().is_empty() {
                self.add(field, "must not be blank");
            }
        }
    }

    /// Non-required variant of `require_digits`
    pub fn optional_digits(&mut self, field: &str, value: Option<&str>, min: usize, max: usize) {
        if let Some(s) = value {
            if !is_digits(s, min, max) {
                self.add(field, &digits_message(min, max));
            }
        }
    }

    /// Non-text field (enum, nested object) that must be present
    pub fn require(&mut self, field: &str, present: bool) {
        if !present {
            self.missing(field);
        }
    }

    pub fn missing(&mut self, field: &str) {
        self.add(field, "is required");
    }

    pub fn add(&mut self, field: &str, message: &str) {
        // Keep the first problem reported for a field
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Succeed if no problems were recorded, otherwise a 400 with per-field errors
    pub fn finish(self, message: &str) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error(message, Some(self.errors)))
        }
    }
}

fn is_digits(s: &str, min: usize, max: usize) -> bool {
    s.len() >= min && s.len() <= max && s.chars().all(|c| c.is_ascii_digit())
}

fn digits_message(min: usize, max: usize) -> String {
    if min == max {
        format!("must be {} digits", min)
    } else {
        format!("must be {} to {} digits", min, max)
    }
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
        }
        None => false,
    }
}
