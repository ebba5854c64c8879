//! Field-level validation results.
//!
//! Value constructors return small error enums; services gather them into a
//! [`FieldErrors`] map so a caller learns about every bad field at once. The
//! map becomes an `invalid_request` [`Error`] whose details hold
//! `{ "fields": { "<field>": "<message>" } }`.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::json;

use super::Error;

/// A validation failure tied to one input field.
pub trait FieldViolation: fmt::Display {
    /// Wire name of the offending field, in camelCase.
    fn field(&self) -> &'static str;
}

/// Accumulated field → message pairs. The first message per field wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// Empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation under its own field name.
    pub fn push(&mut self, violation: &impl FieldViolation) {
        self.insert(violation.field(), violation.to_string());
    }

    /// Record a message under an explicit field name.
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Keep the value of a successful check; record the violation otherwise.
    pub fn capture<T, E: FieldViolation>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(violation) => {
                self.push(&violation);
                None
            }
        }
    }

    /// Like [`FieldErrors::capture`] but files the violation under `field`.
    pub fn capture_as<T, E: fmt::Display>(
        &mut self,
        field: &'static str,
        result: Result<T, E>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(violation) => {
                self.insert(field, violation.to_string());
                None
            }
        }
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Message recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// `Ok(())` when empty, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<FieldErrors> for Error {
    fn from(errors: FieldErrors) -> Self {
        Self::invalid_request("Validation failed").with_details(json!({ "fields": errors.0 }))
    }
}

/// Character count after trimming, used by every length rule.
pub(crate) fn trimmed_len(value: &str) -> usize {
    value.trim().chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[derive(Debug)]
    struct TooShort;

    impl fmt::Display for TooShort {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Name must be between 2 and 50 characters")
        }
    }

    impl FieldViolation for TooShort {
        fn field(&self) -> &'static str {
            "name"
        }
    }

    #[rstest]
    fn first_message_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.insert("rating", "first");
        errors.insert("rating", "second");
        assert_eq!(errors.get("rating"), Some("first"));
    }

    #[rstest]
    fn capture_records_violation_and_drops_value() {
        let mut errors = FieldErrors::new();
        let kept: Option<u8> = errors.capture(Ok::<_, TooShort>(3));
        let dropped: Option<u8> = errors.capture(Err(TooShort));
        assert_eq!(kept, Some(3));
        assert!(dropped.is_none());
        assert_eq!(
            errors.get("name"),
            Some("Name must be between 2 and 50 characters")
        );
    }

    #[rstest]
    fn converts_into_invalid_request_with_field_details() {
        let mut errors = FieldErrors::new();
        errors.capture_as::<(), _>("newPassword", Err(TooShort));
        let error = Error::from(errors);
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            error.details(),
            Some(&json!({ "fields": { "newPassword": "Name must be between 2 and 50 characters" } }))
        );
    }

    #[rstest]
    #[case("  ab  ", 2)]
    #[case("héllo", 5)]
    #[case("   ", 0)]
    fn trimmed_len_counts_characters(#[case] value: &str, #[case] expected: usize) {
        assert_eq!(trimmed_len(value), expected);
    }
}
