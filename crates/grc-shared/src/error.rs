// error.rs - Validation error taxonomy for the GRC domain.
//
// Every expected failure in the model is a `{field, message, code}` record.
// Factories that check several fields at once report a non-empty list of
// them; transitions and value-object constructors report exactly one.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable reason for a validation failure.
///
/// Serialized (and displayed) as the SCREAMING_SNAKE_CASE code string so
/// that callers can match on it without parsing messages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// An identifier was empty or whitespace-only.
    EmptyId,
    /// A required text field was blank.
    Required,
    /// A framework version did not look like `1.0` or `1.0.0`.
    InvalidVersion,
    /// A percentage fell outside 0..=100.
    InvalidPercentage,
    /// A URL failed to parse as an absolute URL.
    InvalidUrl,
    /// An expiration date was not in the future.
    InvalidExpiration,
    /// A collection date was in the future.
    InvalidCollectionDate,
    /// A status change is forbidden from the current state.
    InvalidTransition,
    /// A framework cannot become active without controls.
    NoControls,
}

impl ErrorCode {
    /// The stable code string, e.g. `"EMPTY_ID"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::EmptyId => "EMPTY_ID",
            ErrorCode::Required => "REQUIRED",
            ErrorCode::InvalidVersion => "INVALID_VERSION",
            ErrorCode::InvalidPercentage => "INVALID_PERCENTAGE",
            ErrorCode::InvalidUrl => "INVALID_URL",
            ErrorCode::InvalidExpiration => "INVALID_EXPIRATION",
            ErrorCode::InvalidCollectionDate => "INVALID_COLLECTION_DATE",
            ErrorCode::InvalidTransition => "INVALID_TRANSITION",
            ErrorCode::NoControls => "NO_CONTROLS",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single violated rule: which field, what went wrong, and the code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Error)]
#[error("[{code}] {field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub code: ErrorCode,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code,
        }
    }
}

/// A non-empty, ordered list of validation errors.
///
/// There is no way to build an empty one: construct it from a single
/// [`ValidationError`] or via [`ValidationErrors::from_vec`], which refuses
/// an empty vector.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Error)]
#[serde(transparent)]
#[error("{}", join_errors(.errors))]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    /// Wrap a vector of errors. Returns `None` if it is empty.
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn as_slice(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// The first recorded error. Always present.
    pub fn first(&self) -> &ValidationError {
        &self.errors[0]
    }

    /// Error codes in the order they were recorded.
    pub fn codes(&self) -> Vec<ErrorCode> {
        self.errors.iter().map(|e| e.code).collect()
    }

    pub fn contains_code(&self, code: ErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
