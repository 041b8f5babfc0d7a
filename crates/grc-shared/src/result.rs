// result.rs - Threading validation outcomes through `Result`.
//
// `std::result::Result` already gives us map / and_then / map_err /
// unwrap_or with the right short-circuit semantics. What it lacks is a
// two-armed fold, and a way to run several independent field checks and
// report all of them together. Both live here.

use crate::error::{ErrorCode, ValidationError, ValidationErrors};

/// Outcome of a multi-field factory: the entity, or every reason it was refused.
pub type Validated<T> = Result<T, ValidationErrors>;

/// Extension methods on `Result`.
pub trait ResultExt<T, E> {
    /// Collapse both arms into one value. Exactly one handler runs.
    fn fold<U>(self, on_ok: impl FnOnce(T) -> U, on_err: impl FnOnce(E) -> U) -> U;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn fold<U>(self, on_ok: impl FnOnce(T) -> U, on_err: impl FnOnce(E) -> U) -> U {
        match self {
            Ok(value) => on_ok(value),
            Err(error) => on_err(error),
        }
    }
}

/// Accumulates field errors for one factory call.
///
/// ```
/// use grc_shared::{ControlId, Validator};
///
/// let id = ControlId::new("");
/// let mut validator = Validator::new();
/// validator.record(&id);
/// validator.require_text("title", "  ", "Control title is required");
/// let errors = validator.finish().unwrap_err();
/// assert_eq!(errors.as_slice().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the error of a failed value-object construction, if any.
    pub fn record<T>(&mut self, outcome: &Result<T, ValidationError>) {
        if let Err(error) = outcome {
            self.errors.push(error.clone());
        }
    }

    /// Emit `REQUIRED` when `value` is empty or whitespace-only.
    pub fn require_text(&mut self, field: &str, value: &str, message: &str) {
        let present = !value.trim().is_empty();
        self.check(present, field, message, ErrorCode::Required);
    }

    /// Emit an error with `code` unless `condition` holds.
    pub fn check(&mut self, condition: bool, field: &str, message: &str, code: ErrorCode) {
        if !condition {
            self.errors.push(ValidationError::new(field, message, code));
        }
    }

    /// `Ok(())` when nothing was recorded, otherwise every error in order.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        match ValidationErrors::from_vec(self.errors) {
            None => Ok(()),
            Some(errors) => {
                tracing::debug!(
                    count = errors.as_slice().len(),
                    codes = ?errors.codes(),
                    "validation rejected input"
                );
                Err(errors)
            }
        }
    }
}
