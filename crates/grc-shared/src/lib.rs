//! # grc-shared
//!
//! The bottom layer of the GRC domain model: a validation-error taxonomy,
//! helpers for threading validation outcomes through `Result`, and the
//! validated value objects every entity is built from.
//!
//! ## Key components
//!
//! - [`ValidationError`] / [`ValidationErrors`]: a single rule violation and
//!   the non-empty list a factory returns when one or more fields are bad
//! - [`Validator`]: collects every failure of a multi-field factory before
//!   reporting, instead of stopping at the first one
//! - [`ResultExt`]: `fold` for callers that want a single expression over
//!   both arms of a `Result`
//! - Identifier newtypes ([`FrameworkId`], [`ControlId`], [`EvidenceId`],
//!   [`RiskId`], [`UserId`], [`IntegrationId`]), [`Percentage`] and [`Url`]
//!
//! ## Key invariants
//!
//! - A value object that exists is valid. Validation happens once, in the
//!   constructor (or `TryFrom` on deserialization), and is never repeated.
//! - A [`ValidationErrors`] is never empty.

pub mod error;
pub mod ids;
pub mod percentage;
pub mod result;
pub mod url;

pub use error::{ErrorCode, ValidationError, ValidationErrors};
pub use ids::{ControlId, EvidenceId, FrameworkId, IntegrationId, RiskId, UserId};
pub use percentage::Percentage;
pub use result::{ResultExt, Validated, Validator};
pub use crate::url::Url;
