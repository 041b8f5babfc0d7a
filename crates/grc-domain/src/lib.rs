//! # grc-domain
//!
//! Governance, risk and compliance entities modelled as immutable snapshots
//! with explicit state machines.
//!
//! Every entity is created through a validating factory that reports *all*
//! field problems at once, and every status change returns a new snapshot
//! (or the single business rule that forbids it). Nothing here performs
//! I/O apart from [`GrcConfig::load`], and nothing reads the wall clock:
//! time-dependent operations take `now` explicitly, usually from a
//! [`Clock`] at the call site.
//!
//! ## Key components
//!
//! - [`Framework`]: lifecycle `Draft / Active / Deprecated`, owns control ids
//! - [`Control`]: carries a [`ControlStatus`]
//! - [`Evidence`]: carries an [`EvidenceType`]; [`EvidenceStatus`] is derived
//! - [`Risk`]: inherent and residual [`RiskScore`]s plus a [`RiskStatus`]
//! - [`Label`]: English / Japanese labels for every state machine
//! - [`GrcConfig`]: label locale, loaded from `.grc/config.toml`
//!
//! ## Transition rules
//!
//! - Framework: Deprecated → Active is forbidden; → Active needs controls.
//! - Control: Failed → Implemented is forbidden. Everything else is allowed.
//! - Risk: Closed is terminal; → Accepted needs a future expiry.

pub mod clock;
pub mod config;
pub mod control;
pub mod evidence;
pub mod framework;
pub mod label;
pub mod risk;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, GrcConfig, LabelConfig};
pub use control::{Control, ControlStatus, NewControl};
pub use evidence::{CheckResult, Evidence, EvidenceStatus, EvidenceType, FileType, NewEvidence};
pub use framework::{Framework, FrameworkStatus, FrameworkType, NewFramework};
pub use label::{format_timestamp, Label, LabelLocale};
pub use risk::{
    calculate_risk_score, NewRisk, Risk, RiskCategory, RiskLevel, RiskScore, RiskStatus,
};

pub use grc_shared;
