// control.rs - Controls and the ControlStatus state machine.
//
// A control is one requirement of a framework (e.g. SOC 2 CC6.1). Its
// status graph is deliberately open: any status may follow any other,
// except that a Failed control cannot jump straight to Implemented. It has
// to be put back in progress (or otherwise re-examined) first.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use grc_shared::{
    ControlId, ErrorCode, FrameworkId, Percentage, UserId, Validated, ValidationError, Validator,
};

use crate::label::{format_timestamp, Label, LabelLocale};

/// Implementation state of a control.
///
/// Each variant carries only the data that makes sense for it, so an
/// `InProgress` control always has a progress value and a `Failed` one
/// always has a reason and detection time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ControlStatus {
    /// Initial state.
    NotImplemented,

    /// Work underway.
    InProgress {
        progress: Percentage,
    },

    /// Done, as of `implemented_at`.
    Implemented {
        implemented_at: DateTime<Utc>,
    },

    /// Excluded from scope.
    NotApplicable { reason: String },

    /// Was working, is now broken.
    Failed {
        reason: String,
        detected_at: DateTime<Utc>,
    },
}

impl ControlStatus {
    /// Stable snake_case variant name, for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            ControlStatus::NotImplemented => "not_implemented",
            ControlStatus::InProgress { .. } => "in_progress",
            ControlStatus::Implemented { .. } => "implemented",
            ControlStatus::NotApplicable { .. } => "not_applicable",
            ControlStatus::Failed { .. } => "failed",
        }
    }

    /// Check the one forbidden edge: Failed → Implemented.
    pub fn validate_transition(&self, next: &ControlStatus) -> Result<(), ValidationError> {
        if let (ControlStatus::Failed { .. }, ControlStatus::Implemented { .. }) = (self, next) {
            return Err(ValidationError::new(
                "status",
                "Cannot transition directly from Failed to Implemented",
                ErrorCode::InvalidTransition,
            ));
        }
        Ok(())
    }
}

impl Label for ControlStatus {
    fn label(&self, locale: LabelLocale) -> String {
        match (locale, self) {
            (LabelLocale::English, ControlStatus::NotImplemented) => "Not Implemented".to_string(),
            (LabelLocale::English, ControlStatus::InProgress { progress }) => {
                format!("In Progress ({progress})")
            }
            (LabelLocale::English, ControlStatus::Implemented { implemented_at }) => {
                format!("Implemented ({})", format_timestamp(implemented_at))
            }
            (LabelLocale::English, ControlStatus::NotApplicable { reason }) => {
                format!("Not Applicable: {reason}")
            }
            (LabelLocale::English, ControlStatus::Failed { reason, .. }) => {
                format!("Failed: {reason}")
            }
            (LabelLocale::Japanese, ControlStatus::NotImplemented) => "未実装".to_string(),
            (LabelLocale::Japanese, ControlStatus::InProgress { progress }) => {
                format!("実装中 ({progress})")
            }
            (LabelLocale::Japanese, ControlStatus::Implemented { implemented_at }) => {
                format!("実装済み ({})", format_timestamp(implemented_at))
            }
            (LabelLocale::Japanese, ControlStatus::NotApplicable { reason }) => {
                format!("適用外: {reason}")
            }
            (LabelLocale::Japanese, ControlStatus::Failed { reason, .. }) => {
                format!("失敗: {reason}")
            }
        }
    }
}

impl fmt::Display for ControlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label(LabelLocale::English))
    }
}

/// Input for [`Control::create`].
#[derive(Debug, Clone)]
pub struct NewControl {
    pub id: String,
    pub framework_id: FrameworkId,
    pub code: String,
    pub title: String,
    pub description: String,
    pub owner_id: UserId,
}

/// A control snapshot.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Control {
    id: ControlId,
    framework_id: FrameworkId,
    code: String,
    title: String,
    description: String,
    status: ControlStatus,
    owner_id: UserId,
}

impl Control {
    /// Validate the input and create a control in `NotImplemented`.
    pub fn create(input: NewControl) -> Validated<Self> {
        let id = ControlId::new(input.id);

        let mut validator = Validator::new();
        validator.record(&id);
        validator.require_text("code", &input.code, "Control code is required");
        validator.require_text("title", &input.title, "Control title is required");
        validator.finish()?;

        Ok(Self {
            id: id?,
            framework_id: input.framework_id,
            code: input.code,
            title: input.title,
            description: input.description,
            status: ControlStatus::NotImplemented,
            owner_id: input.owner_id,
        })
    }

    pub fn id(&self) -> &ControlId {
        &self.id
    }

    pub fn framework_id(&self) -> &FrameworkId {
        &self.framework_id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> &ControlStatus {
        &self.status
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Return a copy in `new_status`. Only Failed → Implemented is refused.
    pub fn update_status(&self, new_status: ControlStatus) -> Result<Self, ValidationError> {
        if let Err(error) = self.status.validate_transition(&new_status) {
            tracing::debug!(
                control_id = %self.id,
                from = self.status.name(),
                to = new_status.name(),
                code = %error.code,
                "control status change rejected"
            );
            return Err(error);
        }

        tracing::debug!(
            control_id = %self.id,
            from = self.status.name(),
            to = new_status.name(),
            "control status changed"
        );
        Ok(Self {
            status: new_status,
            ..self.clone()
        })
    }
}
