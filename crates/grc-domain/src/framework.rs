// framework.rs - Compliance frameworks and their lifecycle.
//
// A framework owns an ordered, duplicate-free list of control ids.
// Status graph: Draft / Active / Deprecated, any-to-any, except
//   Deprecated → Active        (never)
//   anything   → Active        (only with at least one control)

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use grc_shared::{ControlId, ErrorCode, FrameworkId, Validated, ValidationError, Validator};

use crate::label::{Label, LabelLocale};

/// `1.0` or `1.0.0`. ASCII digits only.
static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+\.[0-9]+(\.[0-9]+)?$").expect("version pattern is a valid regex")
});

/// Which regulatory or industry standard a framework implements.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FrameworkType {
    #[serde(rename = "SOC2")]
    Soc2,
    #[serde(rename = "ISO27001")]
    Iso27001,
    #[serde(rename = "HIPAA")]
    Hipaa,
    #[serde(rename = "PCI_DSS")]
    PciDss,
    #[serde(rename = "GDPR")]
    Gdpr,
}

impl FrameworkType {
    pub const ALL: [FrameworkType; 5] = [
        FrameworkType::Soc2,
        FrameworkType::Iso27001,
        FrameworkType::Hipaa,
        FrameworkType::PciDss,
        FrameworkType::Gdpr,
    ];
}

impl Label for FrameworkType {
    fn label(&self, _locale: LabelLocale) -> String {
        match self {
            FrameworkType::Soc2 => "SOC 2",
            FrameworkType::Iso27001 => "ISO 27001",
            FrameworkType::Hipaa => "HIPAA",
            FrameworkType::PciDss => "PCI DSS",
            FrameworkType::Gdpr => "GDPR",
        }
        .to_string()
    }
}

impl fmt::Display for FrameworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label(LabelLocale::English))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FrameworkStatus {
    Draft,
    Active,
    Deprecated,
}

impl FrameworkStatus {
    pub const ALL: [FrameworkStatus; 3] = [
        FrameworkStatus::Draft,
        FrameworkStatus::Active,
        FrameworkStatus::Deprecated,
    ];
}

impl Label for FrameworkStatus {
    fn label(&self, _locale: LabelLocale) -> String {
        match self {
            FrameworkStatus::Draft => "Draft",
            FrameworkStatus::Active => "Active",
            FrameworkStatus::Deprecated => "Deprecated",
        }
        .to_string()
    }
}

impl fmt::Display for FrameworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label(LabelLocale::English))
    }
}

/// Input for [`Framework::create`].
#[derive(Debug, Clone)]
pub struct NewFramework {
    pub id: String,
    pub framework_type: FrameworkType,
    pub name: String,
    pub version: String,
    pub description: String,
}

/// A compliance framework snapshot.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Framework {
    id: FrameworkId,
    framework_type: FrameworkType,
    name: String,
    version: String,
    description: String,
    status: FrameworkStatus,
    control_ids: Vec<ControlId>,
}

impl Framework {
    /// Validate the input and create a framework in `Draft` with no controls.
    pub fn create(input: NewFramework) -> Validated<Self> {
        let id = FrameworkId::new(input.id);

        let mut validator = Validator::new();
        validator.record(&id);
        validator.require_text("name", &input.name, "Framework name is required");
        validator.check(
            VERSION_PATTERN.is_match(&input.version),
            "version",
            "Version must be in semver format (e.g., 1.0 or 1.0.0)",
            ErrorCode::InvalidVersion,
        );
        validator.finish()?;

        Ok(Self {
            id: id?,
            framework_type: input.framework_type,
            name: input.name,
            version: input.version,
            description: input.description,
            status: FrameworkStatus::Draft,
            control_ids: Vec::new(),
        })
    }

    pub fn id(&self) -> &FrameworkId {
        &self.id
    }

    pub fn framework_type(&self) -> FrameworkType {
        self.framework_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> FrameworkStatus {
        self.status
    }

    /// Control ids in the order they were added.
    pub fn control_ids(&self) -> &[ControlId] {
        &self.control_ids
    }

    pub fn contains_control(&self, control_id: &ControlId) -> bool {
        self.control_ids.contains(control_id)
    }

    /// Return a copy in `new_status`, or the rule that forbids it.
    pub fn update_status(&self, new_status: FrameworkStatus) -> Result<Self, ValidationError> {
        let rejection = if self.status == FrameworkStatus::Deprecated
            && new_status == FrameworkStatus::Active
        {
            Some(ValidationError::new(
                "status",
                "Cannot reactivate a deprecated framework",
                ErrorCode::InvalidTransition,
            ))
        } else if new_status == FrameworkStatus::Active && self.control_ids.is_empty() {
            Some(ValidationError::new(
                "status",
                "Cannot activate a framework without controls",
                ErrorCode::NoControls,
            ))
        } else {
            None
        };

        if let Some(error) = rejection {
            tracing::debug!(
                framework_id = %self.id,
                from = %self.status,
                to = %new_status,
                code = %error.code,
                "framework status change rejected"
            );
            return Err(error);
        }

        tracing::debug!(
            framework_id = %self.id,
            from = %self.status,
            to = %new_status,
            "framework status changed"
        );
        Ok(Self {
            status: new_status,
            ..self.clone()
        })
    }

    /// Return a copy with `control_id` appended. Adding an id that is
    /// already present returns an identical snapshot.
    pub fn add_control(&self, control_id: ControlId) -> Self {
        if self.contains_control(&control_id) {
            return self.clone();
        }
        let mut control_ids = self.control_ids.clone();
        control_ids.push(control_id);
        Self {
            control_ids,
            ..self.clone()
        }
    }
}
