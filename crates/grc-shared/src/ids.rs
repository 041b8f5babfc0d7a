// ids.rs - Typed identifiers.
//
// Each entity kind gets its own newtype so a ControlId can never be passed
// where a RiskId is expected. All six share the same rule: the value must
// contain something other than whitespace. The caller's string is stored
// as given; only the emptiness check trims.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ErrorCode, ValidationError};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap an identifier. Fails with `EMPTY_ID` on blank input.
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(ValidationError::new(
                        "id",
                        concat!(stringify!($name), " cannot be empty"),
                        ErrorCode::EmptyId,
                    ));
                }
                Ok(Self(value))
            }

            /// Mint a fresh random identifier (UUID v4).
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Identifies a compliance framework (SOC 2, ISO 27001, ...).
    FrameworkId
);
define_id!(
    /// Identifies a control within a framework.
    ControlId
);
define_id!(
    /// Identifies a piece of evidence.
    EvidenceId
);
define_id!(
    /// Identifies a risk register entry.
    RiskId
);
define_id!(
    /// Opaque user token. No identity semantics beyond non-emptiness.
    UserId
);
define_id!(
    /// Identifies an external integration that runs automated checks.
    IntegrationId
);
