// evidence.rs - Evidence artifacts attached to controls.
//
// Evidence is immutable once created. Its status is never stored: it is
// derived on every read from the expiry date and, for automated checks,
// the last check result. Expiry always wins.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use grc_shared::{
    ControlId, ErrorCode, EvidenceId, IntegrationId, Url, UserId, Validated, Validator,
};

use crate::label::{format_timestamp, Label, LabelLocale};

/// Accepted document formats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileType {
    Pdf,
    Docx,
    Xlsx,
    Png,
    Jpg,
}

impl FileType {
    pub const ALL: [FileType; 5] = [
        FileType::Pdf,
        FileType::Docx,
        FileType::Xlsx,
        FileType::Png,
        FileType::Jpg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Pdf => "PDF",
            FileType::Docx => "DOCX",
            FileType::Xlsx => "XLSX",
            FileType::Png => "PNG",
            FileType::Jpg => "JPG",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the most recent automated check run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CheckResult {
    Passed,
    Failed { reason: String },
    Skipped { reason: String },
}

impl CheckResult {
    pub fn is_passed(&self) -> bool {
        matches!(self, CheckResult::Passed)
    }
}

impl Label for CheckResult {
    // Check results were never localized; every locale gets the English text.
    fn label(&self, _locale: LabelLocale) -> String {
        match self {
            CheckResult::Passed => "Passed".to_string(),
            CheckResult::Failed { reason } => format!("Failed: {reason}"),
            CheckResult::Skipped { reason } => format!("Skipped: {reason}"),
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label(LabelLocale::English))
    }
}

/// What kind of artifact the evidence is, with the data specific to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EvidenceType {
    Document {
        file_url: Url,
        file_type: FileType,
    },
    Screenshot {
        image_url: Url,
        captured_at: DateTime<Utc>,
    },
    /// Produced by an integration (cloud scanner, CI job, ...).
    AutomatedCheck {
        integration_id: IntegrationId,
        check_name: String,
        last_run_at: DateTime<Utc>,
        result: CheckResult,
    },
    ManualReview {
        reviewer_id: UserId,
        reviewed_at: DateTime<Utc>,
        notes: String,
    },
}

impl EvidenceType {
    pub fn name(&self) -> &'static str {
        match self {
            EvidenceType::Document { .. } => "document",
            EvidenceType::Screenshot { .. } => "screenshot",
            EvidenceType::AutomatedCheck { .. } => "automated_check",
            EvidenceType::ManualReview { .. } => "manual_review",
        }
    }
}

impl Label for EvidenceType {
    fn label(&self, locale: LabelLocale) -> String {
        match (locale, self) {
            (LabelLocale::English, EvidenceType::Document { file_type, .. }) => {
                format!("Document ({file_type})")
            }
            (LabelLocale::English, EvidenceType::Screenshot { captured_at, .. }) => {
                format!("Screenshot (captured at {})", format_timestamp(captured_at))
            }
            (
                LabelLocale::English,
                EvidenceType::AutomatedCheck {
                    check_name,
                    result,
                    ..
                },
            ) => format!("Automated Check: {check_name} ({result})"),
            (LabelLocale::English, EvidenceType::ManualReview { reviewed_at, .. }) => {
                let at = format_timestamp(reviewed_at);
                format!("Manual Review (reviewed at {at})")
            }
            (LabelLocale::Japanese, EvidenceType::Document { file_type, .. }) => {
                format!("ドキュメント ({file_type})")
            }
            (LabelLocale::Japanese, EvidenceType::Screenshot { captured_at, .. }) => {
                format!("スクリーンショット ({})", format_timestamp(captured_at))
            }
            (
                LabelLocale::Japanese,
                EvidenceType::AutomatedCheck {
                    check_name,
                    result,
                    ..
                },
            ) => format!("自動チェック: {check_name} ({result})"),
            (LabelLocale::Japanese, EvidenceType::ManualReview { reviewed_at, .. }) => {
                format!("手動レビュー ({})", format_timestamp(reviewed_at))
            }
        }
    }
}

impl fmt::Display for EvidenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label(LabelLocale::English))
    }
}

/// Derived standing of a piece of evidence at a given instant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EvidenceStatus {
    Valid,
    Expired,
    Pending,
    Rejected,
}

impl EvidenceStatus {
    pub const ALL: [EvidenceStatus; 4] = [
        EvidenceStatus::Valid,
        EvidenceStatus::Expired,
        EvidenceStatus::Pending,
        EvidenceStatus::Rejected,
    ];
}

impl Label for EvidenceStatus {
    fn label(&self, _locale: LabelLocale) -> String {
        match self {
            EvidenceStatus::Valid => "Valid",
            EvidenceStatus::Expired => "Expired",
            EvidenceStatus::Pending => "Pending",
            EvidenceStatus::Rejected => "Rejected",
        }
        .to_string()
    }
}

impl fmt::Display for EvidenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label(LabelLocale::English))
    }
}

/// Input for [`Evidence::create`].
#[derive(Debug, Clone)]
pub struct NewEvidence {
    pub id: String,
    pub control_id: ControlId,
    pub evidence_type: EvidenceType,
    pub collected_at: DateTime<Utc>,
    /// `None` means the evidence never expires.
    pub expires_at: Option<DateTime<Utc>>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Evidence {
    id: EvidenceId,
    control_id: ControlId,
    evidence_type: EvidenceType,
    collected_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    description: String,
}

impl Evidence {
    /// Validate the input as of `now`.
    ///
    /// `expires_at` must be strictly after `now`; `collected_at` may equal
    /// `now` but not be after it.
    pub fn create(input: NewEvidence, now: DateTime<Utc>) -> Validated<Self> {
        let id = EvidenceId::new(input.id);

        let mut validator = Validator::new();
        validator.record(&id);
        validator.check(
            !input.expires_at.is_some_and(|expires_at| expires_at <= now),
            "expires_at",
            "Expiration date must be in the future",
            ErrorCode::InvalidExpiration,
        );
        validator.check(
            input.collected_at <= now,
            "collected_at",
            "Collection date cannot be in the future",
            ErrorCode::InvalidCollectionDate,
        );
        validator.finish()?;

        Ok(Self {
            id: id?,
            control_id: input.control_id,
            evidence_type: input.evidence_type,
            collected_at: input.collected_at,
            expires_at: input.expires_at,
            description: input.description,
        })
    }

    pub fn id(&self) -> &EvidenceId {
        &self.id
    }

    pub fn control_id(&self) -> &ControlId {
        &self.control_id
    }

    pub fn evidence_type(&self) -> &EvidenceType {
        &self.evidence_type
    }

    pub fn collected_at(&self) -> DateTime<Utc> {
        self.collected_at
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// True once `now` is past the expiry date. Evidence without an expiry
    /// never expires.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }

    /// Current standing of this evidence as of `now`.
    pub fn status(&self, now: DateTime<Utc>) -> EvidenceStatus {
        if self.is_expired(now) {
            return EvidenceStatus::Expired;
        }
        match &self.evidence_type {
            EvidenceType::AutomatedCheck { result, .. } => match result {
                CheckResult::Passed => EvidenceStatus::Valid,
                CheckResult::Failed { .. } => EvidenceStatus::Rejected,
                CheckResult::Skipped { .. } => EvidenceStatus::Pending,
            },
            EvidenceType::Document { .. }
            | EvidenceType::Screenshot { .. }
            | EvidenceType::ManualReview { .. } => EvidenceStatus::Valid,
        }
    }
}
