//! Approval: the tri-state admin gate shared by dancers and studios.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::JudgeId;
use crate::time::Timestamp;

/// Admin approval state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    /// Stable lowercase name used in storage and query strings.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(ValidationError::UnknownVariant {
                kind: "approval status",
                value: other.to_string(),
            }),
        }
    }
}

/// An admin's verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject { reason: String },
}

impl Decision {
    /// Build a decision from an `approve` / `reject` action string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownVariant`] for any other action and
    /// [`ValidationError::RejectionReasonRequired`] when rejecting without a
    /// non-blank reason.
    pub fn from_action(action: &str, reason: Option<String>) -> Result<Self, ValidationError> {
        match action {
            "approve" => Ok(Self::Approve),
            "reject" => {
                let reason = reason
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty())
                    .ok_or(ValidationError::RejectionReasonRequired)?;
                Ok(Self::Reject { reason })
            }
            other => Err(ValidationError::UnknownVariant {
                kind: "action",
                value: other.to_string(),
            }),
        }
    }

    /// The status this decision leads to.
    #[must_use]
    pub fn status(&self) -> ApprovalStatus {
        match self {
            Self::Approve => ApprovalStatus::Approved,
            Self::Reject { .. } => ApprovalStatus::Rejected,
        }
    }
}

/// Approval state plus the audit trail of the last decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub status: ApprovalStatus,
    pub rejection_reason: Option<String>,
    pub decided_by: Option<JudgeId>,
    pub decided_at: Option<Timestamp>,
}

impl Approval {
    /// Awaiting an admin decision.
    #[must_use]
    pub fn pending() -> Self {
        Self {
            status: ApprovalStatus::Pending,
            rejection_reason: None,
            decided_by: None,
            decided_at: None,
        }
    }

    /// Approved without an admin decision (used for studios at creation).
    #[must_use]
    pub fn auto_approved(at: Timestamp) -> Self {
        Self {
            status: ApprovalStatus::Approved,
            rejection_reason: None,
            decided_by: None,
            decided_at: Some(at),
        }
    }

    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.status == ApprovalStatus::Approved
    }

    /// Record a decision, returning the status it replaced.
    ///
    /// Re-deciding is allowed and overwrites the previous verdict.
    pub fn decide(&mut self, decision: Decision, by: JudgeId, at: Timestamp) -> ApprovalStatus {
        let previous = self.status;
        self.status = decision.status();
        self.rejection_reason = match decision {
            Decision::Approve => None,
            Decision::Reject { reason } => Some(reason),
        };
        self.decided_by = Some(by);
        self.decided_at = Some(at);
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    #[test]
    fn should_require_reason_when_rejecting() {
        assert_eq!(
            Decision::from_action("reject", Some("   ".to_string())),
            Err(ValidationError::RejectionReasonRequired)
        );
        assert_eq!(
            Decision::from_action("reject", None),
            Err(ValidationError::RejectionReasonRequired)
        );
    }

    #[test]
    fn should_trim_rejection_reason() {
        let decision = Decision::from_action("reject", Some(" incomplete ".to_string())).unwrap();
        assert_eq!(
            decision,
            Decision::Reject {
                reason: "incomplete".to_string()
            }
        );
    }

    #[test]
    fn should_reject_unknown_action() {
        assert!(matches!(
            Decision::from_action("ban", None),
            Err(ValidationError::UnknownVariant { kind: "action", .. })
        ));
    }

    #[test]
    fn should_clear_reason_when_approving_after_rejection() {
        let judge = JudgeId::new();
        let mut approval = Approval::pending();
        approval.decide(
            Decision::Reject {
                reason: "blurry id".to_string(),
            },
            judge,
            now(),
        );
        let previous = approval.decide(Decision::Approve, judge, now());

        assert_eq!(previous, ApprovalStatus::Rejected);
        assert!(approval.is_approved());
        assert!(approval.rejection_reason.is_none());
        assert_eq!(approval.decided_by, Some(judge));
    }

    #[test]
    fn should_parse_status_from_str() {
        assert_eq!("approved".parse(), Ok(ApprovalStatus::Approved));
        assert!("maybe".parse::<ApprovalStatus>().is_err());
    }
}
