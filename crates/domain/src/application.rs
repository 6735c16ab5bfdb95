//! Studio application: a dancer's request to affiliate with a studio.
//!
//! ```text
//! pending ──accept──▶ accepted
//!    │ └────reject──▶ rejected
//!    └──────withdraw─▶ withdrawn
//! ```
//!
//! Accepted, rejected and withdrawn are terminal. A dancer holds at most one
//! *open* (pending or accepted) application per studio.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{ApplicationId, DancerId, StudioId};
use crate::time::{Timestamp, now};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether an application in this state blocks a new one for the pair.
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::Accepted)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "withdrawn" => Ok(Self::Withdrawn),
            other => Err(ValidationError::UnknownVariant {
                kind: "application status",
                value: other.to_string(),
            }),
        }
    }
}

/// A dancer → studio affiliation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioApplication {
    pub id: ApplicationId,
    pub dancer_id: DancerId,
    pub studio_id: StudioId,
    pub status: ApplicationStatus,
    pub applied_at: Timestamp,
    pub responded_at: Option<Timestamp>,
    pub rejection_reason: Option<String>,
}

impl StudioApplication {
    /// Open a new pending application.
    #[must_use]
    pub fn new(dancer_id: DancerId, studio_id: StudioId) -> Self {
        Self {
            id: ApplicationId::new(),
            dancer_id,
            studio_id,
            status: ApplicationStatus::Pending,
            applied_at: now(),
            responded_at: None,
            rejection_reason: None,
        }
    }

    /// Studio accepts the dancer.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTransition`] unless pending.
    pub fn accept(&mut self, at: Timestamp) -> Result<(), ValidationError> {
        self.transition(ApplicationStatus::Accepted, at)
    }

    /// Studio turns the dancer down; a non-blank reason is mandatory.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::RejectionReasonRequired`] for a blank
    /// reason, or [`ValidationError::InvalidTransition`] unless pending.
    pub fn reject(&mut self, reason: &str, at: Timestamp) -> Result<(), ValidationError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ValidationError::RejectionReasonRequired);
        }
        self.transition(ApplicationStatus::Rejected, at)?;
        self.rejection_reason = Some(reason.to_string());
        Ok(())
    }

    /// Dancer takes the application back.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTransition`] unless pending.
    pub fn withdraw(&mut self, at: Timestamp) -> Result<(), ValidationError> {
        self.transition(ApplicationStatus::Withdrawn, at)
    }

    /// Apply a studio [`Response`].
    ///
    /// # Errors
    ///
    /// Same as [`accept`](Self::accept) and [`reject`](Self::reject).
    pub fn respond(&mut self, response: Response, at: Timestamp) -> Result<(), ValidationError> {
        match response {
            Response::Accept => self.accept(at),
            Response::Reject { reason } => self.reject(&reason, at),
        }
    }

    fn transition(&mut self, to: ApplicationStatus, at: Timestamp) -> Result<(), ValidationError> {
        if self.status.is_terminal() {
            return Err(ValidationError::InvalidTransition {
                entity: "application",
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.status = to;
        self.responded_at = Some(at);
        Ok(())
    }
}

/// A studio's answer to a pending application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Accept,
    Reject { reason: String },
}

impl Response {
    /// Parse an `accept` / `reject` action.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownVariant`] for any other action and
    /// [`ValidationError::RejectionReasonRequired`] when rejecting without a
    /// reason.
    pub fn from_action(action: &str, reason: Option<String>) -> Result<Self, ValidationError> {
        match action {
            "accept" | "approve" => Ok(Self::Accept),
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
}
