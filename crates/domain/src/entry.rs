//! Event entry: one competition item submitted to an event.
//!
//! The participant list is a snapshot of ids taken at submission time; it
//! never follows later changes to dancers or rosters.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::contact;
use crate::error::{EodsaError, ValidationError};
use crate::event::Event;
use crate::id::{ContestantId, DancerId, EntryId, EventId, StudioId};
use crate::performance::{ItemStyle, MasteryLevel};
use crate::time::{Timestamp, now};

/// Longest accepted item, in seconds.
pub const MAX_DURATION_SECONDS: u32 = 30 * 60;

/// Who submitted (and pays for) an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Submitter {
    Dancer(DancerId),
    Studio(StudioId),
    Contestant(ContestantId),
}

impl Submitter {
    #[must_use]
    pub fn kind(self) -> &'static str {
        match self {
            Self::Dancer(_) => "dancer",
            Self::Studio(_) => "studio",
            Self::Contestant(_) => "contestant",
        }
    }

    /// The underlying id as a string, for storage.
    #[must_use]
    pub fn id_string(self) -> String {
        match self {
            Self::Dancer(id) => id.to_string(),
            Self::Studio(id) => id.to_string(),
            Self::Contestant(id) => id.to_string(),
        }
    }

    /// Rebuild from a stored `(kind, id)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for an unknown kind or malformed id.
    pub fn from_parts(kind: &str, id: &str) -> Result<Self, ValidationError> {
        match kind {
            "dancer" => DancerId::parse(id).map(Self::Dancer),
            "studio" => StudioId::parse(id).map(Self::Studio),
            "contestant" => ContestantId::parse(id).map(Self::Contestant),
            other => Err(ValidationError::UnknownVariant {
                kind: "submitter",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Waived,
}

impl PaymentStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Waived => "waived",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "waived" => Ok(Self::Waived),
            other => Err(ValidationError::UnknownVariant {
                kind: "payment status",
                value: other.to_string(),
            }),
        }
    }
}

/// Descriptive metadata of the performed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    pub item_name: String,
    pub choreographer: String,
    pub mastery: MasteryLevel,
    pub item_style: ItemStyle,
    pub duration_seconds: u32,
}

impl ItemDetails {
    /// Normalise text fields and check bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for blank text or a duration outside
    /// `1..=MAX_DURATION_SECONDS`.
    pub fn normalised(self) -> Result<Self, ValidationError> {
        if !(1..=MAX_DURATION_SECONDS).contains(&self.duration_seconds) {
            return Err(ValidationError::InvalidDuration {
                max: MAX_DURATION_SECONDS,
            });
        }
        Ok(Self {
            item_name: contact::required("item name", &self.item_name)?,
            choreographer: contact::required("choreographer", &self.choreographer)?,
            ..self
        })
    }
}

/// Reject participant lists that name the same id twice.
///
/// # Errors
///
/// Returns [`ValidationError::DuplicateParticipant`] with the first repeat.
pub fn check_unique_participants(participant_ids: &[String]) -> Result<(), ValidationError> {
    for (idx, id) in participant_ids.iter().enumerate() {
        if participant_ids[..idx].contains(id) {
            return Err(ValidationError::DuplicateParticipant(id.clone()));
        }
    }
    Ok(())
}

/// A recorded competition entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEntry {
    pub id: EntryId,
    pub event_id: EventId,
    pub submitter: Submitter,
    pub participant_ids: Vec<String>,
    #[serde(flatten)]
    pub item: ItemDetails,
    pub calculated_fee: Decimal,
    pub payment_status: PaymentStatus,
    pub approved: bool,
    pub item_number: Option<u32>,
    pub submitted_at: Timestamp,
}

impl EventEntry {
    /// Create an unapproved, unpaid entry for `event`.
    ///
    /// Participant eligibility (approval, roster membership) is resolved by
    /// the caller; this checks the shape of the submission and prices it.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::Validation`] for repeated participants, a count
    /// outside the event's performance-type limits, invalid item details, or
    /// a fee that overflows.
    pub fn new(
        event: &Event,
        submitter: Submitter,
        participant_ids: Vec<String>,
        item: ItemDetails,
    ) -> Result<Self, EodsaError> {
        check_unique_participants(&participant_ids)?;
        event
            .performance_type
            .check_participants(participant_ids.len())?;
        let item = item.normalised()?;
        let calculated_fee = event.fee_for(participant_ids.len())?;
        Ok(Self {
            id: EntryId::new(),
            event_id: event.id,
            submitter,
            calculated_fee,
            participant_ids,
            item,
            payment_status: PaymentStatus::Pending,
            approved: false,
            item_number: None,
            submitted_at: now(),
        })
    }
}

/// Validate an admin-supplied item number.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidItemNumber`] unless `1..=u32::MAX`.
pub fn parse_item_number(raw: i64) -> Result<u32, ValidationError> {
    u32::try_from(raw)
        .ok()
        .filter(|n| *n > 0)
        .ok_or(ValidationError::InvalidItemNumber)
}
