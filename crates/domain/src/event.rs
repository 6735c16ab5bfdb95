//! Event: a competition that entries are submitted to.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::contact;
use crate::error::{EodsaError, ValidationError};
use crate::id::{EventId, JudgeId};
use crate::performance::PerformanceType;
use crate::time::{Timestamp, now};

/// Largest per-dancer entry fee an event may charge.
pub const MAX_ENTRY_FEE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Lifecycle of an event as managed by admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Upcoming,
    RegistrationOpen,
    RegistrationClosed,
    InProgress,
    Completed,
}

impl EventStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::RegistrationOpen => "registration_open",
            Self::RegistrationClosed => "registration_closed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(Self::Upcoming),
            "registration_open" => Ok(Self::RegistrationOpen),
            "registration_closed" => Ok(Self::RegistrationClosed),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(ValidationError::UnknownVariant {
                kind: "event status",
                value: other.to_string(),
            }),
        }
    }
}

/// A competition definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: Option<String>,
    pub region: String,
    pub age_category: String,
    pub performance_type: PerformanceType,
    pub event_date: NaiveDate,
    pub registration_deadline: NaiveDate,
    pub venue: String,
    pub entry_fee: Decimal,
    pub status: EventStatus,
    pub created_by: JudgeId,
    pub created_at: Timestamp,
}

impl Event {
    #[must_use]
    pub fn builder() -> EventBuilder {
        EventBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::Validation`] for blank text fields, a deadline
    /// on or after the event date, or a fee outside `0..=MAX_ENTRY_FEE`.
    pub fn validate(&self) -> Result<(), EodsaError> {
        contact::required("event name", &self.name)?;
        contact::required("region", &self.region)?;
        contact::required("age category", &self.age_category)?;
        contact::required("venue", &self.venue)?;
        if self.registration_deadline >= self.event_date {
            return Err(ValidationError::DeadlineNotBeforeEvent.into());
        }
        if self.entry_fee < Decimal::ZERO {
            return Err(ValidationError::NegativeFee.into());
        }
        if self.entry_fee > MAX_ENTRY_FEE {
            return Err(ValidationError::FeeTooLarge { max: MAX_ENTRY_FEE }.into());
        }
        Ok(())
    }

    /// Whether new entries may be submitted on `on`.
    #[must_use]
    pub fn accepts_entries_on(&self, on: NaiveDate) -> bool {
        self.status == EventStatus::RegistrationOpen && on <= self.registration_deadline
    }

    /// Fee for an entry with `participants` dancers: the event fee per dancer.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::FeeOverflow`] when the product does not fit
    /// a `Decimal`.
    pub fn fee_for(&self, participants: usize) -> Result<Decimal, ValidationError> {
        self.entry_fee
            .checked_mul(Decimal::from(participants))
            .ok_or(ValidationError::FeeOverflow { participants })
    }
}

/// Optional dimensions narrowing event listings and rankings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub region: Option<String>,
    pub age_category: Option<String>,
    pub performance_type: Option<PerformanceType>,
}

impl EventFilter {
    /// Whether `event` falls inside every provided dimension.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        let text_matches = |wanted: &Option<String>, actual: &str| {
            wanted
                .as_deref()
                .is_none_or(|w| w.trim().eq_ignore_ascii_case(actual))
        };
        text_matches(&self.region, &event.region)
            && text_matches(&self.age_category, &event.age_category)
            && self
                .performance_type
                .is_none_or(|t| t == event.performance_type)
    }
}

/// Step-by-step builder for [`Event`].
#[derive(Debug, Default)]
pub struct EventBuilder {
    name: Option<String>,
    description: Option<String>,
    region: Option<String>,
    age_category: Option<String>,
    performance_type: Option<PerformanceType>,
    event_date: Option<NaiveDate>,
    registration_deadline: Option<NaiveDate>,
    venue: Option<String>,
    entry_fee: Option<Decimal>,
    status: Option<EventStatus>,
    created_by: Option<JudgeId>,
}

impl EventBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn age_category(mut self, age_category: impl Into<String>) -> Self {
        self.age_category = Some(age_category.into());
        self
    }

    #[must_use]
    pub fn performance_type(mut self, performance_type: PerformanceType) -> Self {
        self.performance_type = Some(performance_type);
        self
    }

    #[must_use]
    pub fn event_date(mut self, event_date: NaiveDate) -> Self {
        self.event_date = Some(event_date);
        self
    }

    #[must_use]
    pub fn registration_deadline(mut self, deadline: NaiveDate) -> Self {
        self.registration_deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = Some(venue.into());
        self
    }

    #[must_use]
    pub fn entry_fee(mut self, entry_fee: Decimal) -> Self {
        self.entry_fee = Some(entry_fee);
        self
    }

    #[must_use]
    pub fn status(mut self, status: EventStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn created_by(mut self, judge: JudgeId) -> Self {
        self.created_by = Some(judge);
        self
    }

    /// Consume the builder, validate, and return an [`Event`].
    ///
    /// New events open for registration unless a status is given.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] for a missing performance
    /// type, date, or creator, plus everything [`Event::validate`] reports.
    pub fn build(self) -> Result<Event, EodsaError> {
        let event = Event {
            id: EventId::new(),
            name: self.name.unwrap_or_default().trim().to_string(),
            description: contact::optional(self.description),
            region: self.region.unwrap_or_default().trim().to_string(),
            age_category: self.age_category.unwrap_or_default().trim().to_string(),
            performance_type: self.performance_type.ok_or(ValidationError::EmptyField {
                field: "performance type",
            })?,
            event_date: self.event_date.ok_or(ValidationError::EmptyField {
                field: "event date",
            })?,
            registration_deadline: self.registration_deadline.ok_or(
                ValidationError::EmptyField {
                    field: "registration deadline",
                },
            )?,
            venue: self.venue.unwrap_or_default().trim().to_string(),
            entry_fee: self.entry_fee.unwrap_or_default(),
            status: self.status.unwrap_or(EventStatus::RegistrationOpen),
            created_by: self.created_by.ok_or(ValidationError::EmptyField {
                field: "created by",
            })?,
            created_at: now(),
        };
        event.validate()?;
        Ok(event)
    }
}
