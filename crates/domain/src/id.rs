//! Typed identifier newtypes backed by UUIDs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident, $kind:literal) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the inner UUID.
            #[must_use]
            pub fn as_uuid(self) -> uuid::Uuid {
                self.0
            }

            /// Parse user input, reporting failures as a validation error.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::InvalidId`] if `s` is not a UUID.
            pub fn parse(s: &str) -> Result<Self, ValidationError> {
                Self::from_str(s).map_err(|_| ValidationError::InvalidId {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a [`Dancer`](crate::dancer::Dancer).
    DancerId,
    "dancer"
);

define_id!(
    /// Unique identifier for a [`Studio`](crate::studio::Studio).
    StudioId,
    "studio"
);

define_id!(
    /// Unique identifier for a [`StudioApplication`](crate::application::StudioApplication).
    ApplicationId,
    "application"
);

define_id!(
    /// Unique identifier for an [`Event`](crate::event::Event).
    EventId,
    "event"
);

define_id!(
    /// Unique identifier for an [`EventEntry`](crate::entry::EventEntry).
    EntryId,
    "entry"
);

define_id!(
    /// Unique identifier for a legacy [`Contestant`](crate::contestant::Contestant).
    ContestantId,
    "contestant"
);

define_id!(
    /// Unique identifier for a [`Judge`](crate::judge::Judge).
    JudgeId,
    "judge"
);

define_id!(
    /// Unique identifier for a [`Score`](crate::score::Score).
    ScoreId,
    "score"
);

/// Zero-padded random decimal string of `width` digits.
///
/// Used for human-facing codes (EODSA ids, studio registration numbers).
/// Collisions are possible and are caught by storage uniqueness.
pub(crate) fn random_digits(width: u32) -> String {
    let modulus = 10_u128.pow(width);
    let value = uuid::Uuid::new_v4().as_u128() % modulus;
    format!("{value:0width$}", width = width as usize)
}
