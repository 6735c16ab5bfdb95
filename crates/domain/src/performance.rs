//! Performance categories: type (participant bounds), mastery level, style.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// How many dancers perform together in one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerformanceType {
    Solo,
    Duet,
    Trio,
    Group,
}

impl PerformanceType {
    pub const ALL: [Self; 4] = [Self::Solo, Self::Duet, Self::Trio, Self::Group];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solo => "Solo",
            Self::Duet => "Duet",
            Self::Trio => "Trio",
            Self::Group => "Group",
        }
    }

    /// Allowed participant count, inclusive on both ends.
    #[must_use]
    pub fn participant_limits(self) -> RangeInclusive<usize> {
        match self {
            Self::Solo => 1..=1,
            Self::Duet => 2..=2,
            Self::Trio => 3..=3,
            Self::Group => 4..=30,
        }
    }

    /// Check `count` against [`participant_limits`](Self::participant_limits).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ParticipantCount`] when out of range.
    pub fn check_participants(self, count: usize) -> Result<(), ValidationError> {
        let limits = self.participant_limits();
        if limits.contains(&count) {
            Ok(())
        } else {
            Err(ValidationError::ParticipantCount {
                performance_type: self,
                min: *limits.start(),
                max: *limits.end(),
                actual: count,
            })
        }
    }
}

impl fmt::Display for PerformanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PerformanceType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownVariant {
                kind: "performance type",
                value: s.to_string(),
            })
    }
}

/// Competitive level the item is entered at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryLevel {
    Beginner,
    Intermediate,
    Advanced,
    Open,
}

impl MasteryLevel {
    pub const ALL: [Self; 4] = [
        Self::Beginner,
        Self::Intermediate,
        Self::Advanced,
        Self::Open,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Open => "open",
        }
    }
}

impl FromStr for MasteryLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownVariant {
                kind: "mastery level",
                value: s.to_string(),
            })
    }
}

/// Dance style of the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStyle {
    Ballet,
    Contemporary,
    Jazz,
    Lyrical,
    HipHop,
    Tap,
    MusicalTheatre,
    Acrobatic,
    Traditional,
    Commercial,
}

impl ItemStyle {
    pub const ALL: [Self; 10] = [
        Self::Ballet,
        Self::Contemporary,
        Self::Jazz,
        Self::Lyrical,
        Self::HipHop,
        Self::Tap,
        Self::MusicalTheatre,
        Self::Acrobatic,
        Self::Traditional,
        Self::Commercial,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ballet => "ballet",
            Self::Contemporary => "contemporary",
            Self::Jazz => "jazz",
            Self::Lyrical => "lyrical",
            Self::HipHop => "hip_hop",
            Self::Tap => "tap",
            Self::MusicalTheatre => "musical_theatre",
            Self::Acrobatic => "acrobatic",
            Self::Traditional => "traditional",
            Self::Commercial => "commercial",
        }
    }
}

impl FromStr for ItemStyle {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownVariant {
                kind: "item style",
                value: s.to_string(),
            })
    }
}
