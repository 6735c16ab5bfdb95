//! Score: one judge's evaluation of one performance (entry).

use serde::{Deserialize, Serialize};

use crate::contact;
use crate::error::ValidationError;
use crate::id::{EntryId, JudgeId, ScoreId};
use crate::time::{Timestamp, now};

pub const MIN_MARK: u8 = 1;
pub const MAX_MARK: u8 = 10;

/// The four criteria marks, each in `MIN_MARK..=MAX_MARK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marks {
    pub technique: u8,
    pub artistry: u8,
    pub presentation: u8,
    pub overall: u8,
}

impl Marks {
    /// Build from raw (possibly out-of-range) input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ScoreOutOfRange`] for the first criterion
    /// outside `1..=10`.
    pub fn new(
        technique: i64,
        artistry: i64,
        presentation: i64,
        overall: i64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            technique: mark("technique", technique)?,
            artistry: mark("artistry", artistry)?,
            presentation: mark("presentation", presentation)?,
            overall: mark("overall", overall)?,
        })
    }

    /// Sum of all four criteria (4..=40).
    #[must_use]
    pub fn total(self) -> u32 {
        u32::from(self.technique)
            + u32::from(self.artistry)
            + u32::from(self.presentation)
            + u32::from(self.overall)
    }
}

fn mark(criterion: &'static str, value: i64) -> Result<u8, ValidationError> {
    u8::try_from(value)
        .ok()
        .filter(|v| (MIN_MARK..=MAX_MARK).contains(v))
        .ok_or(ValidationError::ScoreOutOfRange { criterion, value })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub id: ScoreId,
    pub judge_id: JudgeId,
    pub entry_id: EntryId,
    #[serde(flatten)]
    pub marks: Marks,
    pub comments: Option<String>,
    pub submitted_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Score {
    #[must_use]
    pub fn new(judge_id: JudgeId, entry_id: EntryId, marks: Marks, comments: Option<String>) -> Self {
        let ts = now();
        Self {
            id: ScoreId::new(),
            judge_id,
            entry_id,
            marks,
            comments: contact::optional(comments),
            submitted_at: ts,
            updated_at: ts,
        }
    }

    /// Replace the marks in place, keeping identity and first submission time.
    pub fn revise(&mut self, marks: Marks, comments: Option<String>, at: Timestamp) {
        self.marks = marks;
        self.comments = contact::optional(comments);
        self.updated_at = at;
    }
}
