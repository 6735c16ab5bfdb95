//! Contestant: legacy registration record that owns its own dancer roster.
//!
//! Before individual dancer accounts existed, a contestant (usually a parent
//! or small school) registered with an embedded list of dancers. Entries
//! submitted for a contestant may still name those roster dancers directly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::contact;
use crate::error::{EodsaError, ValidationError};
use crate::id::ContestantId;
use crate::time::{Timestamp, now};

/// A dancer listed on a legacy contestant's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterDancer {
    pub id: String,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contestant {
    pub id: ContestantId,
    pub name: String,
    pub email: Option<String>,
    pub roster: Vec<RosterDancer>,
    pub created_at: Timestamp,
}

impl Contestant {
    /// Create a contestant after validating the roster.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::Validation`] when the name is blank, the email
    /// is malformed, the roster is empty, or a roster id repeats.
    pub fn new(
        name: &str,
        email: Option<String>,
        roster: Vec<RosterDancer>,
    ) -> Result<Self, EodsaError> {
        let name = contact::required("contestant name", name)?;
        let email = contact::optional(email)
            .map(|e| contact::email("email", &e))
            .transpose()?;
        if roster.is_empty() {
            return Err(ValidationError::EmptyField { field: "roster" }.into());
        }
        let mut roster_out: Vec<RosterDancer> = Vec::with_capacity(roster.len());
        for dancer in roster {
            let id = contact::required("roster dancer id", &dancer.id)?;
            let name = contact::required("roster dancer name", &dancer.name)?;
            if roster_out.iter().any(|d| d.id == id) {
                return Err(ValidationError::DuplicateParticipant(id).into());
            }
            roster_out.push(RosterDancer {
                id,
                name,
                date_of_birth: dancer.date_of_birth,
            });
        }
        Ok(Self {
            id: ContestantId::new(),
            name,
            email,
            roster: roster_out,
            created_at: now(),
        })
    }

    /// Whether `participant_id` appears on the roster.
    #[must_use]
    pub fn has_on_roster(&self, participant_id: &str) -> bool {
        self.roster.iter().any(|d| d.id == participant_id)
    }
}
