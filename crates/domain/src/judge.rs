//! Judge: scores performances; admins are judges with elevated rights.

use serde::{Deserialize, Serialize};

use crate::contact;
use crate::error::EodsaError;
use crate::id::JudgeId;
use crate::time::{Timestamp, now};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Judge {
    pub id: JudgeId,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: Timestamp,
}

impl Judge {
    /// Create a judge account from an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::Validation`] for a blank name or bad email.
    pub fn new(
        name: &str,
        email: &str,
        password_hash: String,
        is_admin: bool,
    ) -> Result<Self, EodsaError> {
        Ok(Self {
            id: JudgeId::new(),
            name: contact::required("name", name)?,
            email: contact::email("email", email)?,
            password_hash,
            is_admin,
            created_at: now(),
        })
    }
}
