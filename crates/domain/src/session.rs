//! Session: the verified identity behind an authenticated request.

use serde::{Deserialize, Serialize};

use crate::error::{EodsaError, ForbiddenError};
use crate::id::{DancerId, JudgeId, StudioId};
use crate::time::Timestamp;

/// Who is calling, as proven by a signed session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Principal {
    Dancer { id: DancerId },
    Studio { id: StudioId },
    Judge { id: JudgeId, admin: bool },
}

impl Principal {
    /// Require a dancer session.
    ///
    /// # Errors
    ///
    /// Returns [`ForbiddenError::RoleRequired`] for any other role.
    pub fn dancer(self) -> Result<DancerId, EodsaError> {
        match self {
            Self::Dancer { id } => Ok(id),
            _ => Err(ForbiddenError::RoleRequired { role: "dancer" }.into()),
        }
    }

    /// Require a studio session.
    ///
    /// # Errors
    ///
    /// Returns [`ForbiddenError::RoleRequired`] for any other role.
    pub fn studio(self) -> Result<StudioId, EodsaError> {
        match self {
            Self::Studio { id } => Ok(id),
            _ => Err(ForbiddenError::RoleRequired { role: "studio" }.into()),
        }
    }

    /// Require a judge session (admins are judges too).
    ///
    /// # Errors
    ///
    /// Returns [`ForbiddenError::RoleRequired`] for any other role.
    pub fn judge(self) -> Result<JudgeId, EodsaError> {
        match self {
            Self::Judge { id, .. } => Ok(id),
            _ => Err(ForbiddenError::RoleRequired { role: "judge" }.into()),
        }
    }

    /// Require an admin session.
    ///
    /// # Errors
    ///
    /// Returns [`ForbiddenError::RoleRequired`] unless an admin judge.
    pub fn admin(self) -> Result<JudgeId, EodsaError> {
        match self {
            Self::Judge { id, admin: true } => Ok(id),
            _ => Err(ForbiddenError::RoleRequired { role: "admin" }.into()),
        }
    }
}

/// Payload carried inside a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub principal: Principal,
    pub expires_at: Timestamp,
}
