//! Credentials: password rules and the password-reset workflow.
//!
//! Only studios and judges hold passwords; dancers sign in with their EODSA
//! id and national id. The account behind a reset is resolved once, at
//! lookup time, into [`CredentialAccount`].

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{JudgeId, StudioId};
use crate::time::Timestamp;

pub const MIN_PASSWORD_LEN: usize = 8;

/// How long a password-reset token stays valid, in minutes.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

/// Check a plaintext password before hashing.
///
/// # Errors
///
/// Returns [`ValidationError::WeakPassword`] below [`MIN_PASSWORD_LEN`]
/// characters.
pub fn check_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::WeakPassword {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// An account that authenticates with a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CredentialAccount {
    Studio(StudioId),
    Judge(JudgeId),
}

/// A pending password reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordReset {
    pub token: String,
    pub account: CredentialAccount,
    pub expires_at: Timestamp,
    pub used_at: Option<Timestamp>,
}

impl PasswordReset {
    /// Issue a fresh single-use token for `account`, valid from `at`.
    #[must_use]
    pub fn issue(account: CredentialAccount, at: Timestamp) -> Self {
        let token = format!(
            "{}{}",
            uuid::Uuid::new_v4().simple(),
            uuid::Uuid::new_v4().simple()
        );
        Self {
            token,
            account,
            expires_at: at + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
            used_at: None,
        }
    }

    /// Whether the token may still be redeemed at `at`.
    #[must_use]
    pub fn is_redeemable(&self, at: Timestamp) -> bool {
        self.used_at.is_none() && at < self.expires_at
    }
}
