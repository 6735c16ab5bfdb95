//! Judge service: judge and admin accounts.

use eodsa_domain::credential::check_password;
use eodsa_domain::error::{EodsaError, NotFoundError};
use eodsa_domain::id::JudgeId;
use eodsa_domain::judge::Judge;

use crate::ports::{Backend, JudgeRepository, PasswordHasher, Ports};

pub struct JudgeService<B: Backend> {
    judges: B::Judges,
    hasher: B::Hasher,
}

impl<B: Backend> JudgeService<B> {
    pub fn new(ports: &Ports<B>) -> Self {
        Self {
            judges: ports.judges.clone(),
            hasher: ports.hasher.clone(),
        }
    }

    /// Create a judge (or admin) account.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::Validation`] for a blank name, bad email or weak
    /// password and [`EodsaError::Conflict`] for a taken email.
    pub async fn create_judge(
        &self,
        name: &str,
        email: &str,
        password: &str,
        is_admin: bool,
    ) -> Result<Judge, EodsaError> {
        check_password(password)?;
        let judge = Judge::new(name, email, self.hasher.hash(password)?, is_admin)?;
        let judge = self.judges.create(judge).await?;
        tracing::info!(judge_id = %judge.id, is_admin, "judge account created");
        Ok(judge)
    }

    /// Make sure an admin account exists for `email`.
    ///
    /// Existing accounts are left untouched, so restarting never resets a
    /// password that was changed after bootstrap.
    ///
    /// # Errors
    ///
    /// Same as [`create_judge`](Self::create_judge).
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<Judge, EodsaError> {
        let normalised = email.trim().to_lowercase();
        if let Some(existing) = self.judges.get_by_email(&normalised).await? {
            if !existing.is_admin {
                tracing::warn!(judge_id = %existing.id, "bootstrap email belongs to a non-admin judge");
            }
            return Ok(existing);
        }
        self.create_judge("Administrator", &normalised, password, true)
            .await
    }

    /// Look up a judge by id.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::NotFound`] when no judge with `id` exists.
    pub async fn get_judge(&self, id: JudgeId) -> Result<Judge, EodsaError> {
        self.judges.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Judge",
                id: id.to_string(),
            }
            .into()
        })
    }
}
