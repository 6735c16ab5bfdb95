//! Auth service: sign-in, session verification and password resets.
//!
//! Dancers sign in with their EODSA id and national id. Studios and judges
//! use email and password, and only they can reset a password.

use eodsa_domain::credential::{CredentialAccount, PasswordReset, check_password};
use eodsa_domain::dancer::{Dancer, EodsaId};
use eodsa_domain::error::{AuthError, EodsaError, NotFoundError, ValidationError};
use eodsa_domain::judge::Judge;
use eodsa_domain::session::Principal;
use eodsa_domain::studio::Studio;
use eodsa_domain::time::now;

use crate::ports::{
    Backend, DancerRepository, Email, JudgeRepository, PasswordHasher, PasswordResetRepository,
    Ports, SessionTokens, StudioRepository,
};
use crate::services::notify;

/// A signed token together with the account it was issued for.
#[derive(Debug, Clone)]
pub struct Session<T> {
    pub token: String,
    pub account: T,
}

pub struct AuthService<B: Backend> {
    dancers: B::Dancers,
    studios: B::Studios,
    judges: B::Judges,
    resets: B::Resets,
    hasher: B::Hasher,
    tokens: B::Tokens,
    mailer: B::Mailer,
}

impl<B: Backend> AuthService<B> {
    pub fn new(ports: &Ports<B>) -> Self {
        Self {
            dancers: ports.dancers.clone(),
            studios: ports.studios.clone(),
            judges: ports.judges.clone(),
            resets: ports.resets.clone(),
            hasher: ports.hasher.clone(),
            tokens: ports.tokens.clone(),
            mailer: ports.mailer.clone(),
        }
    }

    /// Sign a dancer in.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::NotFound`] for an unknown EODSA id and
    /// [`AuthError::InvalidCredentials`] when the national id does not match.
    pub async fn login_dancer(
        &self,
        eodsa_id: &str,
        national_id: &str,
    ) -> Result<Session<Dancer>, EodsaError> {
        let eodsa_id = EodsaId::from_raw(eodsa_id);
        let dancer = self
            .dancers
            .get_by_eodsa_id(&eodsa_id)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "Dancer",
                id: eodsa_id.to_string(),
            })?;
        if dancer.national_id != national_id.trim() {
            tracing::info!(%eodsa_id, "dancer sign-in with mismatched national id");
            return Err(AuthError::InvalidCredentials.into());
        }
        let token = self.tokens.issue(Principal::Dancer { id: dancer.id })?;
        Ok(Session {
            token,
            account: dancer,
        })
    }

    /// Sign a studio in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown email or a
    /// wrong password.
    pub async fn login_studio(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session<Studio>, EodsaError> {
        let studio = self
            .studios
            .get_by_email(&normalise(email))
            .await?
            .filter(|s| self.hasher.verify(password, &s.password_hash))
            .ok_or(AuthError::InvalidCredentials)?;
        let token = self.tokens.issue(Principal::Studio { id: studio.id })?;
        Ok(Session {
            token,
            account: studio,
        })
    }

    /// Sign a judge (or admin) in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown email or a
    /// wrong password.
    pub async fn login_judge(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session<Judge>, EodsaError> {
        let judge = self
            .judges
            .get_by_email(&normalise(email))
            .await?
            .filter(|j| self.hasher.verify(password, &j.password_hash))
            .ok_or(AuthError::InvalidCredentials)?;
        let token = self.tokens.issue(Principal::Judge {
            id: judge.id,
            admin: judge.is_admin,
        })?;
        Ok(Session {
            token,
            account: judge,
        })
    }

    /// Resolve a bearer token into the caller's identity.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::Unauthorized`] for a bad or expired token.
    pub fn authenticate(&self, token: &str) -> Result<Principal, EodsaError> {
        self.tokens.verify(token)
    }

    /// Email a reset link to the studio or judge registered under `email`.
    ///
    /// Unknown addresses succeed silently so callers cannot probe which
    /// accounts exist.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repositories.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), EodsaError> {
        let email = normalise(email);
        let account = if let Some(studio) = self.studios.get_by_email(&email).await? {
            CredentialAccount::Studio(studio.id)
        } else if let Some(judge) = self.judges.get_by_email(&email).await? {
            CredentialAccount::Judge(judge.id)
        } else {
            tracing::debug!("password reset requested for unknown email");
            return Ok(());
        };

        let reset = self.resets.create(PasswordReset::issue(account, now())).await?;
        tracing::info!(account = ?reset.account, "password reset issued");
        notify(
            &self.mailer,
            Email {
                to: email,
                subject: "Reset your EODSA password".to_string(),
                body: format!(
                    "Use this code to choose a new password: {}\nIt expires at {}.",
                    reset.token, reset.expires_at
                ),
            },
        )
        .await;
        Ok(())
    }

    /// Redeem a reset token and set a new password.
    ///
    /// The token is claimed before the password changes, so concurrent
    /// redemptions of one token cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::WeakPassword`] for a short password and
    /// [`ValidationError::InvalidResetToken`] for an unknown, used or expired
    /// token.
    pub async fn confirm_password_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), EodsaError> {
        check_password(new_password)?;
        let at = now();
        let reset = self
            .resets
            .get(token.trim())
            .await?
            .filter(|r| r.is_redeemable(at))
            .ok_or(ValidationError::InvalidResetToken)?;
        let password_hash = self.hasher.hash(new_password)?;
        if !self.resets.mark_used(&reset.token, at).await? {
            return Err(ValidationError::InvalidResetToken.into());
        }

        match reset.account {
            CredentialAccount::Studio(id) => {
                let mut studio = self
                    .studios
                    .get_by_id(id)
                    .await?
                    .ok_or(ValidationError::InvalidResetToken)?;
                studio.password_hash = password_hash;
                self.studios.update(studio).await?;
            }
            CredentialAccount::Judge(id) => {
                let mut judge = self
                    .judges
                    .get_by_id(id)
                    .await?
                    .ok_or(ValidationError::InvalidResetToken)?;
                judge.password_hash = password_hash;
                self.judges.update(judge).await?;
            }
        }
        tracing::info!(account = ?reset.account, "password reset completed");
        Ok(())
    }
}

fn normalise(email: &str) -> String {
    email.trim().to_lowercase()
}
