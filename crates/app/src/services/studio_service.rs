//! Studio service: registration and approval.

use eodsa_domain::approval::{ApprovalStatus, Decision};
use eodsa_domain::credential::check_password;
use eodsa_domain::error::{EodsaError, NotFoundError};
use eodsa_domain::id::{JudgeId, StudioId};
use eodsa_domain::studio::{RegistrationNumber, Studio};
use eodsa_domain::time::now;

use crate::ports::{Backend, Email, PasswordHasher, Ports, StudioRepository};
use crate::services::{notify, retry_on_duplicate};

/// Fields submitted on the studio registration form.
#[derive(Debug, Clone, Default)]
pub struct StudioRegistration {
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub password: String,
}

/// Application service for studios.
pub struct StudioService<B: Backend> {
    studios: B::Studios,
    hasher: B::Hasher,
    mailer: B::Mailer,
}

impl<B: Backend> StudioService<B> {
    pub fn new(ports: &Ports<B>) -> Self {
        Self {
            studios: ports.studios.clone(),
            hasher: ports.hasher.clone(),
            mailer: ports.mailer.clone(),
        }
    }

    /// Register a studio. Studios are approved on creation.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::Validation`] for blank fields, a bad email or a
    /// weak password, and [`EodsaError::Conflict`] for a taken email.
    pub async fn register(&self, form: StudioRegistration) -> Result<Studio, EodsaError> {
        check_password(&form.password)?;
        let password_hash = self.hasher.hash(&form.password)?;
        let studio = Studio::builder()
            .name(form.name)
            .contact_person(form.contact_person)
            .email(form.email)
            .phone(form.phone)
            .address(form.address)
            .password_hash(password_hash)
            .build()?;

        let studio = retry_on_duplicate("studio", "registration number", || {
            let mut candidate = studio.clone();
            candidate.registration_number = RegistrationNumber::generate();
            self.studios.create(candidate)
        })
        .await?;
        tracing::info!(
            studio_id = %studio.id,
            registration_number = %studio.registration_number,
            "studio registered"
        );

        notify(
            &self.mailer,
            Email {
                to: studio.email.clone(),
                subject: "EODSA studio registration".to_string(),
                body: format!(
                    "Welcome {}. Your studio registration number is {}.",
                    studio.name, studio.registration_number
                ),
            },
        )
        .await;
        Ok(studio)
    }

    /// Look up a studio by id.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::NotFound`] when no studio with `id` exists.
    pub async fn get_studio(&self, id: StudioId) -> Result<Studio, EodsaError> {
        self.studios.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Studio",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List studios, optionally filtered by approval status.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_studios(
        &self,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<Studio>, EodsaError> {
        self.studios.list(status).await
    }

    /// Record an admin decision on a studio. Re-deciding overwrites.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::NotFound`] when the studio does not exist.
    pub async fn decide(
        &self,
        id: StudioId,
        decision: Decision,
        admin: JudgeId,
    ) -> Result<Studio, EodsaError> {
        let mut studio = self.get_studio(id).await?;
        let previous = studio.approval.decide(decision, admin, now());
        if previous != studio.approval.status {
            tracing::warn!(
                studio_id = %id,
                %previous,
                current = %studio.approval.status,
                "overriding earlier studio decision"
            );
        }
        self.studios.update(studio).await
    }
}
