//! Dancer service: registration and the admin approval gate.

use chrono::NaiveDate;
use eodsa_domain::approval::{ApprovalStatus, Decision};
use eodsa_domain::dancer::{Dancer, EodsaId};
use eodsa_domain::error::{EodsaError, NotFoundError};
use eodsa_domain::id::{DancerId, JudgeId};
use eodsa_domain::time::now;

use crate::ports::{Backend, DancerRepository, Email, Ports};
use crate::services::{notify, retry_on_duplicate};

/// Fields submitted on the dancer registration form.
#[derive(Debug, Clone, Default)]
pub struct DancerRegistration {
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub national_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_email: Option<String>,
    pub guardian_phone: Option<String>,
}

/// Application service for dancers.
pub struct DancerService<B: Backend> {
    dancers: B::Dancers,
    mailer: B::Mailer,
}

impl<B: Backend> DancerService<B> {
    pub fn new(ports: &Ports<B>) -> Self {
        Self {
            dancers: ports.dancers.clone(),
            mailer: ports.mailer.clone(),
        }
    }

    /// Register a dancer. New dancers await admin approval.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::Validation`] for invalid fields (including a
    /// minor without guardian details) and [`EodsaError::Conflict`] when the
    /// national id or email is already registered.
    pub async fn register(&self, form: DancerRegistration) -> Result<Dancer, EodsaError> {
        let mut builder = Dancer::builder()
            .name(form.name)
            .national_id(form.national_id.trim())
            .email(form.email)
            .phone(form.phone)
            .guardian(form.guardian_name, form.guardian_email, form.guardian_phone);
        if let Some(date_of_birth) = form.date_of_birth {
            builder = builder.date_of_birth(date_of_birth);
        }
        let dancer = builder.build()?;

        let dancer = retry_on_duplicate("dancer", "eodsa id", || {
            let mut candidate = dancer.clone();
            candidate.eodsa_id = EodsaId::generate();
            self.dancers.create(candidate)
        })
        .await?;
        tracing::info!(dancer_id = %dancer.id, eodsa_id = %dancer.eodsa_id, "dancer registered");

        let contact = dancer
            .email
            .clone()
            .or_else(|| dancer.guardian.as_ref().map(|g| g.email.clone()));
        if let Some(to) = contact {
            notify(
                &self.mailer,
                Email {
                    to,
                    subject: "EODSA registration received".to_string(),
                    body: format!(
                        "Hi {}, your EODSA ID is {}. An administrator will review your registration shortly.",
                        dancer.name, dancer.eodsa_id
                    ),
                },
            )
            .await;
        }
        Ok(dancer)
    }

    /// Look up a dancer by id.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::NotFound`] when no dancer with `id` exists.
    pub async fn get_dancer(&self, id: DancerId) -> Result<Dancer, EodsaError> {
        self.dancers.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Dancer",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List dancers, optionally filtered by approval status.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_dancers(
        &self,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<Dancer>, EodsaError> {
        self.dancers.list(status).await
    }

    /// Record an admin approval decision. Re-deciding overwrites.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::NotFound`] when the dancer does not exist.
    pub async fn decide(
        &self,
        id: DancerId,
        decision: Decision,
        admin: JudgeId,
    ) -> Result<Dancer, EodsaError> {
        let mut dancer = self.get_dancer(id).await?;
        let previous = dancer.approval.decide(decision, admin, now());
        if previous != ApprovalStatus::Pending {
            tracing::warn!(
                dancer_id = %id,
                %previous,
                current = %dancer.approval.status,
                "overriding earlier dancer decision"
            );
        }
        let dancer = self.dancers.update(dancer).await?;
        tracing::info!(dancer_id = %id, status = %dancer.approval.status, admin_id = %admin, "dancer decided");
        Ok(dancer)
    }
}
