//! Application service: dancer-to-studio affiliation workflow.
//!
//! Caller identity always comes from the verified session: the dancer id for
//! `apply`/`withdraw`, the studio id for `respond`.

use eodsa_domain::application::{ApplicationStatus, Response, StudioApplication};
use eodsa_domain::dancer::Dancer;
use eodsa_domain::error::{ConflictError, EodsaError, ForbiddenError, NotFoundError};
use eodsa_domain::id::{ApplicationId, DancerId, StudioId};
use eodsa_domain::time::now;

use crate::ports::{ApplicationRepository, Backend, DancerRepository, Ports, StudioRepository};

pub struct ApplicationService<B: Backend> {
    applications: B::Applications,
    dancers: B::Dancers,
    studios: B::Studios,
}

impl<B: Backend> ApplicationService<B> {
    pub fn new(ports: &Ports<B>) -> Self {
        Self {
            applications: ports.applications.clone(),
            dancers: ports.dancers.clone(),
            studios: ports.studios.clone(),
        }
    }

    /// Dancer applies to join a studio.
    ///
    /// # Errors
    ///
    /// - [`EodsaError::NotFound`] for an unknown dancer or studio
    /// - [`EodsaError::Forbidden`] unless both are approved
    /// - [`ConflictError::AlreadyApplied`] when an open application exists
    pub async fn apply(
        &self,
        dancer_id: DancerId,
        studio_id: StudioId,
    ) -> Result<StudioApplication, EodsaError> {
        let dancer = self
            .dancers
            .get_by_id(dancer_id)
            .await?
            .ok_or_else(|| not_found("Dancer", dancer_id))?;
        if !dancer.is_approved() {
            return Err(ForbiddenError::DancerNotApproved { name: dancer.name }.into());
        }
        let studio = self
            .studios
            .get_by_id(studio_id)
            .await?
            .ok_or_else(|| not_found("Studio", studio_id))?;
        if !studio.is_approved() {
            return Err(ForbiddenError::StudioNotApproved { name: studio.name }.into());
        }
        if self
            .applications
            .find_open(dancer_id, studio_id)
            .await?
            .is_some()
        {
            return Err(ConflictError::AlreadyApplied.into());
        }

        let application = self
            .applications
            .create(StudioApplication::new(dancer_id, studio_id))
            .await?;
        tracing::info!(
            application_id = %application.id,
            %dancer_id,
            %studio_id,
            "studio application submitted"
        );
        Ok(application)
    }

    /// Studio accepts or rejects an application addressed to it.
    ///
    /// # Errors
    ///
    /// - [`EodsaError::NotFound`] for an unknown application
    /// - [`ForbiddenError::NotOwner`] when addressed to another studio
    /// - [`EodsaError::Validation`] when the application is no longer pending
    pub async fn respond(
        &self,
        studio_id: StudioId,
        application_id: ApplicationId,
        response: Response,
    ) -> Result<StudioApplication, EodsaError> {
        let mut application = self.get_application(application_id).await?;
        if application.studio_id != studio_id {
            return Err(ForbiddenError::NotOwner {
                entity: "application",
            }
            .into());
        }
        application.respond(response, now())?;
        let application = self.applications.update(application).await?;
        tracing::info!(%application_id, status = %application.status, "studio responded");
        Ok(application)
    }

    /// Dancer withdraws one of their pending applications.
    ///
    /// # Errors
    ///
    /// - [`EodsaError::NotFound`] for an unknown application
    /// - [`ForbiddenError::NotOwner`] when it belongs to another dancer
    /// - [`EodsaError::Validation`] when the application is no longer pending
    pub async fn withdraw(
        &self,
        dancer_id: DancerId,
        application_id: ApplicationId,
    ) -> Result<StudioApplication, EodsaError> {
        let mut application = self.get_application(application_id).await?;
        if application.dancer_id != dancer_id {
            return Err(ForbiddenError::NotOwner {
                entity: "application",
            }
            .into());
        }
        application.withdraw(now())?;
        let application = self.applications.update(application).await?;
        tracing::info!(%application_id, "application withdrawn");
        Ok(application)
    }

    /// Applications addressed to `studio_id`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_for_studio(
        &self,
        studio_id: StudioId,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<StudioApplication>, EodsaError> {
        self.applications.list_for_studio(studio_id, status).await
    }

    /// Applications made by `dancer_id`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_for_dancer(
        &self,
        dancer_id: DancerId,
    ) -> Result<Vec<StudioApplication>, EodsaError> {
        self.applications.list_for_dancer(dancer_id).await
    }

    /// Dancers whose application to `studio_id` was accepted.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repositories.
    pub async fn affiliated_dancers(&self, studio_id: StudioId) -> Result<Vec<Dancer>, EodsaError> {
        let accepted = self
            .applications
            .list_for_studio(studio_id, Some(ApplicationStatus::Accepted))
            .await?;
        let mut dancers = Vec::with_capacity(accepted.len());
        for application in accepted {
            if let Some(dancer) = self.dancers.get_by_id(application.dancer_id).await? {
                dancers.push(dancer);
            }
        }
        Ok(dancers)
    }

    async fn get_application(&self, id: ApplicationId) -> Result<StudioApplication, EodsaError> {
        self.applications
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found("Application", id))
    }
}

fn not_found(entity: &'static str, id: impl ToString) -> EodsaError {
    NotFoundError {
        entity,
        id: id.to_string(),
    }
    .into()
}
