//! Application services: use-case implementations.
//!
//! Each service is generic over a [`Backend`](crate::ports::Backend) and owns
//! clones of the ports it needs (constructor injection from
//! [`Ports`](crate::ports::Ports)), keeping this layer decoupled from
//! concrete adapters.

pub mod application_service;
pub mod auth_service;
pub mod dancer_service;
pub mod entry_service;
pub mod event_service;
pub mod judge_service;
pub mod registration_guard;
pub mod scoring_service;
pub mod studio_service;

pub use application_service::ApplicationService;
pub use auth_service::{AuthService, Session};
pub use dancer_service::{DancerRegistration, DancerService};
pub use entry_service::{EntryService, EntrySubmission};
pub use event_service::EventService;
pub use judge_service::JudgeService;
pub use registration_guard::RegistrationGuard;
pub use scoring_service::ScoringService;
pub use studio_service::{StudioRegistration, StudioService};

use eodsa_domain::error::EodsaError;

use crate::ports::{Email, Mailer};

/// Send `email`, logging instead of failing when delivery breaks.
pub(crate) async fn notify<M: Mailer>(mailer: &M, email: Email) {
    let to = email.to.clone();
    if let Err(err) = mailer.send(email).await {
        tracing::warn!(%to, error = %err, "email delivery failed, continuing");
    }
}

/// Retry `attempt` while it fails with a duplicate on `entity`/`field`.
///
/// Used for randomly generated public codes (EODSA ids, registration
/// numbers) whose uniqueness only the store can confirm.
pub(crate) async fn retry_on_duplicate<T, F, Fut>(
    entity: &'static str,
    field: &'static str,
    mut attempt: F,
) -> Result<T, EodsaError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, EodsaError>>,
{
    const MAX_ATTEMPTS: usize = 5;
    let mut tries = 1;
    loop {
        match attempt().await {
            Err(err) if err.is_duplicate(entity, field) && tries < MAX_ATTEMPTS => {
                tracing::debug!(entity, field, tries, "generated code collided, retrying");
                tries += 1;
            }
            other => return other,
        }
    }
}
