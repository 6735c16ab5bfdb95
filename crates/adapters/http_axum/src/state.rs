//! Shared application state for axum handlers.

use std::sync::Arc;

use eodsa_app::ports::{Backend, Ports};
use eodsa_app::services::{
    ApplicationService, AuthService, DancerService, EntryService, EventService, JudgeService,
    RegistrationGuard, ScoringService, StudioService,
};

/// Application state shared across all axum handlers.
///
/// Generic over the [`Backend`] to avoid dynamic dispatch. `Clone` is
/// implemented manually so the backend types themselves do not need to be
/// `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<B: Backend> {
    pub auth: Arc<AuthService<B>>,
    pub guard: Arc<RegistrationGuard<B>>,
    pub dancers: Arc<DancerService<B>>,
    pub studios: Arc<StudioService<B>>,
    pub applications: Arc<ApplicationService<B>>,
    pub events: Arc<EventService<B>>,
    pub entries: Arc<EntryService<B>>,
    pub judges: Arc<JudgeService<B>>,
    pub scoring: Arc<ScoringService<B>>,
    /// Take the client address from `X-Forwarded-For` when set. Only enable
    /// behind a reverse proxy that overwrites the header.
    pub trust_forwarded_for: bool,
}

impl<B: Backend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
            guard: Arc::clone(&self.guard),
            dancers: Arc::clone(&self.dancers),
            studios: Arc::clone(&self.studios),
            applications: Arc::clone(&self.applications),
            events: Arc::clone(&self.events),
            entries: Arc::clone(&self.entries),
            judges: Arc::clone(&self.judges),
            scoring: Arc::clone(&self.scoring),
            trust_forwarded_for: self.trust_forwarded_for,
        }
    }
}

impl<B: Backend> AppState<B> {
    /// Build every service over one set of ports.
    pub fn new(ports: &Ports<B>) -> Self {
        Self {
            auth: Arc::new(AuthService::new(ports)),
            guard: Arc::new(RegistrationGuard::new(ports)),
            dancers: Arc::new(DancerService::new(ports)),
            studios: Arc::new(StudioService::new(ports)),
            applications: Arc::new(ApplicationService::new(ports)),
            events: Arc::new(EventService::new(ports)),
            entries: Arc::new(EntryService::new(ports)),
            judges: Arc::new(JudgeService::new(ports)),
            scoring: Arc::new(ScoringService::new(ports)),
            trust_forwarded_for: false,
        }
    }

    #[must_use]
    pub fn with_trusted_proxy(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }
}
