//! Backend: one concrete type per port, chosen by the composition root.
//!
//! Services and the HTTP state are generic over a single `B: Backend`
//! instead of a dozen independent type parameters.

use super::{
    ApplicationRepository, CaptchaVerifier, ContestantRepository, DancerRepository,
    EntryRepository, EventRepository, JudgeRepository, Mailer, PasswordHasher,
    PasswordResetRepository, RateLimiter, ScoreRepository, SessionTokens, StudioRepository,
};

/// Bundle of port implementations.
///
/// Every member is cheaply cloneable (typically a pool handle or an `Arc`)
/// so each service can own the ports it uses.
pub trait Backend: Send + Sync + 'static {
    type Dancers: DancerRepository + Clone + Send + Sync + 'static;
    type Studios: StudioRepository + Clone + Send + Sync + 'static;
    type Applications: ApplicationRepository + Clone + Send + Sync + 'static;
    type Events: EventRepository + Clone + Send + Sync + 'static;
    type Entries: EntryRepository + Clone + Send + Sync + 'static;
    type Contestants: ContestantRepository + Clone + Send + Sync + 'static;
    type Judges: JudgeRepository + Clone + Send + Sync + 'static;
    type Scores: ScoreRepository + Clone + Send + Sync + 'static;
    type Resets: PasswordResetRepository + Clone + Send + Sync + 'static;
    type Mailer: Mailer + Clone + Send + Sync + 'static;
    type Captcha: CaptchaVerifier + Clone + Send + Sync + 'static;
    type Hasher: PasswordHasher + Clone + Send + Sync + 'static;
    type Tokens: SessionTokens + Clone + Send + Sync + 'static;
    type Limiter: RateLimiter + Clone + Send + Sync + 'static;
}

/// Concrete port instances for a [`Backend`].
pub struct Ports<B: Backend> {
    pub dancers: B::Dancers,
    pub studios: B::Studios,
    pub applications: B::Applications,
    pub events: B::Events,
    pub entries: B::Entries,
    pub contestants: B::Contestants,
    pub judges: B::Judges,
    pub scores: B::Scores,
    pub resets: B::Resets,
    pub mailer: B::Mailer,
    pub captcha: B::Captcha,
    pub hasher: B::Hasher,
    pub tokens: B::Tokens,
    pub limiter: B::Limiter,
}

impl<B: Backend> Clone for Ports<B> {
    fn clone(&self) -> Self {
        Self {
            dancers: self.dancers.clone(),
            studios: self.studios.clone(),
            applications: self.applications.clone(),
            events: self.events.clone(),
            entries: self.entries.clone(),
            contestants: self.contestants.clone(),
            judges: self.judges.clone(),
            scores: self.scores.clone(),
            resets: self.resets.clone(),
            mailer: self.mailer.clone(),
            captcha: self.captcha.clone(),
            hasher: self.hasher.clone(),
            tokens: self.tokens.clone(),
            limiter: self.limiter.clone(),
        }
    }
}
