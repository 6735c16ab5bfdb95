//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod backend;
pub mod gateway;
pub mod security;
pub mod storage;

pub use backend::{Backend, Ports};
pub use gateway::{CaptchaVerifier, Email, Mailer, RateLimiter};
pub use security::{PasswordHasher, SessionTokens};
pub use storage::{
    ApplicationRepository, ContestantRepository, DancerRepository, EntryRepository,
    EventRepository, JudgeRepository, PasswordResetRepository, ScoreRepository,
    StudioRepository,
};
