//! # eodsa-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - repositories for dancers, studios, applications, events, entries,
//!     contestants, judges, scores and password resets
//!   - `Mailer`, `CaptchaVerifier`: outbound gateways
//!   - `PasswordHasher`, `SessionTokens`: credential primitives
//!   - `RateLimiter`: per-client registration quota
//! - Define the [`Backend`](ports::Backend) bundle naming one concrete type per port
//! - Define **driving/inbound ports** as use-case structs:
//!   - `DancerService`, `StudioService`, `ApplicationService`
//!   - `EventService`, `EntryService`, `ScoringService`
//!   - `AuthService`, `JudgeService`, `RegistrationGuard`
//! - Provide **in-process infrastructure** (the sliding-window rate limiter)
//!
//! ## Dependency rule
//! Depends on `eodsa-domain` only (plus `tokio::sync` and `tracing`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod rate_limit;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
