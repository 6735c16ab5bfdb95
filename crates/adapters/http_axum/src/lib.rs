//! # eodsa-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the competition **JSON API** under `/api` (registration, sign-in,
//!   approvals, studio applications, events, entries, scores, rankings)
//! - Resolve the caller from an `Authorization: Bearer` session token
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map [`EodsaError`](eodsa_domain::error::EodsaError) families onto HTTP
//!   status codes
//!
//! ## Dependency rule
//! Depends on `eodsa-app` (for port traits and services) and `eodsa-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod extract;
pub mod router;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;
