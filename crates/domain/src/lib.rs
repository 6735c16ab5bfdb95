//! # eodsa-domain
//!
//! Pure domain model for the EODSA dance-competition service.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Dancers** and **Studios** with their tri-state approval flag
//! - Define **Studio applications** (dancer → studio affiliation workflow)
//! - Define **Events** (competition definitions) and **Entries** (submissions)
//! - Define **Scores** and the deterministic **ranking** aggregation
//! - Define the **session principal** resolved from signed tokens and the
//!   password-reset credential union
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod application;
pub mod approval;
pub mod contact;
pub mod contestant;
pub mod credential;
pub mod dancer;
pub mod entry;
pub mod event;
pub mod judge;
pub mod performance;
pub mod ranking;
pub mod score;
pub mod session;
pub mod studio;
