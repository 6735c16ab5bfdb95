//! # eodsa-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `eodsa-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//! - Translate unique-constraint violations into domain conflicts
//!
//! ## Dependency rule
//! Depends on `eodsa-app` (for port traits) and `eodsa-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod codec;
#[cfg(test)]
mod testing;
pub mod error;
pub mod pool;

mod application_repo;
mod contestant_repo;
mod dancer_repo;
mod entry_repo;
mod event_repo;
mod judge_repo;
mod reset_repo;
mod score_repo;
mod studio_repo;

pub use application_repo::SqliteApplicationRepository;
pub use contestant_repo::SqliteContestantRepository;
pub use dancer_repo::SqliteDancerRepository;
pub use entry_repo::SqliteEntryRepository;
pub use event_repo::SqliteEventRepository;
pub use judge_repo::SqliteJudgeRepository;
pub use pool::{Config, Database};
pub use reset_repo::SqlitePasswordResetRepository;
pub use score_repo::SqliteScoreRepository;
pub use studio_repo::SqliteStudioRepository;
