//! `SQLite` implementation of [`ApplicationRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use eodsa_app::ports::ApplicationRepository;
use eodsa_domain::application::{ApplicationStatus, StudioApplication};
use eodsa_domain::error::EodsaError;
use eodsa_domain::id::{ApplicationId, DancerId, StudioId};

use crate::codec::{parse, parse_timestamp, parse_timestamp_opt, timestamp};
use crate::error::StorageError;

struct Wrapper(StudioApplication);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<StudioApplication> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let dancer_id: String = row.try_get("dancer_id")?;
        let studio_id: String = row.try_get("studio_id")?;
        let status: String = row.try_get("status")?;
        let applied_at: String = row.try_get("applied_at")?;
        let responded_at: Option<String> = row.try_get("responded_at")?;

        Ok(Self(StudioApplication {
            id: parse(&id)?,
            dancer_id: parse(&dancer_id)?,
            studio_id: parse(&studio_id)?,
            status: parse(&status)?,
            applied_at: parse_timestamp(&applied_at)?,
            responded_at: parse_timestamp_opt(responded_at)?,
            rejection_reason: row.try_get("rejection_reason")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO studio_applications (id, dancer_id, studio_id, status, applied_at, responded_at, rejection_reason) VALUES (?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM studio_applications WHERE id = ?";
const SELECT_OPEN: &str = "SELECT * FROM studio_applications WHERE dancer_id = ? AND studio_id = ? AND status IN ('pending', 'accepted')";
const SELECT_FOR_STUDIO: &str =
    "SELECT * FROM studio_applications WHERE studio_id = ? ORDER BY applied_at DESC";
const SELECT_FOR_STUDIO_BY_STATUS: &str = "SELECT * FROM studio_applications WHERE studio_id = ? AND status = ? ORDER BY applied_at DESC";
const SELECT_FOR_DANCER: &str =
    "SELECT * FROM studio_applications WHERE dancer_id = ? ORDER BY applied_at DESC";
const UPDATE: &str = "UPDATE studio_applications SET status = ?, responded_at = ?, rejection_reason = ? WHERE id = ?";

/// `SQLite`-backed studio application repository.
#[derive(Clone)]
pub struct SqliteApplicationRepository {
    pool: SqlitePool,
}

impl SqliteApplicationRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ApplicationRepository for SqliteApplicationRepository {
    fn create(
        &self,
        application: StudioApplication,
    ) -> impl Future<Output = Result<StudioApplication, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(application.id.to_string())
                .bind(application.dancer_id.to_string())
                .bind(application.studio_id.to_string())
                .bind(application.status.as_str())
                .bind(timestamp(application.applied_at))
                .bind(application.responded_at.map(timestamp))
                .bind(&application.rejection_reason)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(application)
        }
    }

    fn get_by_id(
        &self,
        id: ApplicationId,
    ) -> impl Future<Output = Result<Option<StudioApplication>, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn find_open(
        &self,
        dancer_id: DancerId,
        studio_id: StudioId,
    ) -> impl Future<Output = Result<Option<StudioApplication>, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_OPEN)
                .bind(dancer_id.to_string())
                .bind(studio_id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn list_for_studio(
        &self,
        studio_id: StudioId,
        status: Option<ApplicationStatus>,
    ) -> impl Future<Output = Result<Vec<StudioApplication>, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = match status {
                Some(status) => sqlx::query_as(SELECT_FOR_STUDIO_BY_STATUS)
                    .bind(studio_id.to_string())
                    .bind(status.as_str()),
                None => sqlx::query_as(SELECT_FOR_STUDIO).bind(studio_id.to_string()),
            }
            .fetch_all(&pool)
            .await
            .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn list_for_dancer(
        &self,
        dancer_id: DancerId,
    ) -> impl Future<Output = Result<Vec<StudioApplication>, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_FOR_DANCER)
                .bind(dancer_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(
        &self,
        application: StudioApplication,
    ) -> impl Future<Output = Result<StudioApplication, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE)
                .bind(application.status.as_str())
                .bind(application.responded_at.map(timestamp))
                .bind(&application.rejection_reason)
                .bind(application.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(application)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dancer, memory_pool, studio};
    use crate::{SqliteDancerRepository, SqliteStudioRepository};
    use eodsa_app::ports::{DancerRepository, StudioRepository};
    use eodsa_domain::error::ConflictError;
    use eodsa_domain::time::now;

    async fn setup() -> (SqliteApplicationRepository, DancerId, StudioId) {
        let pool = memory_pool().await;
        let dancer = SqliteDancerRepository::new(pool.clone())
            .create(dancer(1))
            .await
            .unwrap();
        let studio = SqliteStudioRepository::new(pool.clone())
            .create(studio(1))
            .await
            .unwrap();
        (SqliteApplicationRepository::new(pool), dancer.id, studio.id)
    }

    #[tokio::test]
    async fn should_find_open_application_for_pair() {
        let (repo, dancer_id, studio_id) = setup().await;
        let created = repo
            .create(StudioApplication::new(dancer_id, studio_id))
            .await
            .unwrap();

        let open = repo.find_open(dancer_id, studio_id).await.unwrap().unwrap();
        assert_eq!(open.id, created.id);
        assert_eq!(repo.list_for_dancer(dancer_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_reject_second_open_application() {
        let (repo, dancer_id, studio_id) = setup().await;
        repo.create(StudioApplication::new(dancer_id, studio_id))
            .await
            .unwrap();

        let result = repo
            .create(StudioApplication::new(dancer_id, studio_id))
            .await;
        assert!(matches!(
            result,
            Err(EodsaError::Conflict(ConflictError::AlreadyApplied))
        ));
    }

    #[tokio::test]
    async fn should_allow_reapplying_after_rejection() {
        let (repo, dancer_id, studio_id) = setup().await;
        let mut first = repo
            .create(StudioApplication::new(dancer_id, studio_id))
            .await
            .unwrap();
        first.reject("Classes are full", now()).unwrap();
        repo.update(first).await.unwrap();

        assert!(repo.find_open(dancer_id, studio_id).await.unwrap().is_none());
        repo.create(StudioApplication::new(dancer_id, studio_id))
            .await
            .unwrap();

        let rejected = repo
            .list_for_studio(studio_id, Some(ApplicationStatus::Rejected))
            .await
            .unwrap();
        assert_eq!(rejected.len(), 1);
        assert_eq!(
            rejected[0].rejection_reason.as_deref(),
            Some("Classes are full")
        );
        assert_eq!(repo.list_for_studio(studio_id, None).await.unwrap().len(), 2);
    }
}
