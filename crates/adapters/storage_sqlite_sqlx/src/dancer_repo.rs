//! `SQLite` implementation of [`DancerRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use eodsa_app::ports::DancerRepository;
use eodsa_domain::approval::{Approval, ApprovalStatus};
use eodsa_domain::dancer::{Dancer, EodsaId, Guardian};
use eodsa_domain::error::EodsaError;
use eodsa_domain::id::DancerId;

use crate::codec::{
    date, parse, parse_date, parse_opt, parse_timestamp, parse_timestamp_opt, timestamp,
};
use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Dancer`].
struct Wrapper(Dancer);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Dancer> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let eodsa_id: String = row.try_get("eodsa_id")?;
        let date_of_birth: String = row.try_get("date_of_birth")?;
        let guardian_name: Option<String> = row.try_get("guardian_name")?;
        let guardian_email: Option<String> = row.try_get("guardian_email")?;
        let guardian_phone: Option<String> = row.try_get("guardian_phone")?;
        let status: String = row.try_get("status")?;
        let decided_by: Option<String> = row.try_get("decided_by")?;
        let decided_at: Option<String> = row.try_get("decided_at")?;
        let created_at: String = row.try_get("created_at")?;

        let guardian = match (guardian_name, guardian_email, guardian_phone) {
            (Some(name), Some(email), Some(phone)) => Some(Guardian { name, email, phone }),
            _ => None,
        };

        Ok(Self(Dancer {
            id: parse(&id)?,
            eodsa_id: EodsaId::from_raw(&eodsa_id),
            name: row.try_get("name")?,
            date_of_birth: parse_date(&date_of_birth)?,
            national_id: row.try_get("national_id")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            guardian,
            approval: Approval {
                status: parse(&status)?,
                rejection_reason: row.try_get("rejection_reason")?,
                decided_by: parse_opt(decided_by)?,
                decided_at: parse_timestamp_opt(decided_at)?,
            },
            created_at: parse_timestamp(&created_at)?,
        }))
    }
}

const INSERT: &str = "INSERT INTO dancers (id, eodsa_id, name, date_of_birth, national_id, email, phone, guardian_name, guardian_email, guardian_phone, status, rejection_reason, decided_by, decided_at, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM dancers WHERE id = ?";
const SELECT_BY_EODSA_ID: &str = "SELECT * FROM dancers WHERE eodsa_id = ?";
const SELECT_ALL: &str = "SELECT * FROM dancers ORDER BY created_at";
const SELECT_BY_STATUS: &str = "SELECT * FROM dancers WHERE status = ? ORDER BY created_at";
const UPDATE: &str = "UPDATE dancers SET status = ?, rejection_reason = ?, decided_by = ?, decided_at = ? WHERE id = ?";

/// `SQLite`-backed dancer repository.
#[derive(Clone)]
pub struct SqliteDancerRepository {
    pool: SqlitePool,
}

impl SqliteDancerRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DancerRepository for SqliteDancerRepository {
    fn create(&self, dancer: Dancer) -> impl Future<Output = Result<Dancer, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            let guardian = dancer.guardian.as_ref();
            sqlx::query(INSERT)
                .bind(dancer.id.to_string())
                .bind(dancer.eodsa_id.as_str())
                .bind(&dancer.name)
                .bind(date(dancer.date_of_birth))
                .bind(&dancer.national_id)
                .bind(&dancer.email)
                .bind(&dancer.phone)
                .bind(guardian.map(|g| g.name.as_str()))
                .bind(guardian.map(|g| g.email.as_str()))
                .bind(guardian.map(|g| g.phone.as_str()))
                .bind(dancer.approval.status.as_str())
                .bind(&dancer.approval.rejection_reason)
                .bind(dancer.approval.decided_by.map(|id| id.to_string()))
                .bind(dancer.approval.decided_at.map(timestamp))
                .bind(timestamp(dancer.created_at))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(dancer)
        }
    }

    fn get_by_id(
        &self,
        id: DancerId,
    ) -> impl Future<Output = Result<Option<Dancer>, EodsaError>> + Send {
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

    fn get_by_eodsa_id(
        &self,
        eodsa_id: &EodsaId,
    ) -> impl Future<Output = Result<Option<Dancer>, EodsaError>> + Send {
        let pool = self.pool.clone();
        let eodsa_id = eodsa_id.as_str().to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_EODSA_ID)
                .bind(eodsa_id)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn list(
        &self,
        status: Option<ApprovalStatus>,
    ) -> impl Future<Output = Result<Vec<Dancer>, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = match status {
                Some(status) => sqlx::query_as(SELECT_BY_STATUS).bind(status.as_str()),
                None => sqlx::query_as(SELECT_ALL),
            }
            .fetch_all(&pool)
            .await
            .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(&self, dancer: Dancer) -> impl Future<Output = Result<Dancer, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE)
                .bind(dancer.approval.status.as_str())
                .bind(&dancer.approval.rejection_reason)
                .bind(dancer.approval.decided_by.map(|id| id.to_string()))
                .bind(dancer.approval.decided_at.map(timestamp))
                .bind(dancer.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(dancer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dancer, memory_pool};
    use chrono::NaiveDate;
    use eodsa_domain::approval::Decision;
    use eodsa_domain::error::ConflictError;
    use eodsa_domain::id::JudgeId;
    use eodsa_domain::time::now;

    async fn setup() -> SqliteDancerRepository {
        SqliteDancerRepository::new(memory_pool().await)
    }

    #[tokio::test]
    async fn should_create_and_get_dancer_by_both_ids() {
        let repo = setup().await;
        let created = repo.create(dancer(1)).await.unwrap();

        let by_id = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.national_id, created.national_id);
        assert_eq!(by_id.approval.status, ApprovalStatus::Pending);

        let by_eodsa = repo
            .get_by_eodsa_id(&created.eodsa_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_eodsa.id, created.id);
    }

    #[tokio::test]
    async fn should_round_trip_guardian_of_minor() {
        let repo = setup().await;
        let minor = Dancer::builder()
            .name("Lerato")
            .date_of_birth(NaiveDate::from_ymd_opt(2016, 9, 1).unwrap())
            .national_id("1609010000081")
            .guardian(
                Some("Thandi".to_string()),
                Some("thandi@example.com".to_string()),
                Some("0820000000".to_string()),
            )
            .build()
            .unwrap();
        let created = repo.create(minor).await.unwrap();

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.guardian.unwrap().email, "thandi@example.com");
        assert!(fetched.email.is_none());
    }

    #[tokio::test]
    async fn should_report_duplicate_national_id_as_conflict() {
        let repo = setup().await;
        repo.create(dancer(1)).await.unwrap();
        let mut again = dancer(2);
        again.national_id = dancer(1).national_id;

        let result = repo.create(again).await;
        assert!(matches!(
            result,
            Err(EodsaError::Conflict(ConflictError::Duplicate {
                entity: "dancer",
                field: "national id"
            }))
        ));
    }

    #[tokio::test]
    async fn should_allow_many_dancers_without_email() {
        let repo = setup().await;
        for seed in 1..=2 {
            let mut d = dancer(seed);
            d.email = None;
            repo.create(d).await.unwrap();
        }
        assert_eq!(repo.list(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn should_persist_decision_and_filter_by_status() {
        let repo = setup().await;
        let mut approved = repo.create(dancer(1)).await.unwrap();
        repo.create(dancer(2)).await.unwrap();

        let admin = JudgeId::new();
        approved.approval.decide(Decision::Approve, admin, now());
        repo.update(approved.clone()).await.unwrap();

        let listed = repo.list(Some(ApprovalStatus::Approved)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, approved.id);
        assert_eq!(listed[0].approval.decided_by, Some(admin));
        assert_eq!(
            repo.list(Some(ApprovalStatus::Pending)).await.unwrap().len(),
            1
        );
    }
}
