//! `SQLite` implementation of [`StudioRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use eodsa_app::ports::StudioRepository;
use eodsa_domain::approval::{Approval, ApprovalStatus};
use eodsa_domain::error::EodsaError;
use eodsa_domain::id::StudioId;
use eodsa_domain::studio::{RegistrationNumber, Studio};

use crate::codec::{parse, parse_opt, parse_timestamp, parse_timestamp_opt, timestamp};
use crate::error::StorageError;

struct Wrapper(Studio);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Studio> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let registration_number: String = row.try_get("registration_number")?;
        let status: String = row.try_get("status")?;
        let decided_by: Option<String> = row.try_get("decided_by")?;
        let decided_at: Option<String> = row.try_get("decided_at")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Self(Studio {
            id: parse(&id)?,
            registration_number: RegistrationNumber::from_raw(&registration_number),
            name: row.try_get("name")?,
            contact_person: row.try_get("contact_person")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
            password_hash: row.try_get("password_hash")?,
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

const INSERT: &str = "INSERT INTO studios (id, registration_number, name, contact_person, email, phone, address, password_hash, status, rejection_reason, decided_by, decided_at, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM studios WHERE id = ?";
const SELECT_BY_EMAIL: &str = "SELECT * FROM studios WHERE email = ?";
const SELECT_ALL: &str = "SELECT * FROM studios ORDER BY created_at";
const SELECT_BY_STATUS: &str = "SELECT * FROM studios WHERE status = ? ORDER BY created_at";
const UPDATE: &str = "UPDATE studios SET password_hash = ?, status = ?, rejection_reason = ?, decided_by = ?, decided_at = ? WHERE id = ?";

/// `SQLite`-backed studio repository.
#[derive(Clone)]
pub struct SqliteStudioRepository {
    pool: SqlitePool,
}

impl SqliteStudioRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl StudioRepository for SqliteStudioRepository {
    fn create(&self, studio: Studio) -> impl Future<Output = Result<Studio, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(studio.id.to_string())
                .bind(studio.registration_number.as_str())
                .bind(&studio.name)
                .bind(&studio.contact_person)
                .bind(&studio.email)
                .bind(&studio.phone)
                .bind(&studio.address)
                .bind(&studio.password_hash)
                .bind(studio.approval.status.as_str())
                .bind(&studio.approval.rejection_reason)
                .bind(studio.approval.decided_by.map(|id| id.to_string()))
                .bind(studio.approval.decided_at.map(timestamp))
                .bind(timestamp(studio.created_at))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(studio)
        }
    }

    fn get_by_id(
        &self,
        id: StudioId,
    ) -> impl Future<Output = Result<Option<Studio>, EodsaError>> + Send {
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

    fn get_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<Studio>, EodsaError>> + Send {
        let pool = self.pool.clone();
        let email = email.to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_EMAIL)
                .bind(email)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn list(
        &self,
        status: Option<ApprovalStatus>,
    ) -> impl Future<Output = Result<Vec<Studio>, EodsaError>> + Send {
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

    fn update(&self, studio: Studio) -> impl Future<Output = Result<Studio, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE)
                .bind(&studio.password_hash)
                .bind(studio.approval.status.as_str())
                .bind(&studio.approval.rejection_reason)
                .bind(studio.approval.decided_by.map(|id| id.to_string()))
                .bind(studio.approval.decided_at.map(timestamp))
                .bind(studio.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(studio)
        }
    }
}
