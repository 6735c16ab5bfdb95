//! `SQLite` implementation of [`JudgeRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use eodsa_app::ports::JudgeRepository;
use eodsa_domain::error::EodsaError;
use eodsa_domain::id::JudgeId;
use eodsa_domain::judge::Judge;

use crate::codec::{parse, parse_timestamp, timestamp};
use crate::error::StorageError;

struct Wrapper(Judge);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Judge> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Self(Judge {
            id: parse(&id)?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            is_admin: row.try_get("is_admin")?,
            created_at: parse_timestamp(&created_at)?,
        }))
    }
}

const INSERT: &str = "INSERT INTO judges (id, name, email, password_hash, is_admin, created_at) VALUES (?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM judges WHERE id = ?";
const SELECT_BY_EMAIL: &str = "SELECT * FROM judges WHERE email = ?";
const UPDATE: &str = "UPDATE judges SET name = ?, password_hash = ?, is_admin = ? WHERE id = ?";

/// `SQLite`-backed judge repository.
#[derive(Clone)]
pub struct SqliteJudgeRepository {
    pool: SqlitePool,
}

impl SqliteJudgeRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl JudgeRepository for SqliteJudgeRepository {
    fn create(&self, judge: Judge) -> impl Future<Output = Result<Judge, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(judge.id.to_string())
                .bind(&judge.name)
                .bind(&judge.email)
                .bind(&judge.password_hash)
                .bind(judge.is_admin)
                .bind(timestamp(judge.created_at))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(judge)
        }
    }

    fn get_by_id(
        &self,
        id: JudgeId,
    ) -> impl Future<Output = Result<Option<Judge>, EodsaError>> + Send {
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
    ) -> impl Future<Output = Result<Option<Judge>, EodsaError>> + Send {
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

    fn update(&self, judge: Judge) -> impl Future<Output = Result<Judge, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE)
                .bind(&judge.name)
                .bind(&judge.password_hash)
                .bind(judge.is_admin)
                .bind(judge.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(judge)
        }
    }
}
