//! `SQLite` implementation of [`ContestantRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use eodsa_app::ports::ContestantRepository;
use eodsa_domain::contestant::Contestant;
use eodsa_domain::error::EodsaError;
use eodsa_domain::id::ContestantId;

use crate::codec::{decode_err, parse, parse_timestamp, timestamp};
use crate::error::StorageError;

struct Wrapper(Contestant);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let roster: String = row.try_get("roster")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Self(Contestant {
            id: parse(&id)?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            roster: serde_json::from_str(&roster).map_err(decode_err)?,
            created_at: parse_timestamp(&created_at)?,
        }))
    }
}

const INSERT: &str =
    "INSERT INTO contestants (id, name, email, roster, created_at) VALUES (?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM contestants WHERE id = ?";

/// `SQLite`-backed repository for legacy contestants and their rosters.
#[derive(Clone)]
pub struct SqliteContestantRepository {
    pool: SqlitePool,
}

impl SqliteContestantRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ContestantRepository for SqliteContestantRepository {
    fn create(
        &self,
        contestant: Contestant,
    ) -> impl Future<Output = Result<Contestant, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            let roster = serde_json::to_string(&contestant.roster).map_err(StorageError::from)?;
            sqlx::query(INSERT)
                .bind(contestant.id.to_string())
                .bind(&contestant.name)
                .bind(&contestant.email)
                .bind(roster)
                .bind(timestamp(contestant.created_at))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(contestant)
        }
    }

    fn get_by_id(
        &self,
        id: ContestantId,
    ) -> impl Future<Output = Result<Option<Contestant>, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|w| w.0))
        }
    }
}
