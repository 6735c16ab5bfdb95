//! `SQLite` implementation of [`EventRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use eodsa_app::ports::EventRepository;
use eodsa_domain::error::EodsaError;
use eodsa_domain::event::Event;
use eodsa_domain::id::EventId;

use crate::codec::{date, parse, parse_date, parse_decimal, parse_timestamp, timestamp};
use crate::error::StorageError;

struct Wrapper(Event);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Event> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let performance_type: String = row.try_get("performance_type")?;
        let event_date: String = row.try_get("event_date")?;
        let registration_deadline: String = row.try_get("registration_deadline")?;
        let entry_fee: String = row.try_get("entry_fee")?;
        let status: String = row.try_get("status")?;
        let created_by: String = row.try_get("created_by")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Self(Event {
            id: parse(&id)?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            region: row.try_get("region")?,
            age_category: row.try_get("age_category")?,
            performance_type: parse(&performance_type)?,
            event_date: parse_date(&event_date)?,
            registration_deadline: parse_date(&registration_deadline)?,
            venue: row.try_get("venue")?,
            entry_fee: parse_decimal(&entry_fee)?,
            status: parse(&status)?,
            created_by: parse(&created_by)?,
            created_at: parse_timestamp(&created_at)?,
        }))
    }
}

const INSERT: &str = "INSERT INTO events (id, name, description, region, age_category, performance_type, event_date, registration_deadline, venue, entry_fee, status, created_by, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM events WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM events ORDER BY event_date, created_at";
const UPDATE: &str = "UPDATE events SET name = ?, description = ?, region = ?, age_category = ?, performance_type = ?, event_date = ?, registration_deadline = ?, venue = ?, entry_fee = ?, status = ? WHERE id = ?";

/// `SQLite`-backed event repository.
#[derive(Clone)]
pub struct SqliteEventRepository {
    pool: SqlitePool,
}

impl SqliteEventRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl EventRepository for SqliteEventRepository {
    fn create(&self, event: Event) -> impl Future<Output = Result<Event, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(event.id.to_string())
                .bind(&event.name)
                .bind(&event.description)
                .bind(&event.region)
                .bind(&event.age_category)
                .bind(event.performance_type.as_str())
                .bind(date(event.event_date))
                .bind(date(event.registration_deadline))
                .bind(&event.venue)
                .bind(event.entry_fee.to_string())
                .bind(event.status.as_str())
                .bind(event.created_by.to_string())
                .bind(timestamp(event.created_at))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(event)
        }
    }

    fn get_by_id(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, EodsaError>> + Send {
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

    fn list(&self) -> impl Future<Output = Result<Vec<Event>, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(&self, event: Event) -> impl Future<Output = Result<Event, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE)
                .bind(&event.name)
                .bind(&event.description)
                .bind(&event.region)
                .bind(&event.age_category)
                .bind(event.performance_type.as_str())
                .bind(date(event.event_date))
                .bind(date(event.registration_deadline))
                .bind(&event.venue)
                .bind(event.entry_fee.to_string())
                .bind(event.status.as_str())
                .bind(event.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(event)
        }
    }
}
