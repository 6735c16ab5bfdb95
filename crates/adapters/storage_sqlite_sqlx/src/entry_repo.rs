//! `SQLite` implementation of [`EntryRepository`].
//!
//! The submitter is stored as a `(kind, id)` pair and participants as a JSON
//! array of the ids given at submission.

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use eodsa_app::ports::EntryRepository;
use eodsa_domain::entry::{EventEntry, ItemDetails, Submitter};
use eodsa_domain::error::EodsaError;
use eodsa_domain::id::{EntryId, EventId};

use crate::codec::{decode_err, parse, parse_decimal, parse_timestamp, timestamp};
use crate::error::StorageError;

struct Wrapper(EventEntry);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<EventEntry> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let event_id: String = row.try_get("event_id")?;
        let submitter_kind: String = row.try_get("submitter_kind")?;
        let submitter_id: String = row.try_get("submitter_id")?;
        let participant_ids: String = row.try_get("participant_ids")?;
        let mastery: String = row.try_get("mastery")?;
        let item_style: String = row.try_get("item_style")?;
        let duration_seconds: i64 = row.try_get("duration_seconds")?;
        let calculated_fee: String = row.try_get("calculated_fee")?;
        let payment_status: String = row.try_get("payment_status")?;
        let item_number: Option<i64> = row.try_get("item_number")?;
        let submitted_at: String = row.try_get("submitted_at")?;

        let submitter =
            Submitter::from_parts(&submitter_kind, &submitter_id).map_err(decode_err)?;
        let participant_ids: Vec<String> =
            serde_json::from_str(&participant_ids).map_err(decode_err)?;
        let item_number = item_number
            .map(u32::try_from)
            .transpose()
            .map_err(decode_err)?;

        Ok(Self(EventEntry {
            id: parse(&id)?,
            event_id: parse(&event_id)?,
            submitter,
            participant_ids,
            item: ItemDetails {
                item_name: row.try_get("item_name")?,
                choreographer: row.try_get("choreographer")?,
                mastery: parse(&mastery)?,
                item_style: parse(&item_style)?,
                duration_seconds: u32::try_from(duration_seconds).map_err(decode_err)?,
            },
            calculated_fee: parse_decimal(&calculated_fee)?,
            payment_status: parse(&payment_status)?,
            approved: row.try_get("approved")?,
            item_number,
            submitted_at: parse_timestamp(&submitted_at)?,
        }))
    }
}

const INSERT: &str = "INSERT INTO event_entries (id, event_id, submitter_kind, submitter_id, participant_ids, item_name, choreographer, mastery, item_style, duration_seconds, calculated_fee, payment_status, approved, item_number, submitted_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM event_entries WHERE id = ?";
const SELECT_FOR_EVENT: &str =
    "SELECT * FROM event_entries WHERE event_id = ? ORDER BY submitted_at";
const SELECT_FOR_SUBMITTER: &str = "SELECT * FROM event_entries WHERE submitter_kind = ? AND submitter_id = ? ORDER BY submitted_at DESC";
const SELECT_BY_ITEM_NUMBER: &str =
    "SELECT * FROM event_entries WHERE event_id = ? AND item_number = ?";
const UPDATE: &str = "UPDATE event_entries SET payment_status = ?, approved = ?, item_number = ? WHERE id = ?";

/// `SQLite`-backed event entry repository.
#[derive(Clone)]
pub struct SqliteEntryRepository {
    pool: SqlitePool,
}

impl SqliteEntryRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl EntryRepository for SqliteEntryRepository {
    fn create(
        &self,
        entry: EventEntry,
    ) -> impl Future<Output = Result<EventEntry, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            let participant_ids =
                serde_json::to_string(&entry.participant_ids).map_err(StorageError::from)?;
            sqlx::query(INSERT)
                .bind(entry.id.to_string())
                .bind(entry.event_id.to_string())
                .bind(entry.submitter.kind())
                .bind(entry.submitter.id_string())
                .bind(participant_ids)
                .bind(&entry.item.item_name)
                .bind(&entry.item.choreographer)
                .bind(entry.item.mastery.as_str())
                .bind(entry.item.item_style.as_str())
                .bind(i64::from(entry.item.duration_seconds))
                .bind(entry.calculated_fee.to_string())
                .bind(entry.payment_status.as_str())
                .bind(entry.approved)
                .bind(entry.item_number.map(i64::from))
                .bind(timestamp(entry.submitted_at))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(entry)
        }
    }

    fn get_by_id(
        &self,
        id: EntryId,
    ) -> impl Future<Output = Result<Option<EventEntry>, EodsaError>> + Send {
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

    fn list_for_event(
        &self,
        event_id: EventId,
    ) -> impl Future<Output = Result<Vec<EventEntry>, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_FOR_EVENT)
                .bind(event_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn list_for_submitter(
        &self,
        submitter: Submitter,
    ) -> impl Future<Output = Result<Vec<EventEntry>, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_FOR_SUBMITTER)
                .bind(submitter.kind())
                .bind(submitter.id_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn find_by_item_number(
        &self,
        event_id: EventId,
        item_number: u32,
    ) -> impl Future<Output = Result<Option<EventEntry>, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ITEM_NUMBER)
                .bind(event_id.to_string())
                .bind(i64::from(item_number))
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn update(
        &self,
        entry: EventEntry,
    ) -> impl Future<Output = Result<EventEntry, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE)
                .bind(entry.payment_status.as_str())
                .bind(entry.approved)
                .bind(entry.item_number.map(i64::from))
                .bind(entry.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(entry)
        }
    }
}
