//! `SQLite` implementation of [`ScoreRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use eodsa_app::ports::ScoreRepository;
use eodsa_domain::error::EodsaError;
use eodsa_domain::id::{EntryId, JudgeId};
use eodsa_domain::score::{Marks, Score};

use crate::codec::{decode_err, parse, parse_timestamp, timestamp};
use crate::error::StorageError;

struct Wrapper(Score);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let judge_id: String = row.try_get("judge_id")?;
        let entry_id: String = row.try_get("entry_id")?;
        let submitted_at: String = row.try_get("submitted_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        let marks = Marks::new(
            row.try_get("technique")?,
            row.try_get("artistry")?,
            row.try_get("presentation")?,
            row.try_get("overall")?,
        )
        .map_err(decode_err)?;

        Ok(Self(Score {
            id: parse(&id)?,
            judge_id: parse(&judge_id)?,
            entry_id: parse(&entry_id)?,
            marks,
            comments: row.try_get("comments")?,
            submitted_at: parse_timestamp(&submitted_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        }))
    }
}

const INSERT: &str = "INSERT INTO scores (id, judge_id, entry_id, technique, artistry, presentation, overall, comments, submitted_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
const SELECT_ONE: &str = "SELECT * FROM scores WHERE judge_id = ? AND entry_id = ?";
const SELECT_FOR_ENTRY: &str = "SELECT * FROM scores WHERE entry_id = ? ORDER BY submitted_at";
const SELECT_ALL: &str = "SELECT * FROM scores";
const UPDATE: &str = "UPDATE scores SET technique = ?, artistry = ?, presentation = ?, overall = ?, comments = ?, updated_at = ? WHERE id = ?";

/// `SQLite`-backed score repository.
#[derive(Clone)]
pub struct SqliteScoreRepository {
    pool: SqlitePool,
}

impl SqliteScoreRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ScoreRepository for SqliteScoreRepository {
    fn create(&self, score: Score) -> impl Future<Output = Result<Score, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(score.id.to_string())
                .bind(score.judge_id.to_string())
                .bind(score.entry_id.to_string())
                .bind(i64::from(score.marks.technique))
                .bind(i64::from(score.marks.artistry))
                .bind(i64::from(score.marks.presentation))
                .bind(i64::from(score.marks.overall))
                .bind(&score.comments)
                .bind(timestamp(score.submitted_at))
                .bind(timestamp(score.updated_at))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(score)
        }
    }

    fn find(
        &self,
        judge_id: JudgeId,
        entry_id: EntryId,
    ) -> impl Future<Output = Result<Option<Score>, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_ONE)
                .bind(judge_id.to_string())
                .bind(entry_id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|w| w.0))
        }
    }

    fn update(&self, score: Score) -> impl Future<Output = Result<Score, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE)
                .bind(i64::from(score.marks.technique))
                .bind(i64::from(score.marks.artistry))
                .bind(i64::from(score.marks.presentation))
                .bind(i64::from(score.marks.overall))
                .bind(&score.comments)
                .bind(timestamp(score.updated_at))
                .bind(score.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(score)
        }
    }

    fn list_for_entry(
        &self,
        entry_id: EntryId,
    ) -> impl Future<Output = Result<Vec<Score>, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_FOR_ENTRY)
                .bind(entry_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn list_all(&self) -> impl Future<Output = Result<Vec<Score>, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{event, memory_pool};
    use crate::{SqliteEntryRepository, SqliteEventRepository};
    use eodsa_app::ports::{EntryRepository, EventRepository};
    use eodsa_domain::entry::{EventEntry, ItemDetails, Submitter};
    use eodsa_domain::id::DancerId;
    use eodsa_domain::performance::{ItemStyle, MasteryLevel, PerformanceType};
    use eodsa_domain::time::now;

    async fn setup() -> (SqliteScoreRepository, EntryId) {
        let pool = memory_pool().await;
        let event = SqliteEventRepository::new(pool.clone())
            .create(event(PerformanceType::Solo))
            .await
            .unwrap();
        let dancer = DancerId::new();
        let entry = EventEntry::new(
            &event,
            Submitter::Dancer(dancer),
            vec![dancer.to_string()],
            ItemDetails {
                item_name: "Swan".to_string(),
                choreographer: "Self".to_string(),
                mastery: MasteryLevel::Open,
                item_style: ItemStyle::Ballet,
                duration_seconds: 120,
            },
        )
        .unwrap();
        let entry = SqliteEntryRepository::new(pool.clone())
            .create(entry)
            .await
            .unwrap();
        (SqliteScoreRepository::new(pool), entry.id)
    }

    fn marks(value: i64) -> Marks {
        Marks::new(value, value, value, value).unwrap()
    }

    #[tokio::test]
    async fn should_enforce_one_score_per_judge_and_entry() {
        let (repo, entry_id) = setup().await;
        let judge = JudgeId::new();
        repo.create(Score::new(judge, entry_id, marks(6), None))
            .await
            .unwrap();

        let result = repo.create(Score::new(judge, entry_id, marks(7), None)).await;
        assert!(result.is_err_and(|err| err.is_duplicate("score", "judge and entry")));
        repo.create(Score::new(JudgeId::new(), entry_id, marks(7), None))
            .await
            .unwrap();
        assert_eq!(repo.list_for_entry(entry_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn should_revise_marks_in_place() {
        let (repo, entry_id) = setup().await;
        let judge = JudgeId::new();
        let mut score = repo
            .create(Score::new(judge, entry_id, marks(4), None))
            .await
            .unwrap();
        score.revise(marks(9), Some("Much stronger".to_string()), now());
        repo.update(score.clone()).await.unwrap();

        let stored = repo.find(judge, entry_id).await.unwrap().unwrap();
        assert_eq!(stored.id, score.id);
        assert_eq!(stored.marks.total(), 36);
        assert_eq!(stored.comments.as_deref(), Some("Much stronger"));
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }
}
