//! Storage-specific error type wrapping sqlx errors.

use eodsa_domain::error::{ConflictError, EodsaError};

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to serialize or deserialize a stored JSON value.
    #[error("JSON serialization error")]
    Json(#[from] serde_json::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for EodsaError {
    fn from(err: StorageError) -> Self {
        if let StorageError::Database(sqlx::Error::Database(db)) = &err
            && db.is_unique_violation()
        {
            return conflict(db.message()).into();
        }
        Self::Storage(Box::new(err))
    }
}

/// Map `SQLite`'s "UNIQUE constraint failed: table.column[, ...]" message
/// onto the conflict it stands for. Only the first column matters.
fn conflict(message: &str) -> ConflictError {
    let column = message
        .rsplit(": ")
        .next()
        .and_then(|columns| columns.split(',').next())
        .map_or("", str::trim);
    let (entity, field) = match column {
        "studio_applications.dancer_id" => return ConflictError::AlreadyApplied,
        "dancers.national_id" => ("dancer", "national id"),
        "dancers.email" => ("dancer", "email"),
        "dancers.eodsa_id" => ("dancer", "eodsa id"),
        "studios.email" => ("studio", "email"),
        "studios.registration_number" => ("studio", "registration number"),
        "event_entries.event_id" => ("entry", "item number"),
        "judges.email" => ("judge", "email"),
        "scores.judge_id" => ("score", "judge and entry"),
        other => {
            tracing::warn!(constraint = other, "unmapped unique constraint");
            ("record", "key")
        }
    };
    ConflictError::Duplicate { entity, field }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_single_column_constraint() {
        assert_eq!(
            conflict("UNIQUE constraint failed: dancers.national_id"),
            ConflictError::Duplicate {
                entity: "dancer",
                field: "national id"
            }
        );
    }

    #[test]
    fn should_map_composite_constraint_by_first_column() {
        assert_eq!(
            conflict("UNIQUE constraint failed: scores.judge_id, scores.entry_id"),
            ConflictError::Duplicate {
                entity: "score",
                field: "judge and entry"
            }
        );
        assert_eq!(
            conflict(
                "UNIQUE constraint failed: studio_applications.dancer_id, studio_applications.studio_id"
            ),
            ConflictError::AlreadyApplied
        );
    }
}
