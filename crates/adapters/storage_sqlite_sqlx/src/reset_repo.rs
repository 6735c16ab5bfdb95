//! `SQLite` implementation of [`PasswordResetRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use eodsa_app::ports::PasswordResetRepository;
use eodsa_domain::credential::{CredentialAccount, PasswordReset};
use eodsa_domain::error::{EodsaError, ValidationError};
use eodsa_domain::time::Timestamp;

use crate::codec::{decode_err, parse, parse_timestamp, parse_timestamp_opt, timestamp};
use crate::error::StorageError;

struct Wrapper(PasswordReset);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let account_kind: String = row.try_get("account_kind")?;
        let account_id: String = row.try_get("account_id")?;
        let expires_at: String = row.try_get("expires_at")?;
        let used_at: Option<String> = row.try_get("used_at")?;

        let account = match account_kind.as_str() {
            "studio" => CredentialAccount::Studio(parse(&account_id)?),
            "judge" => CredentialAccount::Judge(parse(&account_id)?),
            other => {
                return Err(decode_err(ValidationError::UnknownVariant {
                    kind: "account",
                    value: other.to_string(),
                }));
            }
        };

        Ok(Self(PasswordReset {
            token: row.try_get("token")?,
            account,
            expires_at: parse_timestamp(&expires_at)?,
            used_at: parse_timestamp_opt(used_at)?,
        }))
    }
}

fn account_parts(account: CredentialAccount) -> (&'static str, String) {
    match account {
        CredentialAccount::Studio(id) => ("studio", id.to_string()),
        CredentialAccount::Judge(id) => ("judge", id.to_string()),
    }
}

const INSERT: &str = "INSERT INTO password_resets (token, account_kind, account_id, expires_at, used_at) VALUES (?, ?, ?, ?, ?)";
const SELECT_BY_TOKEN: &str = "SELECT * FROM password_resets WHERE token = ?";
const MARK_USED: &str =
    "UPDATE password_resets SET used_at = ? WHERE token = ? AND used_at IS NULL";

/// `SQLite`-backed store of password reset tokens.
#[derive(Clone)]
pub struct SqlitePasswordResetRepository {
    pool: SqlitePool,
}

impl SqlitePasswordResetRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl PasswordResetRepository for SqlitePasswordResetRepository {
    fn create(
        &self,
        reset: PasswordReset,
    ) -> impl Future<Output = Result<PasswordReset, EodsaError>> + Send {
        let pool = self.pool.clone();
        async move {
            let (kind, id) = account_parts(reset.account);
            sqlx::query(INSERT)
                .bind(&reset.token)
                .bind(kind)
                .bind(id)
                .bind(timestamp(reset.expires_at))
                .bind(reset.used_at.map(timestamp))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(reset)
        }
    }

    fn get(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<PasswordReset>, EodsaError>> + Send {
        let pool = self.pool.clone();
        let token = token.to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_TOKEN)
                .bind(token)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|w| w.0))
        }
    }

    fn mark_used(
        &self,
        token: &str,
        at: Timestamp,
    ) -> impl Future<Output = Result<bool, EodsaError>> + Send {
        let pool = self.pool.clone();
        let token = token.to_string();
        async move {
            let result = sqlx::query(MARK_USED)
                .bind(timestamp(at))
                .bind(token)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected() == 1)
        }
    }
}
