//! SQL implementation of the account repository

use crate::error::{classify, DbError};
use crate::repositories::account::AccountRepository;
use crate::repositories::nullable_text;
use crate::SqlStore;
use calmirror_common::{Account, AccountCredentials};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info};

const SELECT_ACCOUNT: &str = r#"
    SELECT id, email, google_id, access_token, refresh_token, expiry_date
    FROM accounts
"#;

fn account_from_row(row: &AnyRow) -> Result<Account, DbError> {
    let decode = |e: sqlx::Error| DbError::CorruptRow(format!("accounts: {}", e));
    // Stored as text: the Any driver narrows SQLite integers to 32 bits.
    let expiry = nullable_text(row, "expiry_date").map_err(decode)?;
    Ok(Account {
        id: row.try_get("id").map_err(decode)?,
        email: row.try_get("email").map_err(decode)?,
        google_id: row.try_get("google_id").map_err(decode)?,
        access_token: row.try_get("access_token").map_err(decode)?,
        refresh_token: nullable_text(row, "refresh_token").map_err(decode)?,
        expiry_date: expiry
            .map(|millis| millis.parse::<i64>())
            .transpose()
            .map_err(|e| DbError::CorruptRow(format!("accounts.expiry_date: {}", e)))?,
    })
}

impl SqlStore {
    async fn find_account_where(&self, column: &str, value: &str) -> Result<Option<Account>, DbError> {
        let query = format!("{} WHERE {} = $1", SELECT_ACCOUNT, column);
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find account by {}: {}", column, e);
                DbError::QueryError(e.to_string())
            })?;

        row.as_ref().map(account_from_row).transpose()
    }
}

impl AccountRepository for SqlStore {
    async fn upsert_by_email(&self, credentials: AccountCredentials) -> Result<Account, DbError> {
        debug!("Upserting account for email: {}", credentials.email);

        let new_id = uuid::Uuid::new_v4().simple().to_string();
        // NULLIF turns the empty sentinels back into NULL, so COALESCE keeps
        // the stored values when the caller has none.
        let query = r#"
            INSERT INTO accounts (id, email, google_id, access_token, refresh_token, expiry_date)
            VALUES ($1, $2, $3, $4, NULLIF($5, ''), NULLIF($6, ''))
            ON CONFLICT(email) DO UPDATE SET
                google_id = excluded.google_id,
                access_token = excluded.access_token,
                refresh_token = COALESCE(excluded.refresh_token, accounts.refresh_token),
                expiry_date = COALESCE(excluded.expiry_date, accounts.expiry_date),
                updated_at = CURRENT_TIMESTAMP
        "#;

        sqlx::query(query)
            .bind(&new_id)
            .bind(&credentials.email)
            .bind(&credentials.google_id)
            .bind(&credentials.access_token)
            .bind(credentials.refresh_token.clone().unwrap_or_default())
            .bind(
                credentials
                    .expiry_date
                    .map(|millis| millis.to_string())
                    .unwrap_or_default(),
            )
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to upsert account: {}", e);
                classify(e)
            })?;

        let account = self
            .find_account_where("email", &credentials.email)
            .await?
            .ok_or_else(|| DbError::QueryError("Upserted account vanished".to_string()))?;

        info!("Account {} stored for {}", account.id, account.email);
        Ok(account)
    }

    async fn find_by_id(&self, account_id: &str) -> Result<Option<Account>, DbError> {
        debug!("Finding account: {}", account_id);
        self.find_account_where("id", account_id).await
    }
}
