//! SQL implementation of the field mapping repository

use crate::error::{classify, DbError};
use crate::repositories::field_mapping::FieldMappingRepository;
use crate::SqlStore;
use calmirror_common::{FieldMapping, MappingColumn};
use chrono::{DateTime, Utc};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info};

fn mapping_from_row(row: &AnyRow) -> Result<FieldMapping, DbError> {
    let decode = |e: sqlx::Error| DbError::CorruptRow(format!("field_mappings: {}", e));
    let columns: String = row.try_get("columns").map_err(decode)?;
    let is_active: i64 = row.try_get("is_active").map_err(decode)?;
    let created_at: String = row.try_get("created_at").map_err(decode)?;

    Ok(FieldMapping {
        id: row.try_get("id").map_err(decode)?,
        account_id: row.try_get("account_id").map_err(decode)?,
        columns: serde_json::from_str(&columns)
            .map_err(|e| DbError::CorruptRow(format!("field_mappings.columns: {}", e)))?,
        is_active: is_active != 0,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .ok()
            .map(|at| at.with_timezone(&Utc)),
    })
}

impl FieldMappingRepository for SqlStore {
    async fn replace_active(
        &self,
        account_id: &str,
        columns: &[MappingColumn],
    ) -> Result<FieldMapping, DbError> {
        debug!("Replacing active field mapping for account: {}", account_id);

        let mapping = FieldMapping {
            id: uuid::Uuid::new_v4().simple().to_string(),
            account_id: account_id.to_string(),
            columns: columns.to_vec(),
            is_active: true,
            created_at: Some(Utc::now()),
        };
        let columns_json = serde_json::to_string(&mapping.columns)
            .map_err(|e| DbError::QueryError(format!("Failed to encode columns: {}", e)))?;
        let created_at = mapping
            .created_at
            .map(|at| at.to_rfc3339())
            .unwrap_or_default();

        let mut tx = self.db_client.begin().await?;

        sqlx::query("UPDATE field_mappings SET is_active = 0 WHERE account_id = $1 AND is_active = 1")
            .bind(account_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("Failed to deactivate field mappings: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        sqlx::query(
            r#"
            INSERT INTO field_mappings (id, account_id, columns, is_active, created_at)
            VALUES ($1, $2, $3, 1, $4)
            "#,
        )
        .bind(&mapping.id)
        .bind(account_id)
        .bind(&columns_json)
        .bind(&created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to insert field mapping: {}", e);
            classify(e)
        })?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))?;

        info!(
            "Field mapping {} is now active for account {}",
            mapping.id, account_id
        );
        Ok(mapping)
    }

    async fn find_active_mapping(&self, account_id: &str) -> Result<Option<FieldMapping>, DbError> {
        debug!("Finding active field mapping for account: {}", account_id);

        let query = r#"
            SELECT id, account_id, columns, is_active, created_at
            FROM field_mappings
            WHERE account_id = $1 AND is_active = 1
        "#;

        let row = sqlx::query(query)
            .bind(account_id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find field mapping: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        row.as_ref().map(mapping_from_row).transpose()
    }
}
