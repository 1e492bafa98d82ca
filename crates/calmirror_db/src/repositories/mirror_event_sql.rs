//! SQL implementation of the mirror event repository

use crate::error::{classify, DbError};
use crate::repositories::mirror_event::MirrorEventRepository;
use crate::repositories::nullable_text;
use crate::SqlStore;
use calmirror_common::{BatchOutcome, EventFieldsUpdate, EventSchedule, MirrorEvent, RecordFailure};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info, warn};

fn schedule_from_row(row: &AnyRow, date_col: &str, time_col: &str) -> Result<EventSchedule, DbError> {
    let date: String = row
        .try_get(date_col)
        .map_err(|e| DbError::CorruptRow(e.to_string()))?;
    let time = nullable_text(row, time_col).map_err(|e| DbError::CorruptRow(e.to_string()))?;
    EventSchedule::parse(&date, time.as_deref()).map_err(|e| DbError::CorruptRow(e.to_string()))
}

fn event_from_row(row: &AnyRow) -> Result<MirrorEvent, DbError> {
    let decode = |e: sqlx::Error| DbError::CorruptRow(format!("mirror_events: {}", e));
    let deleted: i64 = row.try_get("deleted").map_err(decode)?;
    Ok(MirrorEvent {
        account_id: row.try_get("account_id").map_err(decode)?,
        provider_event_id: row.try_get("provider_event_id").map_err(decode)?,
        mapping_id: nullable_text(row, "mapping_id").map_err(decode)?,
        title: row.try_get("title").map_err(decode)?,
        start: schedule_from_row(row, "start_date", "start_time")?,
        end: schedule_from_row(row, "end_date", "end_time")?,
        deleted: deleted != 0,
    })
}

impl MirrorEventRepository for SqlStore {
    async fn find_active(&self, account_id: &str) -> Result<Vec<MirrorEvent>, DbError> {
        debug!("Finding active mirror events for account: {}", account_id);

        let query = r#"
            SELECT account_id, provider_event_id, mapping_id, title,
                   start_date, start_time, end_date, end_time, deleted
            FROM mirror_events
            WHERE account_id = $1 AND deleted = 0
            ORDER BY id
        "#;

        let rows = sqlx::query(query)
            .bind(account_id)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to load mirror events: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        rows.iter().map(event_from_row).collect()
    }

    async fn insert_event(&self, event: &MirrorEvent) -> Result<(), DbError> {
        debug!(
            "Inserting mirror event {} for account {}",
            event.provider_event_id, event.account_id
        );

        let query = r#"
            INSERT INTO mirror_events
                (account_id, provider_event_id, mapping_id, title,
                 start_date, start_time, end_date, end_time, deleted)
            VALUES ($1, $2, NULLIF($3, ''), $4, $5, NULLIF($6, ''), $7, NULLIF($8, ''), $9)
        "#;

        sqlx::query(query)
            .bind(&event.account_id)
            .bind(&event.provider_event_id)
            .bind(event.mapping_id.clone().unwrap_or_default())
            .bind(&event.title)
            .bind(event.start.date_string())
            .bind(event.start.time_string().unwrap_or_default())
            .bind(event.end.date_string())
            .bind(event.end.time_string().unwrap_or_default())
            .bind(i64::from(event.deleted))
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to insert mirror event: {}", e);
                classify(e)
            })?;

        info!("Mirror event {} stored", event.provider_event_id);
        Ok(())
    }

    async fn bulk_update(
        &self,
        account_id: &str,
        updates: &[EventFieldsUpdate],
    ) -> Result<BatchOutcome, DbError> {
        debug!(
            "Updating {} mirror events for account {}",
            updates.len(),
            account_id
        );

        let query = r#"
            UPDATE mirror_events
            SET title = $1,
                start_date = $2, start_time = NULLIF($3, ''),
                end_date = $4, end_time = NULLIF($5, ''),
                updated_at = CURRENT_TIMESTAMP
            WHERE account_id = $6 AND provider_event_id = $7 AND deleted = 0
        "#;

        let mut outcome = BatchOutcome::default();
        for update in updates {
            let result = sqlx::query(query)
                .bind(&update.title)
                .bind(update.start.date_string())
                .bind(update.start.time_string().unwrap_or_default())
                .bind(update.end.date_string())
                .bind(update.end.time_string().unwrap_or_default())
                .bind(account_id)
                .bind(&update.provider_event_id)
                .execute(self.db_client.pool())
                .await;

            match result {
                Ok(done) if done.rows_affected() > 0 => outcome.applied += 1,
                Ok(_) => {
                    warn!("No active mirror row for {}", update.provider_event_id);
                    outcome.failed.push(RecordFailure::new(
                        &update.provider_event_id,
                        "no active mirror row",
                    ));
                }
                Err(e) => {
                    error!(
                        "Failed to update mirror event {}: {}",
                        update.provider_event_id, e
                    );
                    outcome
                        .failed
                        .push(RecordFailure::new(&update.provider_event_id, e));
                }
            }
        }

        Ok(outcome)
    }

    async fn bulk_soft_delete(
        &self,
        account_id: &str,
        provider_event_ids: &[String],
    ) -> Result<BatchOutcome, DbError> {
        if provider_event_ids.is_empty() {
            return Ok(BatchOutcome::default());
        }
        debug!(
            "Soft-deleting {} mirror events for account {}",
            provider_event_ids.len(),
            account_id
        );

        let placeholders = (0..provider_event_ids.len())
            .map(|i| format!("${}", i + 2))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "UPDATE mirror_events SET deleted = 1, updated_at = CURRENT_TIMESTAMP \
             WHERE account_id = $1 AND deleted = 0 AND provider_event_id IN ({})",
            placeholders
        );

        let mut statement = sqlx::query(&query).bind(account_id);
        for id in provider_event_ids {
            statement = statement.bind(id);
        }

        match statement.execute(self.db_client.pool()).await {
            // Rows another reconcile already flagged are gone either way.
            Ok(done) => Ok(BatchOutcome {
                applied: done.rows_affected() as usize,
                failed: Vec::new(),
            }),
            Err(e) => {
                error!("Failed to soft-delete mirror events: {}", e);
                let reason = e.to_string();
                Ok(BatchOutcome {
                    applied: 0,
                    failed: provider_event_ids
                        .iter()
                        .map(|id| RecordFailure::new(id, &reason))
                        .collect(),
                })
            }
        }
    }
}
