//! # Event Outbox Repository
//!
//! Durable queue of topic events produced by repository writes.
//!
//! ## The Outbox Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Outbox Pattern Implementation                        │
//! │                                                                         │
//! │  Repository<M>::create_with_tx(tx, holiday)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   SINGLE TRANSACTION                            │   │
//! │  │                                                                 │   │
//! │  │  1. INSERT INTO holidays (...)                                  │   │
//! │  │                                                                 │   │
//! │  │  2. INSERT INTO event_outbox (entity, action, topics, payload)  │   │
//! │  │     VALUES ('holiday', 'create',                                │   │
//! │  │             ["holiday.create", "holiday.create.<id>", ...],     │   │
//! │  │             <HolidayResponse JSON>)                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT ← both rows or neither                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            RELAY (external)                                     │   │
//! │  │  pending(limit) → publish topics → mark_dispatched(id)          │   │
//! │  │                                  └→ mark_failed(id, error)      │   │
//! │  │  purge_dispatched(days) → drop rows already published           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use coop_core::{OutboxEvent, TopicAction};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Repository for event outbox operations.
#[derive(Debug, Clone)]
pub struct OutboxRepository {
    pool: SqlitePool,
}

#[derive(Debug, FromRow)]
struct OutboxRow {
    id: Uuid,
    entity: String,
    action: String,
    entity_id: Uuid,
    topics: String,
    payload: String,
    attempts: i64,
    last_error: Option<String>,
    created_at: DateTime<Utc>,
    attempted_at: Option<DateTime<Utc>>,
    dispatched_at: Option<DateTime<Utc>>,
}

impl TryFrom<OutboxRow> for OutboxEvent {
    type Error = DbError;

    fn try_from(row: OutboxRow) -> DbResult<Self> {
        let action = TopicAction::from_name(&row.action).ok_or_else(|| {
            DbError::Internal(format!("unknown outbox action '{}'", row.action))
        })?;

        Ok(OutboxEvent {
            id: row.id,
            entity: row.entity,
            action,
            entity_id: row.entity_id,
            topics: serde_json::from_str(&row.topics)?,
            payload: serde_json::from_str(&row.payload)?,
            attempts: row.attempts,
            last_error: row.last_error,
            created_at: row.created_at,
            attempted_at: row.attempted_at,
            dispatched_at: row.dispatched_at,
        })
    }
}

impl OutboxRepository {
    /// Creates a new OutboxRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OutboxRepository { pool }
    }

    /// Writes an event on the caller's transaction.
    pub async fn insert_with_tx(conn: &mut SqliteConnection, event: &OutboxEvent) -> DbResult<()> {
        debug!(
            entity = %event.entity,
            action = %event.action,
            entity_id = %event.entity_id,
            topics = event.topics.len(),
            "Recording outbox event"
        );

        let topics = serde_json::to_string(&event.topics)?;
        let payload = serde_json::to_string(&event.payload)?;

        sqlx::query(
            r#"
            INSERT INTO event_outbox (
                id, entity, action, entity_id, topics, payload,
                attempts, last_error, created_at, attempted_at, dispatched_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(event.id)
        .bind(&event.entity)
        .bind(event.action.as_str())
        .bind(event.entity_id)
        .bind(topics)
        .bind(payload)
        .bind(event.attempts)
        .bind(&event.last_error)
        .bind(event.created_at)
        .bind(event.attempted_at)
        .bind(event.dispatched_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Undispatched events, oldest first.
    pub async fn pending(&self, limit: u32) -> DbResult<Vec<OutboxEvent>> {
        let rows = sqlx::query_as::<_, OutboxRow>(
            r#"
            SELECT id, entity, action, entity_id, topics, payload,
                   attempts, last_error, created_at, attempted_at, dispatched_at
            FROM event_outbox
            WHERE dispatched_at IS NULL
            ORDER BY created_at ASC, rowid ASC
            LIMIT ?1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OutboxEvent::try_from).collect()
    }

    /// Events recorded for one entity row, oldest first.
    pub async fn for_entity(&self, entity_id: Uuid) -> DbResult<Vec<OutboxEvent>> {
        let rows = sqlx::query_as::<_, OutboxRow>(
            r#"
            SELECT id, entity, action, entity_id, topics, payload,
                   attempts, last_error, created_at, attempted_at, dispatched_at
            FROM event_outbox
            WHERE entity_id = ?1
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .bind(entity_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OutboxEvent::try_from).collect()
    }

    /// Marks an event as published.
    pub async fn mark_dispatched(&self, id: Uuid) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE event_outbox SET
                dispatched_at = ?2,
                attempted_at = ?2,
                attempts = attempts + 1
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("event_outbox", id.to_string()));
        }
        Ok(())
    }

    /// Records a failed publish attempt. The event stays pending.
    pub async fn mark_failed(&self, id: Uuid, error: &str) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE event_outbox SET
                attempts = attempts + 1,
                last_error = ?2,
                attempted_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(error)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("event_outbox", id.to_string()));
        }
        Ok(())
    }

    /// Deletes events dispatched more than `older_than_days` days ago.
    ///
    /// Pending events are never purged. Returns the number of rows deleted.
    pub async fn purge_dispatched(&self, older_than_days: u32) -> DbResult<u64> {
        let cutoff = Utc::now() - Duration::days(i64::from(older_than_days));

        let result = sqlx::query(
            r#"
            DELETE FROM event_outbox
            WHERE dispatched_at IS NOT NULL
            AND dispatched_at < ?1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        debug!(
            older_than_days,
            purged = result.rows_affected(),
            "Purged dispatched outbox events"
        );
        Ok(result.rows_affected())
    }

    pub async fn count_pending(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM event_outbox WHERE dispatched_at IS NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
