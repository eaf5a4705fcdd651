//! # Repository Module
//!
//! A generic CRUD repository shared by every entity, plus the entity-specific
//! lookups layered on top of it.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Generic Repository                                   │
//! │                                                                         │
//! │  Repository<M: Table>                                                   │
//! │  ├── create / create_with_tx      INSERT + outbox row ("<entity>.create")│
//! │  ├── update / update_with_tx      UPDATE + outbox row ("<entity>.update")│
//! │  ├── delete / delete_with_tx      soft delete + outbox row              │
//! │  ├── get_by_id / find / find_one / list / count                         │
//! │  ├── preload                      eager-load M::PRELOADS                │
//! │  └── to_model                     nil-safe response projection          │
//! │       │                                                                 │
//! │       │  Table: TABLE, COLUMNS, values()                                │
//! │       ▼                                                                 │
//! │  SQLite                                                                 │
//! │                                                                         │
//! │  impl Repository<Currency>     { find_by_code, get_default, ... }       │
//! │  impl Repository<Holiday>      { current_branch, years_available, ... } │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Transactions
//! `_with_tx` variants run on a caller-owned `&mut SqliteConnection`
//! (usually `&mut *tx`). They never commit or roll back. The plain variants
//! open and commit their own transaction.
//!
//! Soft-deleted rows are hidden from every read unless the filter opts in
//! with [`Filter::include_deleted`].

pub mod bill_and_coins;
pub mod check_remittance;
pub mod currency;
pub mod holiday;
pub mod outbox;
pub mod related;

use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use coop_core::{
    Amount, Audit, EventTopics, OutboxEvent, Preload, Record, Related, Resource, TopicAction,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

pub use outbox::OutboxRepository;
pub use related::RelatedRepository;

pub type CurrencyRepository = Repository<coop_core::Currency>;
pub type BillAndCoinsRepository = Repository<coop_core::BillAndCoins>;
pub type HolidayRepository = Repository<coop_core::Holiday>;
pub type CheckRemittanceRepository = Repository<coop_core::CheckRemittance>;

// =============================================================================
// Table
// =============================================================================

/// Maps an entity onto its SQLite table.
pub trait Table:
    for<'r> FromRow<'r, SqliteRow> + Resource + EventTopics + Related + Send + Sync + Unpin + 'static
{
    const TABLE: &'static str;

    /// Column names, `id` first. `values()` returns one value per column in
    /// the same order.
    const COLUMNS: &'static [&'static str];

    fn record(&self) -> &Record;

    fn record_mut(&mut self) -> &mut Record;

    /// Audit columns, for entities that carry them.
    fn audit_mut(&mut self) -> Option<&mut Audit> {
        None
    }

    fn values(&self) -> Vec<Value>;

    /// JSON response projection stored in the outbox.
    fn payload(&self) -> serde_json::Result<serde_json::Value>;
}

// =============================================================================
// Values and Filters
// =============================================================================

/// A bindable column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Uuid(Uuid),
    NullableUuid(Option<Uuid>),
    Text(String),
    Timestamp(DateTime<Utc>),
    NullableTimestamp(Option<DateTime<Utc>>),
    Integer(i64),
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<Option<Uuid>> for Value {
    fn from(v: Option<Uuid>) -> Self {
        Value::NullableUuid(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

/// Decimal amounts are stored as their exact text form.
impl From<Amount> for Value {
    fn from(v: Amount) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<Option<DateTime<Utc>>> for Value {
    fn from(v: Option<DateTime<Utc>>) -> Self {
        Value::NullableTimestamp(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

/// Binds a sequence of [`Value`]s onto a `query`, `query_as` or
/// `query_scalar` builder.
macro_rules! bind_values {
    ($query:expr, $values:expr) => {{
        let mut query = $query;
        for value in $values {
            query = match value {
                $crate::repository::Value::Uuid(v) => query.bind(v),
                $crate::repository::Value::NullableUuid(v) => query.bind(v),
                $crate::repository::Value::Text(v) => query.bind(v),
                $crate::repository::Value::Timestamp(v) => query.bind(v),
                $crate::repository::Value::NullableTimestamp(v) => query.bind(v),
                $crate::repository::Value::Integer(v) => query.bind(v),
            };
        }
        query
    }};
}
pub(crate) use bind_values;

#[derive(Debug, Clone, PartialEq)]
enum Condition {
    Eq(&'static str, Value),
    Gte(&'static str, Value),
    Lt(&'static str, Value),
}

/// Column conditions joined with `AND`.
///
/// ## Example
/// ```rust,ignore
/// let filter = Filter::new()
///     .tenant(organization_id, branch_id)
///     .eq("currency_id", currency.record.id);
/// let holidays = db.holidays().find(filter).await?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
    include_deleted: bool,
}

impl Filter {
    pub fn new() -> Self {
        Filter::default()
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq(column, value.into()));
        self
    }

    pub fn gte(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Gte(column, value.into()));
        self
    }

    pub fn lt(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Lt(column, value.into()));
        self
    }

    /// Restricts to rows owned by one organization and branch.
    pub fn tenant(self, organization_id: Uuid, branch_id: Uuid) -> Self {
        self.eq("organization_id", organization_id)
            .eq("branch_id", branch_id)
    }

    /// Also returns soft-deleted rows.
    pub fn include_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    fn where_clause(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.conditions.len() + 1);
        if !self.include_deleted {
            parts.push("deleted_at IS NULL".to_string());
        }
        for condition in &self.conditions {
            parts.push(match condition {
                Condition::Eq(column, _) => format!("{} = ?", column),
                Condition::Gte(column, _) => format!("{} >= ?", column),
                Condition::Lt(column, _) => format!("{} < ?", column),
            });
        }

        if parts.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", parts.join(" AND "))
        }
    }

    fn into_values(self) -> Vec<Value> {
        self.conditions
            .into_iter()
            .map(|condition| match condition {
                Condition::Eq(_, v) | Condition::Gte(_, v) | Condition::Lt(_, v) => v,
            })
            .collect()
    }
}

// =============================================================================
// Repository
// =============================================================================

/// CRUD repository for one entity type.
pub struct Repository<M> {
    pool: SqlitePool,
    _entity: PhantomData<fn() -> M>,
}

impl<M> Clone for Repository<M> {
    fn clone(&self) -> Self {
        Repository {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<M: Table> fmt::Debug for Repository<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("table", &M::TABLE)
            .finish()
    }
}

impl<M: Table> Repository<M> {
    pub fn new(pool: SqlitePool) -> Self {
        Repository {
            pool,
            _entity: PhantomData,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn select_sql(filter: &Filter) -> String {
        format!(
            "SELECT {} FROM {} {} ORDER BY created_at ASC, rowid ASC",
            M::COLUMNS.join(", "),
            M::TABLE,
            filter.where_clause()
        )
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    /// Inserts `entity` and its `create` outbox event in one transaction.
    pub async fn create(&self, entity: &M) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        self.create_with_tx(&mut tx, entity).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn create_with_tx(&self, conn: &mut SqliteConnection, entity: &M) -> DbResult<()> {
        debug!(entity = M::ENTITY, id = %entity.record().id, "Creating");

        let placeholders = vec!["?"; M::COLUMNS.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            M::TABLE,
            M::COLUMNS.join(", "),
            placeholders
        );

        bind_values!(sqlx::query::<Sqlite>(&sql), entity.values())
            .execute(&mut *conn)
            .await?;

        self.record_event(conn, entity, TopicAction::Create).await
    }

    /// Writes every column of `entity` back to its row.
    pub async fn update(&self, entity: &M) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        self.update_with_tx(&mut tx, entity).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn update_with_tx(&self, conn: &mut SqliteConnection, entity: &M) -> DbResult<()> {
        debug!(entity = M::ENTITY, id = %entity.record().id, "Updating");

        self.write_row(conn, entity).await?;
        self.record_event(conn, entity, TopicAction::Update).await
    }

    /// Soft-deletes the row, recording `actor` for audited entities.
    ///
    /// Returns the entity as it was marked deleted.
    pub async fn delete(&self, id: Uuid, actor: Option<Uuid>) -> DbResult<M> {
        let mut tx = self.pool.begin().await?;
        let entity = self.delete_with_tx(&mut tx, id, actor).await?;
        tx.commit().await?;
        Ok(entity)
    }

    pub async fn delete_with_tx(
        &self,
        conn: &mut SqliteConnection,
        id: Uuid,
        actor: Option<Uuid>,
    ) -> DbResult<M> {
        debug!(entity = M::ENTITY, id = %id, "Soft deleting");

        let mut entity = self.get_by_id_with_tx(conn, id).await?;
        let now = Utc::now();

        entity.record_mut().deleted_at = Some(now);
        entity.record_mut().touch(now);
        if let Some(audit) = entity.audit_mut() {
            audit.deleted_by_id = actor;
        }

        self.write_row(conn, &entity).await?;
        self.record_event(conn, &entity, TopicAction::Delete).await?;
        Ok(entity)
    }

    async fn write_row(&self, conn: &mut SqliteConnection, entity: &M) -> DbResult<()> {
        let mut assignments = Vec::with_capacity(M::COLUMNS.len());
        let mut values = Vec::with_capacity(M::COLUMNS.len());
        for (column, value) in M::COLUMNS.iter().zip(entity.values()) {
            if *column == "id" {
                continue;
            }
            assignments.push(format!("{} = ?", column));
            values.push(value);
        }
        values.push(Value::Uuid(entity.record().id));

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?",
            M::TABLE,
            assignments.join(", ")
        );

        let result = bind_values!(sqlx::query::<Sqlite>(&sql), values)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(M::ENTITY, entity.record().id.to_string()));
        }
        Ok(())
    }

    async fn record_event(
        &self,
        conn: &mut SqliteConnection,
        entity: &M,
        action: TopicAction,
    ) -> DbResult<()> {
        let event = OutboxEvent::record(entity, action, entity.payload()?, Utc::now());
        OutboxRepository::insert_with_tx(conn, &event).await
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Fetches a live row by id.
    ///
    /// ## Errors
    /// `DbError::NotFound` when the id doesn't exist or the row is soft-deleted.
    pub async fn get_by_id(&self, id: Uuid) -> DbResult<M> {
        let mut conn = self.pool.acquire().await?;
        self.get_by_id_with_tx(&mut conn, id).await
    }

    pub async fn get_by_id_with_tx(&self, conn: &mut SqliteConnection, id: Uuid) -> DbResult<M> {
        self.find_one_with_tx(conn, Filter::new().eq("id", id))
            .await?
            .ok_or_else(|| DbError::not_found(M::ENTITY, id.to_string()))
    }

    pub async fn find(&self, filter: Filter) -> DbResult<Vec<M>> {
        let mut conn = self.pool.acquire().await?;
        self.find_with_tx(&mut conn, filter).await
    }

    pub async fn find_with_tx(&self, conn: &mut SqliteConnection, filter: Filter) -> DbResult<Vec<M>> {
        let sql = Self::select_sql(&filter);
        let rows = bind_values!(sqlx::query_as::<Sqlite, M>(&sql), filter.into_values())
            .fetch_all(&mut *conn)
            .await?;

        debug!(entity = M::ENTITY, count = rows.len(), "Found rows");
        Ok(rows)
    }

    /// First matching row, if any.
    pub async fn find_one(&self, filter: Filter) -> DbResult<Option<M>> {
        let mut conn = self.pool.acquire().await?;
        self.find_one_with_tx(&mut conn, filter).await
    }

    pub async fn find_one_with_tx(
        &self,
        conn: &mut SqliteConnection,
        filter: Filter,
    ) -> DbResult<Option<M>> {
        let sql = format!("{} LIMIT 1", Self::select_sql(&filter));
        let row = bind_values!(sqlx::query_as::<Sqlite, M>(&sql), filter.into_values())
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }

    /// Every live row.
    pub async fn list(&self) -> DbResult<Vec<M>> {
        self.find(Filter::new()).await
    }

    pub async fn list_with_tx(&self, conn: &mut SqliteConnection) -> DbResult<Vec<M>> {
        self.find_with_tx(conn, Filter::new()).await
    }

    pub async fn count(&self, filter: Filter) -> DbResult<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} {}",
            M::TABLE,
            filter.where_clause()
        );
        let count: i64 = bind_values!(sqlx::query_scalar::<Sqlite, i64>(&sql), filter.into_values())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // -------------------------------------------------------------------------
    // Preload / projection
    // -------------------------------------------------------------------------

    /// Eager-loads the entity's default `PRELOADS`.
    pub async fn preload(&self, entity: &mut M) -> DbResult<()> {
        self.preload_with(entity, M::PRELOADS).await
    }

    /// Eager-loads an explicit set of relations.
    pub async fn preload_with(&self, entity: &mut M, preloads: &[Preload]) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        self.preload_with_tx(&mut conn, entity, preloads).await
    }

    pub async fn preload_with_tx(
        &self,
        conn: &mut SqliteConnection,
        entity: &mut M,
        preloads: &[Preload],
    ) -> DbResult<()> {
        for &preload in preloads {
            let Some(id) = entity.relation_id(preload) else {
                continue;
            };
            if let Some(relation) = RelatedRepository::load_with_tx(conn, preload, id).await? {
                entity.attach(preload, relation);
            }
        }
        Ok(())
    }

    /// Preloads every entity in `entities`.
    pub async fn preload_all(&self, entities: &mut [M]) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        for entity in entities.iter_mut() {
            self.preload_with_tx(&mut conn, entity, M::PRELOADS).await?;
        }
        Ok(())
    }

    /// Nil-safe projection into the API response.
    pub fn to_model(entity: Option<&M>) -> Option<M::Response> {
        M::resource(entity)
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================
