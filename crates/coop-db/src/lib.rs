//! # coop-db: Database Layer for the Coop Back-Office
//!
//! SQLite persistence for currencies, bill and coin denominations, check
//! remittances and holidays, with an event outbox and the reference data
//! seed routines.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Coop Back-Office Data Flow                         │
//! │                                                                         │
//! │  API handler / onboarding / seed binary                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     coop-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repository<M>│    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  currencies   │    │  (embedded)  │  │   │
//! │  │   │               │    │ bill_and_coins│    │              │  │   │
//! │  │   │ SqlitePool    │◄───│  holidays     │    │ 001_initial  │  │   │
//! │  │   │ DbConfig      │    │  remittances  │    │              │  │   │
//! │  │   └───────────────┘    │  outbox       │    └──────────────┘  │   │
//! │  │                        └───────┬───────┘                       │   │
//! │  │                                │                               │   │
//! │  │                        ┌───────▼───────┐                       │   │
//! │  │                        │    Seeder     │ ← coop-core reference │   │
//! │  │                        └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (COOP_DB_PATH, default ./coop_dev.db)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Generic repository, entity lookups, outbox
//! - [`seed`] - Currency, denomination and holiday seeding
//!
//! ## Usage
//!
//! ```rust,ignore
//! use coop_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()?).await?;
//!
//! let mut tx = db.begin().await?;
//! db.seeder()?.seed_branch(&mut tx, user_id, organization_id, branch_id).await?;
//! tx.commit().await?;
//!
//! let peso = db.currencies().find_by_code("PHP").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, DbError, DbResult, ResultExt};
pub use pool::{Database, DbConfig};
pub use seed::{SeedSummary, Seeder};

// Repository re-exports for convenience
pub use repository::{
    BillAndCoinsRepository, CheckRemittanceRepository, CurrencyRepository, Filter,
    HolidayRepository, OutboxRepository, RelatedRepository, Repository, Table,
};
