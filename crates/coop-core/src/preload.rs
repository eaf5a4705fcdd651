//! # Preload Descriptors
//!
//! Eager-load declarations for entity relations.
//!
//! ```text
//! ┌───────────────────┐   PRELOADS    ┌───────────────────┐
//! │   BillAndCoins    │ ────────────► │ CreatedBy (users) │
//! │   currency_id ────┼──────┐        │ UpdatedBy (users) │
//! │   media_id ───────┼───┐  │        │ Media     (media) │
//! └───────────────────┘   │  └──────► │ Currency          │
//!                         └─────────► └───────────────────┘
//!
//!  relation_id(preload)  → which foreign key to follow
//!  Preload::table()      → where the row lives
//!  attach(preload, row)  → store the loaded row on the entity
//! ```
//!
//! The database layer walks `PRELOADS`, fetches each referenced row and
//! hands it back through `attach`, so projections can nest it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Bank, Branch, Currency, Media, Organization, TransactionBatch, User};

/// A relation that can be eager-loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preload {
    CreatedBy,
    UpdatedBy,
    Organization,
    Branch,
    Media,
    Currency,
    Bank,
    EmployeeUser,
    TransactionBatch,
}

impl Preload {
    /// Table holding the related row.
    pub const fn table(&self) -> &'static str {
        match self {
            Preload::CreatedBy | Preload::UpdatedBy | Preload::EmployeeUser => "users",
            Preload::Organization => "organizations",
            Preload::Branch => "branches",
            Preload::Media => "media",
            Preload::Currency => "currencies",
            Preload::Bank => "banks",
            Preload::TransactionBatch => "transaction_batches",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Preload::CreatedBy => "CreatedBy",
            Preload::UpdatedBy => "UpdatedBy",
            Preload::Organization => "Organization",
            Preload::Branch => "Branch",
            Preload::Media => "Media",
            Preload::Currency => "Currency",
            Preload::Bank => "Bank",
            Preload::EmployeeUser => "EmployeeUser",
            Preload::TransactionBatch => "TransactionBatch",
        }
    }
}

/// A loaded related row.
#[derive(Debug, Clone, PartialEq)]
pub enum Relation {
    User(User),
    Organization(Organization),
    Branch(Branch),
    Media(Media),
    Currency(Currency),
    Bank(Bank),
    TransactionBatch(TransactionBatch),
}

/// Entities with eager-loadable relations.
pub trait Related {
    /// Relations loaded by default when reading this entity.
    const PRELOADS: &'static [Preload];

    /// Foreign key for `preload`, if the entity has that relation and it is set.
    fn relation_id(&self, preload: Preload) -> Option<Uuid>;

    /// Stores a loaded relation. Mismatched pairs are ignored.
    fn attach(&mut self, preload: Preload, relation: Relation);
}
