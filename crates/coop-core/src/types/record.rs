//! # Base Records
//!
//! Columns shared by every entity, composed into each domain struct with
//! `#[serde(flatten)]` / `#[sqlx(flatten)]`.
//!
//! ```text
//! ┌──────────────────────┐  ┌──────────────────────┐  ┌──────────────────────┐
//! │       Record         │  │        Audit         │  │       Tenant         │
//! │  id (UUID v4)        │  │  created_by_id       │  │  organization_id     │
//! │  created_at          │  │  updated_by_id       │  │  branch_id           │
//! │  updated_at          │  │  deleted_by_id       │  │                      │
//! │  deleted_at (soft)   │  │                      │  │                      │
//! └──────────────────────┘  └──────────────────────┘  └──────────────────────┘
//!        every entity          actor-owned rows          branch-scoped rows
//! ```
//!
//! Currency only carries a `Record`: it is global reference data with no
//! actor and no tenant.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Formats a timestamp the way responses expose it (RFC 3339, seconds, `Z`).
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// =============================================================================
// Record
// =============================================================================

/// Identity and lifecycle timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Record {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker. Rows are never physically removed.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Record {
    /// A fresh record with a new v4 id, created and updated at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Record {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Bumps `updated_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

// =============================================================================
// Audit
// =============================================================================

/// Actor references for the create / update / delete triple.
///
/// Nullable because the referenced user row may be removed
/// (`ON DELETE SET NULL`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Audit {
    pub created_by_id: Option<Uuid>,
    pub updated_by_id: Option<Uuid>,
    pub deleted_by_id: Option<Uuid>,
}

impl Audit {
    /// Audit columns for a row created by `user_id`.
    pub fn by(user_id: Uuid) -> Self {
        Audit {
            created_by_id: Some(user_id),
            updated_by_id: Some(user_id),
            deleted_by_id: None,
        }
    }
}

// =============================================================================
// Tenant
// =============================================================================

/// The (organization, branch) pair that exclusively owns a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Tenant {
    pub organization_id: Uuid,
    pub branch_id: Uuid,
}

impl Tenant {
    pub fn new(organization_id: Uuid, branch_id: Uuid) -> Self {
        Tenant {
            organization_id,
            branch_id,
        }
    }

    /// Topic scope suffixes: `branch.<id>`, `organization.<id>`.
    pub fn topic_scopes(&self) -> Vec<String> {
        vec![
            format!("branch.{}", self.branch_id),
            format!("organization.{}", self.organization_id),
        ]
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
