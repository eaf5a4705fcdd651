//! Collaborator rows referenced by the back-office entities.
//!
//! Users, organizations, branches, media, banks and transaction batches are
//! owned by other parts of the system. Only the columns needed to resolve a
//! preload and project a nested response are modelled here.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::Resource;

// =============================================================================
// User
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserResponse {
    #[ts(as = "String")]
    pub id: Uuid,
    pub user_name: String,
    pub full_name: String,
    pub email: String,
}

impl Resource for User {
    type Response = UserResponse;

    fn to_response(&self) -> UserResponse {
        UserResponse {
            id: self.id,
            user_name: self.user_name.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
        }
    }
}

// =============================================================================
// Organization / Branch
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrganizationResponse {
    #[ts(as = "String")]
    pub id: Uuid,
    pub name: String,
}

impl Resource for Organization {
    type Response = OrganizationResponse;

    fn to_response(&self) -> OrganizationResponse {
        OrganizationResponse {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Branch {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BranchResponse {
    #[ts(as = "String")]
    pub id: Uuid,
    #[ts(as = "String")]
    pub organization_id: Uuid,
    pub name: String,
}

impl Resource for Branch {
    type Response = BranchResponse;

    fn to_response(&self) -> BranchResponse {
        BranchResponse {
            id: self.id,
            organization_id: self.organization_id,
            name: self.name.clone(),
        }
    }
}

// =============================================================================
// Media
// =============================================================================

/// An uploaded file (denomination image, scanned check).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Media {
    pub id: Uuid,
    pub file_name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MediaResponse {
    #[ts(as = "String")]
    pub id: Uuid,
    pub file_name: String,
    pub url: String,
}

impl Resource for Media {
    type Response = MediaResponse;

    fn to_response(&self) -> MediaResponse {
        MediaResponse {
            id: self.id,
            file_name: self.file_name.clone(),
            url: self.url.clone(),
        }
    }
}

// =============================================================================
// Bank / Transaction Batch
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Bank {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub branch_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BankResponse {
    #[ts(as = "String")]
    pub id: Uuid,
    pub name: String,
}

impl Resource for Bank {
    type Response = BankResponse;

    fn to_response(&self) -> BankResponse {
        BankResponse {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// A teller's working batch. Check remittances are totalled per batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionBatch {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub branch_id: Uuid,
    pub batch_name: String,
    pub is_closed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionBatchResponse {
    #[ts(as = "String")]
    pub id: Uuid,
    pub batch_name: String,
    pub is_closed: bool,
}

impl Resource for TransactionBatch {
    type Response = TransactionBatchResponse;

    fn to_response(&self) -> TransactionBatchResponse {
        TransactionBatchResponse {
            id: self.id,
            batch_name: self.batch_name.clone(),
            is_closed: self.is_closed,
        }
    }
}
