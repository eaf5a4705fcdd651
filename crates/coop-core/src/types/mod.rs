//! # Domain Types
//!
//! Entities of the back office and their API projections.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Currency     │◄──│  BillAndCoins   │   │    Holiday      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Record         │   │  Record/Audit   │   │  Record/Audit   │       │
//! │  │  currency_code  │   │  Tenant         │   │  Tenant         │       │
//! │  │  (global)       │   │  name, value    │   │  entry_date     │       │
//! │  └────────▲────────┘   └─────────────────┘   └─────────────────┘       │
//! │           │                                                             │
//! │           │            ┌─────────────────┐                              │
//! │           └────────────│ CheckRemittance │   Holiday and CheckRemittance│
//! │                        │  Record/Audit   │   also reference Currency    │
//! │                        │  Tenant, bank   │                              │
//! │                        │  amount         │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each entity comes with:
//! - `<Entity>Response`: flattened projection, timestamps as RFC 3339 text
//! - `<Entity>Request`: validated input used to create or update the entity
//! - `EventTopics` and `Related` implementations

mod bill_and_coins;
mod check_remittance;
mod currency;
mod holiday;
mod outbox;
mod record;
mod related;

pub use bill_and_coins::{BillAndCoins, BillAndCoinsRequest, BillAndCoinsResponse};
pub use check_remittance::{CheckRemittance, CheckRemittanceRequest, CheckRemittanceResponse};
pub use currency::{Currency, CurrencyRequest, CurrencyResponse};
pub use holiday::{Holiday, HolidayRequest, HolidayResponse, HolidayYearAvailable};
pub use outbox::OutboxEvent;
pub use record::{format_timestamp, Audit, Record, Tenant};
pub use related::{
    Bank, BankResponse, Branch, BranchResponse, Media, MediaResponse, Organization,
    OrganizationResponse, TransactionBatch, TransactionBatchResponse, User, UserResponse,
};

/// Projection of an entity into its API response.
pub trait Resource {
    type Response;

    fn to_response(&self) -> Self::Response;

    /// Nil-safe projection: `None` in, `None` out.
    fn resource(entity: Option<&Self>) -> Option<Self::Response>
    where
        Self: Sized,
    {
        entity.map(Self::to_response)
    }
}
