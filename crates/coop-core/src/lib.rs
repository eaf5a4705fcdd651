//! # coop-core: Domain Model for the Coop Back-Office
//!
//! Entities, projections and reference data for a cooperative's back
//! office: currencies, cash denominations, check remittances and holidays.
//! Nothing in this crate performs I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Coop Back-Office Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          API handlers / onboarding (external callers)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                coop-db (Database Layer)                         │   │
//! │  │      repositories, event outbox, migrations, seed routines      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ coop-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  topics   │  │  preload  │  │ reference │  │   │
//! │  │   │ entities  │  │ event keys│  │ relations │  │ seed data │  │   │
//! │  │   │ responses │  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   └───────────┘  ┌───────────┐  ┌───────────┐                 │   │
//! │  │                  │  amount   │  │ validation│                 │   │
//! │  │                  └───────────┘  └───────────┘                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities, base records, responses and requests
//! - [`amount`] - Exact decimal amounts
//! - [`topics`] - Event topic keys for create/update/delete
//! - [`preload`] - Eager-load declarations
//! - [`reference`] - Embedded currency, denomination and holiday tables
//! - [`validation`] - Request validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use coop_core::reference::ReferenceData;
//! use coop_core::{EventTopics, Resource};
//!
//! let data = ReferenceData::embedded().unwrap();
//! let usd = data
//!     .currencies()
//!     .iter()
//!     .find(|c| c.currency_code == "USD")
//!     .cloned()
//!     .unwrap()
//!     .into_entity(Utc::now());
//!
//! assert_eq!(usd.to_response().symbol, "US$");
//! assert_eq!(usd.created()[0], "currency.create");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod amount;
pub mod error;
pub mod preload;
pub mod reference;
pub mod topics;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use amount::Amount;
pub use error::{CoreError, CoreResult, ValidationError};
pub use preload::{Preload, Related, Relation};
pub use topics::{EventTopics, TopicAction};
pub use types::*;
pub use validation::Validate;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency returned by `get_default` lookups.
pub const DEFAULT_CURRENCY_CODE: &str = "PHP";
