//! # Currency Repository
//!
//! Global reference data: currencies are shared by every organization and
//! branch.
//!
//! ## Lookups
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  find_all()          every live currency, insertion order      │
//! │  find_by_code("USD") exactly one row, or NotFound              │
//! │  find_by_alpha2("PH") first currency used by a country         │
//! │  get_default()       find_by_code(DEFAULT_CURRENCY_CODE)       │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use coop_core::{Currency, Record, Resource, DEFAULT_CURRENCY_CODE};
use tracing::debug;

use super::{Filter, Repository, Table, Value};
use crate::error::{DbError, DbResult};

impl Table for Currency {
    const TABLE: &'static str = "currencies";

    const COLUMNS: &'static [&'static str] = &[
        "id",
        "created_at",
        "updated_at",
        "deleted_at",
        "name",
        "country",
        "currency_code",
        "symbol",
        "emoji",
        "iso_3166_alpha2",
        "iso_3166_alpha3",
        "iso_3166_numeric",
        "phone_code",
        "domain",
        "locale",
    ];

    fn record(&self) -> &Record {
        &self.record
    }

    fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.record.id.into(),
            self.record.created_at.into(),
            self.record.updated_at.into(),
            self.record.deleted_at.into(),
            self.name.as_str().into(),
            self.country.as_str().into(),
            self.currency_code.as_str().into(),
            self.symbol.as_str().into(),
            self.emoji.as_str().into(),
            self.iso_3166_alpha2.as_str().into(),
            self.iso_3166_alpha3.as_str().into(),
            self.iso_3166_numeric.as_str().into(),
            self.phone_code.as_str().into(),
            self.domain.as_str().into(),
            self.locale.as_str().into(),
        ]
    }

    fn payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.to_response())
    }
}

impl Repository<Currency> {
    /// Every live currency.
    pub async fn find_all(&self) -> DbResult<Vec<Currency>> {
        self.list().await
    }

    /// The currency with `code`.
    ///
    /// ## Errors
    /// `DbError::NotFound` ("currency not found: <code>") when no row matches.
    pub async fn find_by_code(&self, code: &str) -> DbResult<Currency> {
        debug!(code = %code, "Finding currency by code");

        self.find_one(Filter::new().eq("currency_code", code))
            .await?
            .ok_or_else(|| DbError::not_found("currency", code))
    }

    /// First currency whose ISO 3166 alpha-2 country code is `alpha2`.
    pub async fn find_by_alpha2(&self, alpha2: &str) -> DbResult<Option<Currency>> {
        self.find_one(Filter::new().eq("iso_3166_alpha2", alpha2.to_uppercase()))
            .await
    }

    /// The cooperative's home currency.
    pub async fn get_default(&self) -> DbResult<Currency> {
        self.find_by_code(DEFAULT_CURRENCY_CODE).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use coop_core::{CurrencyRequest, EventTopics, Validate};

    use crate::repository::fixtures;

    fn peso() -> CurrencyRequest {
        CurrencyRequest {
            name: "Philippine Peso".to_string(),
            country: "Philippines".to_string(),
            currency_code: "PHP".to_string(),
            symbol: "₱".to_string(),
            iso_3166_alpha2: "PH".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_code() {
        let db = fixtures::database().await;
        let request = peso();
        request.validate().unwrap();

        let currency = request.into_entity(Utc::now());
        db.currencies().create(&currency).await.unwrap();

        let found = db.currencies().find_by_code("PHP").await.unwrap();
        assert_eq!(found.record.id, currency.record.id);
        assert_eq!(found.symbol, "₱");

        let default = db.currencies().get_default().await.unwrap();
        assert_eq!(default.name, "Philippine Peso");

        let by_country = db.currencies().find_by_alpha2("ph").await.unwrap();
        assert_eq!(by_country.map(|c| c.currency_code), Some("PHP".to_string()));
    }

    #[tokio::test]
    async fn test_missing_code_is_not_found() {
        let db = fixtures::database().await;

        let err = db.currencies().find_by_code("XYZ").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "currency not found: XYZ");
    }

    #[tokio::test]
    async fn test_code_and_name_are_unique() {
        let db = fixtures::database().await;
        db.currencies().create(&peso().into_entity(Utc::now())).await.unwrap();

        let mut same_code = peso();
        same_code.name = "Peso Again".to_string();
        let err = db
            .currencies()
            .create(&same_code.into_entity(Utc::now()))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());

        let mut same_name = peso();
        same_name.currency_code = "PHX".to_string();
        let err = db
            .currencies()
            .create(&same_name.into_entity(Utc::now()))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());

        assert_eq!(db.currencies().find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_soft_delete() {
        let db = fixtures::database().await;
        let repo = db.currencies();
        let currency = peso().into_entity(Utc::now());
        repo.create(&currency).await.unwrap();

        let mut stored = repo.get_by_id(currency.record.id).await.unwrap();
        let mut update = peso();
        update.symbol = "PHP₱".to_string();
        update.apply_to(&mut stored, Utc::now());
        repo.update(&stored).await.unwrap();
        assert_eq!(repo.find_by_code("PHP").await.unwrap().symbol, "PHP₱");

        let deleted = repo.delete(currency.record.id, None).await.unwrap();
        assert!(deleted.record.is_deleted());
        assert!(repo.find_by_code("PHP").await.unwrap_err().is_not_found());
        assert_eq!(repo.count(super::Filter::new().include_deleted()).await.unwrap(), 1);

        let events = db.outbox().for_entity(currency.record.id).await.unwrap();
        assert_eq!(events[1].topics, stored.updated());
        assert_eq!(events[2].topics, deleted.deleted());
    }
}
