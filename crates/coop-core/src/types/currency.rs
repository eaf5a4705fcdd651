//! Currency: global reference data shared by every organization and branch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::record::{format_timestamp, Record};
use super::Resource;
use crate::preload::{Preload, Related, Relation};
use crate::topics::EventTopics;
use crate::validation::{exact_len_optional, length_between, max_len, Validate, ValidationResult};

/// A world currency with the ISO 3166 metadata of its issuing country.
///
/// `name` and `currency_code` are each unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Currency {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub record: Record,

    pub name: String,
    pub country: String,
    /// ISO 4217 code (`PHP`, `USD`).
    pub currency_code: String,
    pub symbol: String,
    pub emoji: String,
    pub iso_3166_alpha2: String,
    pub iso_3166_alpha3: String,
    pub iso_3166_numeric: String,
    pub phone_code: String,
    pub domain: String,
    pub locale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CurrencyResponse {
    #[ts(as = "String")]
    pub id: Uuid,
    pub created_at: String,
    pub updated_at: String,
    pub name: String,
    pub country: String,
    pub currency_code: String,
    pub symbol: String,
    pub emoji: String,
    pub iso_3166_alpha2: String,
    pub iso_3166_alpha3: String,
    pub iso_3166_numeric: String,
    pub phone_code: String,
    pub domain: String,
    pub locale: String,
}

/// Input for creating or updating a currency.
///
/// The embedded `currencies.json` table deserializes straight into this type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CurrencyRequest {
    pub name: String,
    pub country: String,
    pub currency_code: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub iso_3166_alpha2: String,
    #[serde(default)]
    pub iso_3166_alpha3: String,
    #[serde(default)]
    pub iso_3166_numeric: String,
    #[serde(default)]
    pub phone_code: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub locale: String,
}

impl Validate for CurrencyRequest {
    fn validate(&self) -> ValidationResult<()> {
        length_between("name", &self.name, 1, 255)?;
        length_between("country", &self.country, 1, 255)?;
        length_between("currency_code", &self.currency_code, 2, 10)?;
        exact_len_optional("iso_3166_alpha2", &self.iso_3166_alpha2, 2)?;
        exact_len_optional("iso_3166_alpha3", &self.iso_3166_alpha3, 3)?;
        exact_len_optional("iso_3166_numeric", &self.iso_3166_numeric, 3)?;
        max_len("phone_code", &self.phone_code, 10)?;
        max_len("domain", &self.domain, 10)?;
        max_len("locale", &self.locale, 10)?;
        Ok(())
    }
}

impl CurrencyRequest {
    pub fn into_entity(self, now: DateTime<Utc>) -> Currency {
        Currency {
            record: Record::new(now),
            name: self.name,
            country: self.country,
            currency_code: self.currency_code,
            symbol: self.symbol,
            emoji: self.emoji,
            iso_3166_alpha2: self.iso_3166_alpha2,
            iso_3166_alpha3: self.iso_3166_alpha3,
            iso_3166_numeric: self.iso_3166_numeric,
            phone_code: self.phone_code,
            domain: self.domain,
            locale: self.locale,
        }
    }

    pub fn apply_to(self, currency: &mut Currency, now: DateTime<Utc>) {
        currency.name = self.name;
        currency.country = self.country;
        currency.currency_code = self.currency_code;
        currency.symbol = self.symbol;
        currency.emoji = self.emoji;
        currency.iso_3166_alpha2 = self.iso_3166_alpha2;
        currency.iso_3166_alpha3 = self.iso_3166_alpha3;
        currency.iso_3166_numeric = self.iso_3166_numeric;
        currency.phone_code = self.phone_code;
        currency.domain = self.domain;
        currency.locale = self.locale;
        currency.record.touch(now);
    }
}

impl Resource for Currency {
    type Response = CurrencyResponse;

    fn to_response(&self) -> CurrencyResponse {
        CurrencyResponse {
            id: self.record.id,
            created_at: format_timestamp(&self.record.created_at),
            updated_at: format_timestamp(&self.record.updated_at),
            name: self.name.clone(),
            country: self.country.clone(),
            currency_code: self.currency_code.clone(),
            symbol: self.symbol.clone(),
            emoji: self.emoji.clone(),
            iso_3166_alpha2: self.iso_3166_alpha2.clone(),
            iso_3166_alpha3: self.iso_3166_alpha3.clone(),
            iso_3166_numeric: self.iso_3166_numeric.clone(),
            phone_code: self.phone_code.clone(),
            domain: self.domain.clone(),
            locale: self.locale.clone(),
        }
    }
}

impl EventTopics for Currency {
    const ENTITY: &'static str = "currency";

    fn topic_id(&self) -> Uuid {
        self.record.id
    }

    fn topic_scopes(&self) -> Vec<String> {
        vec![format!("code.{}", self.currency_code)]
    }
}

impl Related for Currency {
    const PRELOADS: &'static [Preload] = &[];

    fn relation_id(&self, _preload: Preload) -> Option<Uuid> {
        None
    }

    fn attach(&mut self, _preload: Preload, _relation: Relation) {}
}
