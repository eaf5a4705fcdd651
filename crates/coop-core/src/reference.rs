//! # Reference Data
//!
//! Seed content embedded at compile time from `data/`.
//!
//! ```text
//! ┌──────────────────────┐   ┌───────────────────────────┐   ┌──────────────────────────┐
//! │   currencies.json    │   │   bill_and_coins.json     │   │      holidays.json       │
//! │  [CurrencyRequest]   │   │  { "PHP": [ {name,value} ]│   │  { calendars: {"PHP":..},│
//! │                      │   │    "USD": [...], ... }    │   │    fallback: [...] }     │
//! └──────────┬───────────┘   └─────────────┬─────────────┘   └────────────┬─────────────┘
//!            │                             │                              │
//!            ▼                             ▼                              ▼
//!      currencies()             denominations("PHP")              holidays("ZZZ")
//!                              (empty when no set exists)      (fallback when no calendar)
//! ```
//!
//! Keeping the tables as data lets them be reviewed and edited without
//! touching the seed routines.

use std::collections::HashMap;

use chrono::{NaiveDate, TimeZone, Utc};
use serde::Deserialize;

use crate::amount::Amount;
use crate::error::{CoreError, CoreResult};
use crate::types::CurrencyRequest;

const CURRENCIES_JSON: &str = include_str!("../data/currencies.json");
const BILL_AND_COINS_JSON: &str = include_str!("../data/bill_and_coins.json");
const HOLIDAYS_JSON: &str = include_str!("../data/holidays.json");

/// One banknote or coin in a currency's denomination set.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DenominationTemplate {
    pub name: String,
    pub value: Amount,
}

/// A recurring holiday, materialized into a concrete date per year.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HolidayTemplate {
    pub month: u32,
    pub day: u32,
    pub name: String,
    pub description: String,
}

impl HolidayTemplate {
    /// Midnight UTC on this holiday in `year`.
    ///
    /// ## Example
    /// ```rust
    /// use coop_core::reference::ReferenceData;
    ///
    /// let data = ReferenceData::embedded().unwrap();
    /// let new_year = &data.holidays("PHP")[0];
    /// let date = new_year.entry_date(2026).unwrap();
    /// assert_eq!(date.to_rfc3339(), "2026-01-01T00:00:00+00:00");
    /// ```
    pub fn entry_date(&self, year: i32) -> CoreResult<chrono::DateTime<Utc>> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive))
            .ok_or_else(|| CoreError::InvalidHolidayDate {
                name: self.name.clone(),
                year,
                month: self.month,
                day: self.day,
            })
    }
}

#[derive(Debug, Deserialize)]
struct HolidayTable {
    calendars: HashMap<String, Vec<HolidayTemplate>>,
    fallback: Vec<HolidayTemplate>,
}

/// Parsed seed tables.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    currencies: Vec<CurrencyRequest>,
    denominations: HashMap<String, Vec<DenominationTemplate>>,
    holidays: HashMap<String, Vec<HolidayTemplate>>,
    fallback_holidays: Vec<HolidayTemplate>,
}

impl ReferenceData {
    /// Parses the tables compiled into the crate.
    pub fn embedded() -> CoreResult<Self> {
        Self::from_json(CURRENCIES_JSON, BILL_AND_COINS_JSON, HOLIDAYS_JSON)
    }

    /// Parses tables from JSON text.
    pub fn from_json(currencies: &str, bill_and_coins: &str, holidays: &str) -> CoreResult<Self> {
        let currencies: Vec<CurrencyRequest> = parse("currencies.json", currencies)?;
        let denominations = parse("bill_and_coins.json", bill_and_coins)?;
        let holidays: HolidayTable = parse("holidays.json", holidays)?;

        Ok(ReferenceData {
            currencies,
            denominations,
            holidays: holidays.calendars,
            fallback_holidays: holidays.fallback,
        })
    }

    /// Every currency, in seed order.
    pub fn currencies(&self) -> &[CurrencyRequest] {
        &self.currencies
    }

    /// Denominations for `currency_code`. Currencies without a set get none.
    pub fn denominations(&self, currency_code: &str) -> &[DenominationTemplate] {
        self.denominations
            .get(currency_code)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Holiday calendar for `currency_code`, or the New Year / Christmas
    /// fallback when the currency has no calendar.
    pub fn holidays(&self, currency_code: &str) -> &[HolidayTemplate] {
        self.holidays
            .get(currency_code)
            .map(Vec::as_slice)
            .unwrap_or(&self.fallback_holidays)
    }
}

fn parse<T: serde::de::DeserializeOwned>(resource: &str, json: &str) -> CoreResult<T> {
    serde_json::from_str(json).map_err(|e| CoreError::ReferenceData {
        resource: resource.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    #[test]
    fn test_embedded_tables_parse() {
        let data = ReferenceData::embedded().unwrap();
        assert_eq!(data.currencies().len(), 80);
    }

    #[test]
    fn test_currency_codes_and_names_unique() {
        let data = ReferenceData::embedded().unwrap();
        let codes: HashSet<_> = data.currencies().iter().map(|c| &c.currency_code).collect();
        let names: HashSet<_> = data.currencies().iter().map(|c| &c.name).collect();
        assert_eq!(codes.len(), data.currencies().len());
        assert_eq!(names.len(), data.currencies().len());
    }

    #[test]
    fn test_every_currency_validates() {
        let data = ReferenceData::embedded().unwrap();
        for currency in data.currencies() {
            assert!(
                currency.validate().is_ok(),
                "{} failed validation",
                currency.currency_code
            );
        }
    }

    #[test]
    fn test_usd_symbol() {
        let data = ReferenceData::embedded().unwrap();
        let usd = data
            .currencies()
            .iter()
            .find(|c| c.currency_code == "USD")
            .unwrap();
        assert_eq!(usd.symbol, "US$");
    }

    #[test]
    fn test_php_denominations() {
        let data = ReferenceData::embedded().unwrap();
        let php = data.denominations("PHP");
        assert_eq!(php.len(), 13);
        assert_eq!(php.iter().filter(|d| d.name.contains("Bill")).count(), 6);
        assert_eq!(php.iter().filter(|d| d.name.contains("Coin")).count(), 7);
        assert_eq!(php[0].value.decimal(), dec!(1000.00));
    }

    #[test]
    fn test_unknown_currency_has_no_denominations() {
        let data = ReferenceData::embedded().unwrap();
        assert!(data.denominations("ZZZ").is_empty());
    }

    #[test]
    fn test_denomination_names_unique_per_set() {
        let data = ReferenceData::embedded().unwrap();
        for currency in data.currencies() {
            let set = data.denominations(&currency.currency_code);
            let names: HashSet<_> = set.iter().map(|d| &d.name).collect();
            assert_eq!(names.len(), set.len(), "{}", currency.currency_code);
        }
    }

    #[test]
    fn test_unknown_currency_gets_fallback_holidays() {
        let data = ReferenceData::embedded().unwrap();
        let fallback = data.holidays("ZZZ");
        assert_eq!(fallback.len(), 2);
        assert_eq!(fallback[0].name, "New Year's Day");
        assert_eq!((fallback[0].month, fallback[0].day), (1, 1));
        assert_eq!(fallback[1].name, "Christmas Day");
        assert_eq!((fallback[1].month, fallback[1].day), (12, 25));
    }

    #[test]
    fn test_every_holiday_is_a_real_date() {
        let data = ReferenceData::embedded().unwrap();
        for currency in data.currencies() {
            for holiday in data.holidays(&currency.currency_code) {
                // 2025 is not a leap year, so a Feb 29 entry would fail here
                assert!(holiday.entry_date(2025).is_ok(), "{}", holiday.name);
            }
        }
    }

    #[test]
    fn test_invalid_holiday_date() {
        let template = HolidayTemplate {
            month: 2,
            day: 30,
            name: "Nope".to_string(),
            description: String::new(),
        };
        assert!(matches!(
            template.entry_date(2025),
            Err(CoreError::InvalidHolidayDate { month: 2, day: 30, .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_reference_error() {
        let err = ReferenceData::from_json("[", "{}", "{}").unwrap_err();
        assert!(matches!(err, CoreError::ReferenceData { .. }));
    }
}
