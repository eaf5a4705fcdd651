//! # Seed Routines
//!
//! Inserts the embedded reference tables: currencies globally, then bill
//! and coin denominations and holidays for one organization/branch.
//!
//! ## Seed Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Seed Flow                                       │
//! │                                                                         │
//! │  caller opens tx                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  seed_currencies(tx)          80 rows, global, NOT idempotent           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  seed_branch(tx, user, org, branch)                                     │
//! │  ├── seed_bill_and_coins      list currencies (empty → fail)            │
//! │  │                            denominations(code), none if no set       │
//! │  └── seed_holidays            list currencies (empty → fail)            │
//! │                               holidays(code), New Year + Christmas      │
//! │                               fallback, dated in the current UTC year   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  caller commits (or drops tx to roll back)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inserts run in table order. The first failure aborts the run with a
//! message naming the record and currency; nothing is retried.

use chrono::{Datelike, Utc};
use coop_core::reference::ReferenceData;
use coop_core::{BillAndCoinsRequest, Currency, HolidayRequest, Tenant, Validate};
use sqlx::SqliteConnection;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult, ResultExt};
use crate::pool::Database;
use crate::repository::{BillAndCoinsRepository, CurrencyRepository, HolidayRepository};

/// Rows inserted for one branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub bill_and_coins: usize,
    pub holidays: usize,
}

/// Seeds reference data through the entity repositories.
#[derive(Debug, Clone)]
pub struct Seeder {
    currencies: CurrencyRepository,
    bill_and_coins: BillAndCoinsRepository,
    holidays: HolidayRepository,
    data: ReferenceData,
}

impl Seeder {
    /// A seeder over the embedded reference tables.
    pub fn new(db: &Database) -> DbResult<Self> {
        Ok(Self::with_reference_data(db, ReferenceData::embedded()?))
    }

    pub fn with_reference_data(db: &Database, data: ReferenceData) -> Self {
        Seeder {
            currencies: db.currencies(),
            bill_and_coins: db.bill_and_coins(),
            holidays: db.holidays(),
            data,
        }
    }

    pub fn reference_data(&self) -> &ReferenceData {
        &self.data
    }

    /// Inserts every currency. Fails on the first duplicate code or name.
    pub async fn seed_currencies(&self, conn: &mut SqliteConnection) -> DbResult<usize> {
        info!(currencies = self.data.currencies().len(), "Seeding currencies");

        let now = Utc::now();
        let mut inserted = 0;

        for request in self.data.currencies() {
            let name = request.name.clone();
            request
                .validate()
                .with_context(|| format!("failed to seed currency {}", name))?;

            let currency = request.clone().into_entity(now);
            self.currencies
                .create_with_tx(conn, &currency)
                .await
                .with_context(|| format!("failed to seed currency {}", name))?;
            inserted += 1;
        }

        info!(inserted, "Currencies seeded");
        Ok(inserted)
    }

    /// Inserts each currency's denomination set for one branch.
    ///
    /// Currencies without a set insert nothing.
    pub async fn seed_bill_and_coins(
        &self,
        conn: &mut SqliteConnection,
        user_id: Uuid,
        organization_id: Uuid,
        branch_id: Uuid,
    ) -> DbResult<usize> {
        let currencies = self
            .currencies
            .list_with_tx(conn)
            .await
            .context("failed to list currencies for bill and coins seeding")?;
        require_currencies(&currencies, "no currencies found for bill and coins seeding")?;

        info!(
            organization_id = %organization_id,
            branch_id = %branch_id,
            currencies = currencies.len(),
            "Seeding bill and coins"
        );

        let tenant = Tenant::new(organization_id, branch_id);
        let now = Utc::now();
        let mut inserted = 0;

        for currency in &currencies {
            let denominations = self.data.denominations(&currency.currency_code);
            if denominations.is_empty() {
                debug!(code = %currency.currency_code, "No denominations for currency");
                continue;
            }

            for template in denominations {
                let context = || {
                    format!(
                        "failed to seed bill and coin {} for currency {}",
                        template.name, currency.currency_code
                    )
                };

                let request = BillAndCoinsRequest {
                    name: template.name.clone(),
                    value: template.value,
                    currency_id: currency.record.id,
                    media_id: None,
                };
                request.validate().with_context(context)?;

                let entity = request.into_entity(user_id, tenant, now);
                self.bill_and_coins
                    .create_with_tx(conn, &entity)
                    .await
                    .with_context(context)?;
                inserted += 1;
            }
        }

        info!(inserted, "Bill and coins seeded");
        Ok(inserted)
    }

    /// Inserts each currency's holiday calendar for one branch, dated in the
    /// current UTC year.
    pub async fn seed_holidays(
        &self,
        conn: &mut SqliteConnection,
        user_id: Uuid,
        organization_id: Uuid,
        branch_id: Uuid,
    ) -> DbResult<usize> {
        let year = Utc::now().year();
        self.seed_holidays_for_year(conn, user_id, organization_id, branch_id, year)
            .await
    }

    /// Same as [`Seeder::seed_holidays`] for an explicit year.
    pub async fn seed_holidays_for_year(
        &self,
        conn: &mut SqliteConnection,
        user_id: Uuid,
        organization_id: Uuid,
        branch_id: Uuid,
        year: i32,
    ) -> DbResult<usize> {
        let currencies = self
            .currencies
            .list_with_tx(conn)
            .await
            .context("failed to list currencies for holiday seeding")?;
        require_currencies(&currencies, "no currencies found for holiday seeding")?;

        info!(
            organization_id = %organization_id,
            branch_id = %branch_id,
            currencies = currencies.len(),
            year,
            "Seeding holidays"
        );

        let tenant = Tenant::new(organization_id, branch_id);
        let now = Utc::now();
        let mut inserted = 0;

        for currency in &currencies {
            for template in self.data.holidays(&currency.currency_code) {
                let context = || {
                    format!(
                        "failed to seed holiday {} for currency {}",
                        template.name, currency.currency_code
                    )
                };

                let request = HolidayRequest {
                    entry_date: template.entry_date(year).with_context(context)?,
                    name: template.name.clone(),
                    description: template.description.clone(),
                    currency_id: currency.record.id,
                };
                request.validate().with_context(context)?;

                let entity = request.into_entity(user_id, tenant, now);
                self.holidays
                    .create_with_tx(conn, &entity)
                    .await
                    .with_context(context)?;
                inserted += 1;
            }
        }

        info!(inserted, "Holidays seeded");
        Ok(inserted)
    }

    /// Default data for a newly provisioned branch.
    pub async fn seed_branch(
        &self,
        conn: &mut SqliteConnection,
        user_id: Uuid,
        organization_id: Uuid,
        branch_id: Uuid,
    ) -> DbResult<SeedSummary> {
        let bill_and_coins = self
            .seed_bill_and_coins(conn, user_id, organization_id, branch_id)
            .await?;
        let holidays = self
            .seed_holidays(conn, user_id, organization_id, branch_id)
            .await?;

        Ok(SeedSummary {
            bill_and_coins,
            holidays,
        })
    }
}

fn require_currencies(currencies: &[Currency], message: &str) -> DbResult<()> {
    if currencies.is_empty() {
        return Err(DbError::PreconditionFailed(message.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use coop_core::Amount;
    use rust_decimal_macros::dec;

    use crate::repository::fixtures;

    #[tokio::test]
    async fn test_seed_currencies_then_find_usd() {
        let db = fixtures::database().await;
        let seeder = db.seeder().unwrap();

        let mut tx = db.begin().await.unwrap();
        let inserted = seeder.seed_currencies(&mut tx).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(inserted, seeder.reference_data().currencies().len());

        let usd = db.currencies().find_by_code("USD").await.unwrap();
        assert_eq!(usd.currency_code, "USD");
        assert_eq!(usd.symbol, "US$");
        assert_eq!(db.currencies().get_default().await.unwrap().name, "Philippine Peso");
    }

    #[tokio::test]
    async fn test_reseeding_currencies_fails() {
        let db = fixtures::database().await;
        let seeder = db.seeder().unwrap();

        let mut tx = db.begin().await.unwrap();
        seeder.seed_currencies(&mut tx).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = db.begin().await.unwrap();
        let err = seeder.seed_currencies(&mut tx).await.unwrap_err();
        drop(tx);

        assert!(err.is_unique_violation());
        let first = &seeder.reference_data().currencies()[0];
        assert!(err
            .to_string()
            .starts_with(&format!("failed to seed currency {}", first.name)));
    }

    #[tokio::test]
    async fn test_php_bill_and_coins() {
        let t = fixtures::tenant().await;
        let php = fixtures::currency(&t.db, "PHP", "Philippine Peso").await;
        let seeder = t.db.seeder().unwrap();

        let mut tx = t.db.begin().await.unwrap();
        let inserted = seeder
            .seed_bill_and_coins(
                &mut tx,
                t.user_id,
                t.tenant.organization_id,
                t.tenant.branch_id,
            )
            .await
            .unwrap();
        tx.commit().await.unwrap();
        assert_eq!(inserted, 13);

        let rows = t
            .db
            .bill_and_coins()
            .current_branch(t.tenant.organization_id, t.tenant.branch_id)
            .await
            .unwrap();
        assert_eq!(rows.len(), 13);
        assert!(rows.iter().all(|row| row.currency_id == php.record.id));
        assert!(rows.iter().all(|row| row.tenant == t.tenant));
        assert!(rows
            .iter()
            .all(|row| row.audit.created_by_id == Some(t.user_id)));

        let bills = rows.iter().filter(|row| row.name.ends_with("Bill")).count();
        let coins = rows.iter().filter(|row| row.name.ends_with("Coin")).count();
        assert_eq!((bills, coins), (6, 7));
        assert_eq!(rows[0].value, Amount::new(dec!(1000.00)));
    }

    #[tokio::test]
    async fn test_reseeding_bill_and_coins_fails_on_first_denomination() {
        let t = fixtures::tenant().await;
        fixtures::currency(&t.db, "PHP", "Philippine Peso").await;
        let seeder = t.db.seeder().unwrap();
        let org = t.tenant.organization_id;
        let branch = t.tenant.branch_id;

        let mut tx = t.db.begin().await.unwrap();
        seeder
            .seed_bill_and_coins(&mut tx, t.user_id, org, branch)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let mut tx = t.db.begin().await.unwrap();
        let err = seeder
            .seed_bill_and_coins(&mut tx, t.user_id, org, branch)
            .await
            .unwrap_err();
        drop(tx);

        assert!(err.is_unique_violation());
        assert_eq!(
            err.to_string(),
            "failed to seed bill and coin ₱ 1000 Bill for currency PHP: Duplicate \
             bill_and_coins.name, bill_and_coins.organization_id, bill_and_coins.branch_id"
        );
    }

    #[tokio::test]
    async fn test_holiday_seed_error_names_holiday_and_currency() {
        let t = fixtures::tenant().await;
        fixtures::currency(&t.db, "ZZZ", "Test Unit").await;
        let seeder = t.db.seeder().unwrap();

        let mut tx = t.db.begin().await.unwrap();
        let err = seeder
            .seed_holidays_for_year(
                &mut tx,
                t.user_id,
                t.tenant.organization_id,
                Uuid::new_v4(),
                2025,
            )
            .await
            .unwrap_err();
        drop(tx);

        assert!(matches!(err.root(), DbError::ForeignKeyViolation { .. }));
        assert!(err
            .to_string()
            .starts_with("failed to seed holiday New Year's Day for currency ZZZ: "));
    }

    #[tokio::test]
    async fn test_unmatched_currency_gets_fallback_holidays() {
        let t = fixtures::tenant().await;
        fixtures::currency(&t.db, "ZZZ", "Test Unit").await;
        let seeder = t.db.seeder().unwrap();

        let mut tx = t.db.begin().await.unwrap();
        let inserted = seeder
            .seed_holidays_for_year(
                &mut tx,
                t.user_id,
                t.tenant.organization_id,
                t.tenant.branch_id,
                2025,
            )
            .await
            .unwrap();
        let coins = seeder
            .seed_bill_and_coins(
                &mut tx,
                t.user_id,
                t.tenant.organization_id,
                t.tenant.branch_id,
            )
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(coins, 0);

        let holidays = t
            .db
            .holidays()
            .current_branch(t.tenant.organization_id, t.tenant.branch_id)
            .await
            .unwrap();
        assert_eq!(holidays.len(), 2);
        assert_eq!(holidays[0].name, "New Year's Day");
        assert_eq!(
            holidays[0].entry_date,
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(holidays[1].name, "Christmas Day");
        assert_eq!(
            holidays[1].entry_date,
            Utc.with_ymd_and_hms(2025, 12, 25, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_seeding_without_currencies_fails() {
        let t = fixtures::tenant().await;
        let seeder = t.db.seeder().unwrap();
        let org = t.tenant.organization_id;
        let branch = t.tenant.branch_id;

        let mut tx = t.db.begin().await.unwrap();
        let err = seeder
            .seed_bill_and_coins(&mut tx, t.user_id, org, branch)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::PreconditionFailed(_)));
        assert_eq!(
            err.to_string(),
            "no currencies found for bill and coins seeding"
        );

        let err = seeder
            .seed_holidays(&mut tx, t.user_id, org, branch)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "no currencies found for holiday seeding");
    }

    #[tokio::test]
    async fn test_seed_branch_rolls_back_with_tx() {
        let t = fixtures::tenant().await;
        fixtures::currency(&t.db, "PHP", "Philippine Peso").await;
        let seeder = t.db.seeder().unwrap();
        let org = t.tenant.organization_id;
        let branch = t.tenant.branch_id;

        let mut tx = t.db.begin().await.unwrap();
        let summary = seeder
            .seed_branch(&mut tx, t.user_id, org, branch)
            .await
            .unwrap();
        assert_eq!(summary.bill_and_coins, 13);
        assert_eq!(
            summary.holidays,
            seeder.reference_data().holidays("PHP").len()
        );
        tx.rollback().await.unwrap();

        assert!(t
            .db
            .bill_and_coins()
            .current_branch(org, branch)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(t.db.outbox().count_pending().await.unwrap(), 1);
    }
}
