//! # Check Remittance Repository
//!
//! Checks handed over to banks, grouped by the teller's transaction batch.
//!
//! ```text
//!   TransactionBatch ──┬── CheckRemittance  amount 15250.75
//!                      ├── CheckRemittance  amount  2000.00
//!                      └── CheckRemittance  amount   499.25
//!                                           ────────────────
//!   total_for_transaction_batch             17750.00 (exact)
//! ```
//!
//! Amounts are TEXT columns, so totals are summed as decimals in Rust rather
//! than with SQL `SUM`, which would go through floating point.

use coop_core::{Amount, Audit, CheckRemittance, CoreError, Record, Resource};
use tracing::debug;
use uuid::Uuid;

use super::{Filter, Repository, Table, Value};
use crate::error::DbResult;

impl Table for CheckRemittance {
    const TABLE: &'static str = "check_remittances";

    const COLUMNS: &'static [&'static str] = &[
        "id",
        "created_at",
        "updated_at",
        "deleted_at",
        "created_by_id",
        "updated_by_id",
        "deleted_by_id",
        "organization_id",
        "branch_id",
        "bank_id",
        "media_id",
        "employee_user_id",
        "transaction_batch_id",
        "currency_id",
        "reference_number",
        "account_name",
        "amount",
        "date_entry",
        "description",
    ];

    fn record(&self) -> &Record {
        &self.record
    }

    fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    fn audit_mut(&mut self) -> Option<&mut Audit> {
        Some(&mut self.audit)
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.record.id.into(),
            self.record.created_at.into(),
            self.record.updated_at.into(),
            self.record.deleted_at.into(),
            self.audit.created_by_id.into(),
            self.audit.updated_by_id.into(),
            self.audit.deleted_by_id.into(),
            self.tenant.organization_id.into(),
            self.tenant.branch_id.into(),
            self.bank_id.into(),
            self.media_id.into(),
            self.employee_user_id.into(),
            self.transaction_batch_id.into(),
            self.currency_id.into(),
            self.reference_number.as_str().into(),
            self.account_name.as_str().into(),
            self.amount.into(),
            self.date_entry.into(),
            self.description.as_str().into(),
        ]
    }

    fn payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.to_response())
    }
}

impl Repository<CheckRemittance> {
    pub async fn current_branch(
        &self,
        organization_id: Uuid,
        branch_id: Uuid,
    ) -> DbResult<Vec<CheckRemittance>> {
        self.find(Filter::new().tenant(organization_id, branch_id))
            .await
    }

    /// Remittances recorded against one transaction batch of a branch.
    pub async fn for_transaction_batch(
        &self,
        transaction_batch_id: Uuid,
        organization_id: Uuid,
        branch_id: Uuid,
    ) -> DbResult<Vec<CheckRemittance>> {
        self.find(
            Filter::new()
                .tenant(organization_id, branch_id)
                .eq("transaction_batch_id", transaction_batch_id),
        )
        .await
    }

    /// Sum of remittance amounts in a batch. Zero for an empty batch.
    ///
    /// Fails with `CoreError::InvalidAmount` when the sum leaves the decimal
    /// range.
    pub async fn total_for_transaction_batch(
        &self,
        transaction_batch_id: Uuid,
        organization_id: Uuid,
        branch_id: Uuid,
    ) -> DbResult<Amount> {
        let amounts: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT amount FROM check_remittances
            WHERE transaction_batch_id = ?1
              AND organization_id = ?2
              AND branch_id = ?3
              AND deleted_at IS NULL
            "#,
        )
        .bind(transaction_batch_id)
        .bind(organization_id)
        .bind(branch_id)
        .fetch_all(self.pool())
        .await?;

        let mut total = Amount::ZERO;
        for amount in &amounts {
            total = total
                .checked_add(Amount::parse(amount)?)
                .ok_or_else(|| CoreError::InvalidAmount {
                    value: amount.clone(),
                    reason: format!(
                        "total for transaction batch {} overflows",
                        transaction_batch_id
                    ),
                })?;
        }

        debug!(
            transaction_batch_id = %transaction_batch_id,
            remittances = amounts.len(),
            total = %total,
            "Totalled check remittances"
        );
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use coop_core::{Bank, CheckRemittanceRequest, TransactionBatch, Validate};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::repository::fixtures::{self, TestTenant};

    struct Desk {
        bank: Bank,
        batch: TransactionBatch,
        currency_id: Uuid,
    }

    async fn desk(t: &TestTenant) -> Desk {
        let php = fixtures::currency(&t.db, "PHP", "Philippine Peso").await;
        let bank = Bank {
            id: Uuid::new_v4(),
            organization_id: t.tenant.organization_id,
            branch_id: t.tenant.branch_id,
            name: "Land Bank".to_string(),
        };
        let batch = TransactionBatch {
            id: Uuid::new_v4(),
            organization_id: t.tenant.organization_id,
            branch_id: t.tenant.branch_id,
            batch_name: "Morning".to_string(),
            is_closed: false,
        };
        t.db.related().create_bank(&bank).await.unwrap();
        t.db.related().create_transaction_batch(&batch).await.unwrap();
        Desk {
            bank,
            batch,
            currency_id: php.record.id,
        }
    }

    fn check(desk: &Desk, reference: &str, amount: Amount, batched: bool) -> CheckRemittanceRequest {
        CheckRemittanceRequest {
            bank_id: desk.bank.id,
            media_id: None,
            employee_user_id: None,
            transaction_batch_id: batched.then_some(desk.batch.id),
            currency_id: desk.currency_id,
            reference_number: reference.to_string(),
            account_name: "Juan Dela Cruz".to_string(),
            amount,
            date_entry: None,
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_batch_total_is_exact() {
        let t = fixtures::tenant().await;
        let desk = desk(&t).await;
        let repo = t.db.check_remittances();

        for (reference, amount, batched) in [
            ("CHK-001", dec!(15250.75), true),
            ("CHK-002", dec!(2000.00), true),
            ("CHK-003", dec!(499.25), true),
            ("CHK-004", dec!(1.10), false),
        ] {
            let request = check(&desk, reference, Amount::new(amount), batched);
            request.validate().unwrap();
            repo.create(&request.into_entity(t.user_id, t.tenant, Utc::now()))
                .await
                .unwrap();
        }

        let org = t.tenant.organization_id;
        let branch = t.tenant.branch_id;

        let batch = repo
            .for_transaction_batch(desk.batch.id, org, branch)
            .await
            .unwrap();
        assert_eq!(batch.len(), 3);

        let total = repo
            .total_for_transaction_batch(desk.batch.id, org, branch)
            .await
            .unwrap();
        assert_eq!(total, Amount::new(dec!(17750.00)));

        assert_eq!(repo.current_branch(org, branch).await.unwrap().len(), 4);

        let empty = repo
            .total_for_transaction_batch(Uuid::new_v4(), org, branch)
            .await
            .unwrap();
        assert!(empty.is_zero());
    }

    #[tokio::test]
    async fn test_deleted_remittance_excluded_from_total() {
        let t = fixtures::tenant().await;
        let desk = desk(&t).await;
        let repo = t.db.check_remittances();

        let kept = check(&desk, "CHK-010", Amount::new(dec!(100)), true)
            .into_entity(t.user_id, t.tenant, Utc::now());
        let voided = check(&desk, "CHK-011", Amount::new(dec!(250)), true)
            .into_entity(t.user_id, t.tenant, Utc::now());
        repo.create(&kept).await.unwrap();
        repo.create(&voided).await.unwrap();
        repo.delete(voided.record.id, Some(t.user_id)).await.unwrap();

        let total = repo
            .total_for_transaction_batch(
                desk.batch.id,
                t.tenant.organization_id,
                t.tenant.branch_id,
            )
            .await
            .unwrap();
        assert_eq!(total, Amount::new(dec!(100)));
    }

    #[tokio::test]
    async fn test_batch_total_overflow_is_an_error() {
        let t = fixtures::tenant().await;
        let desk = desk(&t).await;
        let repo = t.db.check_remittances();

        for reference in ["CHK-040", "CHK-041"] {
            let request = check(&desk, reference, Amount::new(Decimal::MAX), true);
            request.validate().unwrap();
            repo.create(&request.into_entity(t.user_id, t.tenant, Utc::now()))
                .await
                .unwrap();
        }

        let err = repo
            .total_for_transaction_batch(
                desk.batch.id,
                t.tenant.organization_id,
                t.tenant.branch_id,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err.root(),
            crate::error::DbError::Core(CoreError::InvalidAmount { .. })
        ));
    }

    #[tokio::test]
    async fn test_preload_bank_and_batch() {
        let t = fixtures::tenant().await;
        let desk = desk(&t).await;
        let repo = t.db.check_remittances();

        let mut request = check(&desk, "CHK-020", Amount::new(dec!(5000)), true);
        request.employee_user_id = Some(t.user_id);
        let remittance = request.into_entity(t.user_id, t.tenant, Utc::now());
        repo.create(&remittance).await.unwrap();

        let mut all = repo
            .current_branch(t.tenant.organization_id, t.tenant.branch_id)
            .await
            .unwrap();
        repo.preload_all(&mut all).await.unwrap();

        let response = all[0].to_response();
        assert_eq!(response.bank.unwrap().name, "Land Bank");
        assert_eq!(response.transaction_batch.unwrap().batch_name, "Morning");
        assert_eq!(response.employee_user.unwrap().id, t.user_id);
        assert_eq!(response.currency.unwrap().currency_code, "PHP");
        assert!(response.media.is_none());
        assert_eq!(response.amount, Amount::new(dec!(5000)));
    }

    #[tokio::test]
    async fn test_bank_is_required_row() {
        let t = fixtures::tenant().await;
        let mut desk = desk(&t).await;
        desk.bank.id = Uuid::new_v4();

        let err = t
            .db
            .check_remittances()
            .create(
                &check(&desk, "CHK-030", Amount::new(dec!(1)), false)
                    .into_entity(t.user_id, t.tenant, Utc::now()),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err.root(),
            crate::error::DbError::ForeignKeyViolation { .. }
        ));
    }
}
