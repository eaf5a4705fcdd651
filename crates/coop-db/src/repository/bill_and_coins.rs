//! Bill and coin denominations, one set per branch.
//!
//! A denomination name is unique within its (organization, branch) pair.
//! The same name may exist in any other branch.

use coop_core::{Audit, BillAndCoins, Record, Resource};
use uuid::Uuid;

use super::{Filter, Repository, Table, Value};
use crate::error::DbResult;

impl Table for BillAndCoins {
    const TABLE: &'static str = "bill_and_coins";

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
        "media_id",
        "currency_id",
        "name",
        "value",
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
            self.media_id.into(),
            self.currency_id.into(),
            self.name.as_str().into(),
            self.value.into(),
        ]
    }

    fn payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.to_response())
    }
}

impl Repository<BillAndCoins> {
    /// Denominations owned by one branch.
    pub async fn current_branch(
        &self,
        organization_id: Uuid,
        branch_id: Uuid,
    ) -> DbResult<Vec<BillAndCoins>> {
        self.find(Filter::new().tenant(organization_id, branch_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use coop_core::{BillAndCoinsRequest, Media, Preload, Validate};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::repository::{fixtures, BillAndCoinsRepository};
    use coop_core::Amount;

    fn thousand(currency_id: Uuid) -> BillAndCoinsRequest {
        BillAndCoinsRequest {
            name: "1000 Peso Bill".to_string(),
            value: Amount::new(dec!(1000.00)),
            currency_id,
            media_id: None,
        }
    }

    #[tokio::test]
    async fn test_name_unique_per_branch() {
        let t = fixtures::tenant().await;
        let php = fixtures::currency(&t.db, "PHP", "Philippine Peso").await;
        let repo = t.db.bill_and_coins();

        let request = thousand(php.record.id);
        request.validate().unwrap();
        repo.create(&request.into_entity(t.user_id, t.tenant, Utc::now()))
            .await
            .unwrap();

        let err = repo
            .create(&thousand(php.record.id).into_entity(t.user_id, t.tenant, Utc::now()))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());

        let (other_user, other_branch) = fixtures::tenant_in(&t.db, "other").await;
        repo.create(&thousand(php.record.id).into_entity(other_user, other_branch, Utc::now()))
            .await
            .unwrap();

        let ours = repo
            .current_branch(t.tenant.organization_id, t.tenant.branch_id)
            .await
            .unwrap();
        assert_eq!(ours.len(), 1);
        assert_eq!(ours[0].tenant, t.tenant);
    }

    #[tokio::test]
    async fn test_value_round_trips_exactly() {
        let t = fixtures::tenant().await;
        let kwd = fixtures::currency(&t.db, "KWD", "Kuwaiti Dinar").await;

        let fils = BillAndCoinsRequest {
            name: "5 Fils Coin".to_string(),
            value: Amount::new(dec!(0.005)),
            currency_id: kwd.record.id,
            media_id: None,
        }
        .into_entity(t.user_id, t.tenant, Utc::now());
        t.db.bill_and_coins().create(&fils).await.unwrap();

        let stored = t.db.bill_and_coins().get_by_id(fils.record.id).await.unwrap();
        assert_eq!(stored.value, Amount::new(dec!(0.005)));
        assert_eq!(stored.value.to_string(), "0.005");
    }

    #[tokio::test]
    async fn test_preload_projects_relations() {
        let t = fixtures::tenant().await;
        let php = fixtures::currency(&t.db, "PHP", "Philippine Peso").await;
        let media = Media {
            id: Uuid::new_v4(),
            file_name: "1000-peso.png".to_string(),
            url: "/media/1000-peso.png".to_string(),
        };
        t.db.related().create_media(&media).await.unwrap();

        let mut request = thousand(php.record.id);
        request.media_id = Some(media.id);
        let bill = request.into_entity(t.user_id, t.tenant, Utc::now());

        let repo = t.db.bill_and_coins();
        repo.create(&bill).await.unwrap();

        let mut stored = repo.get_by_id(bill.record.id).await.unwrap();
        assert!(stored.currency.is_none());
        repo.preload(&mut stored).await.unwrap();

        let response = BillAndCoinsRepository::to_model(Some(&stored)).unwrap();
        assert_eq!(response.currency.unwrap().currency_code, "PHP");
        assert_eq!(response.media.unwrap().file_name, "1000-peso.png");
        assert_eq!(response.created_by.unwrap().id, t.user_id);
        assert!(response.organization.is_none());

        repo.preload_with(&mut stored, &[Preload::Organization, Preload::Branch])
            .await
            .unwrap();
        assert_eq!(
            stored.branch.as_ref().map(|b| b.id),
            Some(t.tenant.branch_id)
        );

        assert!(BillAndCoinsRepository::to_model(None).is_none());
    }

    #[tokio::test]
    async fn test_delete_records_actor() {
        let t = fixtures::tenant().await;
        let php = fixtures::currency(&t.db, "PHP", "Philippine Peso").await;
        let bill = thousand(php.record.id).into_entity(t.user_id, t.tenant, Utc::now());

        let repo = t.db.bill_and_coins();
        repo.create(&bill).await.unwrap();

        let deleted = repo.delete(bill.record.id, Some(t.user_id)).await.unwrap();
        assert_eq!(deleted.audit.deleted_by_id, Some(t.user_id));

        let live = repo
            .current_branch(t.tenant.organization_id, t.tenant.branch_id)
            .await
            .unwrap();
        assert!(live.is_empty());
        assert!(repo.get_by_id(bill.record.id).await.unwrap_err().is_not_found());
    }
}
