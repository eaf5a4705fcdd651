//! Bills and coins: the cash denominations a branch counts in each currency.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::record::{format_timestamp, Audit, Record, Tenant};
use super::related::{
    Branch, BranchResponse, Media, MediaResponse, Organization, OrganizationResponse, User,
    UserResponse,
};
use super::{Currency, CurrencyResponse, Resource};
use crate::amount::Amount;
use crate::preload::{Preload, Related, Relation};
use crate::topics::EventTopics;
use crate::validation::{length_between, positive_amount, required_id, Validate, ValidationResult};

/// A banknote or coin denomination.
///
/// `(name, organization_id, branch_id)` is unique: the same label may exist
/// once per branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BillAndCoins {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub record: Record,
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub audit: Audit,
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub tenant: Tenant,

    /// Optional picture of the note or coin.
    pub media_id: Option<Uuid>,
    pub currency_id: Uuid,
    pub name: String,
    /// Face value in major units (`0.25` for a 25-centavo coin).
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub value: Amount,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub created_by: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub updated_by: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub organization: Option<Organization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub branch: Option<Branch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub media: Option<Media>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub currency: Option<Currency>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillAndCoinsResponse {
    #[ts(as = "String")]
    pub id: Uuid,
    pub created_at: String,
    #[ts(as = "Option<String>")]
    pub created_by_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub created_by: Option<UserResponse>,
    pub updated_at: String,
    #[ts(as = "Option<String>")]
    pub updated_by_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub updated_by: Option<UserResponse>,
    #[ts(as = "String")]
    pub organization_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub organization: Option<OrganizationResponse>,
    #[ts(as = "String")]
    pub branch_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub branch: Option<BranchResponse>,
    #[ts(as = "Option<String>")]
    pub media_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub media: Option<MediaResponse>,
    #[ts(as = "String")]
    pub currency_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub currency: Option<CurrencyResponse>,
    pub name: String,
    #[ts(as = "String")]
    pub value: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillAndCoinsRequest {
    pub name: String,
    #[ts(as = "String")]
    pub value: Amount,
    #[ts(as = "String")]
    pub currency_id: Uuid,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub media_id: Option<Uuid>,
}

impl Validate for BillAndCoinsRequest {
    fn validate(&self) -> ValidationResult<()> {
        length_between("name", &self.name, 1, 255)?;
        positive_amount("value", self.value)?;
        required_id("currency_id", self.currency_id)?;
        Ok(())
    }
}

impl BillAndCoinsRequest {
    /// Builds a new denomination owned by `tenant`, created by `actor`.
    pub fn into_entity(self, actor: Uuid, tenant: Tenant, now: DateTime<Utc>) -> BillAndCoins {
        BillAndCoins {
            record: Record::new(now),
            audit: Audit::by(actor),
            tenant,
            media_id: self.media_id,
            currency_id: self.currency_id,
            name: self.name,
            value: self.value,
            created_by: None,
            updated_by: None,
            organization: None,
            branch: None,
            media: None,
            currency: None,
        }
    }

    pub fn apply_to(self, entity: &mut BillAndCoins, actor: Uuid, now: DateTime<Utc>) {
        entity.name = self.name;
        entity.value = self.value;
        entity.currency_id = self.currency_id;
        entity.media_id = self.media_id;
        entity.audit.updated_by_id = Some(actor);
        entity.record.touch(now);
    }
}

impl Resource for BillAndCoins {
    type Response = BillAndCoinsResponse;

    fn to_response(&self) -> BillAndCoinsResponse {
        BillAndCoinsResponse {
            id: self.record.id,
            created_at: format_timestamp(&self.record.created_at),
            created_by_id: self.audit.created_by_id,
            created_by: User::resource(self.created_by.as_ref()),
            updated_at: format_timestamp(&self.record.updated_at),
            updated_by_id: self.audit.updated_by_id,
            updated_by: User::resource(self.updated_by.as_ref()),
            organization_id: self.tenant.organization_id,
            organization: Organization::resource(self.organization.as_ref()),
            branch_id: self.tenant.branch_id,
            branch: Branch::resource(self.branch.as_ref()),
            media_id: self.media_id,
            media: Media::resource(self.media.as_ref()),
            currency_id: self.currency_id,
            currency: Currency::resource(self.currency.as_ref()),
            name: self.name.clone(),
            value: self.value,
        }
    }
}

impl EventTopics for BillAndCoins {
    const ENTITY: &'static str = "bill_and_coins";

    fn topic_id(&self) -> Uuid {
        self.record.id
    }

    fn topic_scopes(&self) -> Vec<String> {
        self.tenant.topic_scopes()
    }
}

impl Related for BillAndCoins {
    const PRELOADS: &'static [Preload] = &[
        Preload::CreatedBy,
        Preload::UpdatedBy,
        Preload::Media,
        Preload::Currency,
    ];

    fn relation_id(&self, preload: Preload) -> Option<Uuid> {
        match preload {
            Preload::CreatedBy => self.audit.created_by_id,
            Preload::UpdatedBy => self.audit.updated_by_id,
            Preload::Organization => Some(self.tenant.organization_id),
            Preload::Branch => Some(self.tenant.branch_id),
            Preload::Media => self.media_id,
            Preload::Currency => Some(self.currency_id),
            _ => None,
        }
    }

    fn attach(&mut self, preload: Preload, relation: Relation) {
        match (preload, relation) {
            (Preload::CreatedBy, Relation::User(user)) => self.created_by = Some(user),
            (Preload::UpdatedBy, Relation::User(user)) => self.updated_by = Some(user),
            (Preload::Organization, Relation::Organization(org)) => self.organization = Some(org),
            (Preload::Branch, Relation::Branch(branch)) => self.branch = Some(branch),
            (Preload::Media, Relation::Media(media)) => self.media = Some(media),
            (Preload::Currency, Relation::Currency(currency)) => self.currency = Some(currency),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn coin() -> BillAndCoinsRequest {
        BillAndCoinsRequest {
            name: "₱ 0.25 Coin".to_string(),
            value: Amount::new(dec!(0.25)),
            currency_id: Uuid::new_v4(),
            media_id: None,
        }
    }

    #[test]
    fn test_request_validation() {
        assert!(coin().validate().is_ok());

        let mut bad = coin();
        bad.value = Amount::ZERO;
        assert!(bad.validate().is_err());

        let mut bad = coin();
        bad.currency_id = Uuid::nil();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_into_entity_sets_tenant_and_actor() {
        let actor = Uuid::new_v4();
        let tenant = Tenant::new(Uuid::new_v4(), Uuid::new_v4());
        let entity = coin().into_entity(actor, tenant, Utc::now());

        assert_eq!(entity.tenant, tenant);
        assert_eq!(entity.audit.created_by_id, Some(actor));
        assert_eq!(entity.value.to_string(), "0.25");
    }

    #[test]
    fn test_projection_and_topics() {
        let tenant = Tenant::new(Uuid::new_v4(), Uuid::new_v4());
        let entity = coin().into_entity(Uuid::new_v4(), tenant, Utc::now());

        let response = entity.to_response();
        assert_eq!(response.branch_id, tenant.branch_id);
        assert!(response.currency.is_none());
        assert!(BillAndCoins::resource(None).is_none());

        let topics = entity.updated();
        assert_eq!(topics.len(), 4);
        assert_eq!(topics[2], format!("bill_and_coins.update.branch.{}", tenant.branch_id));
        assert_eq!(
            topics[3],
            format!("bill_and_coins.update.organization.{}", tenant.organization_id)
        );
    }

    #[test]
    fn test_attach_ignores_mismatched_relation() {
        let mut entity = coin().into_entity(Uuid::new_v4(), Tenant::new(Uuid::new_v4(), Uuid::new_v4()), Utc::now());
        let media = Media {
            id: Uuid::new_v4(),
            file_name: "coin.png".to_string(),
            url: "/media/coin.png".to_string(),
        };

        entity.attach(Preload::Currency, Relation::Media(media.clone()));
        assert!(entity.currency.is_none());

        entity.attach(Preload::Media, Relation::Media(media));
        assert!(entity.media.is_some());
        assert!(entity.to_response().media.is_some());
    }

    #[test]
    fn test_unloaded_relations_are_optional_fields() {
        let entity = coin().into_entity(Uuid::new_v4(), Tenant::new(Uuid::new_v4(), Uuid::new_v4()), Utc::now());
        let json = serde_json::to_value(entity.to_response()).unwrap();
        assert!(json.get("created_by").is_none());
        assert!(json.get("currency").is_none());
        assert!(json["media_id"].is_null());

        let decl = BillAndCoinsResponse::decl();
        assert!(decl.contains("created_by?: UserResponse"));
        assert!(decl.contains("currency?: CurrencyResponse"));
        assert!(decl.contains("media_id: string | null"));
    }
}
