//! Holidays: per-branch non-working days, tied to the currency whose
//! country observes them.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::record::{format_timestamp, Audit, Record, Tenant};
use super::related::{Branch, BranchResponse, Organization, OrganizationResponse, User, UserResponse};
use super::{Currency, CurrencyResponse, Resource};
use crate::preload::{Preload, Related, Relation};
use crate::topics::EventTopics;
use crate::validation::{length_between, required_id, Validate, ValidationResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Holiday {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub record: Record,
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub audit: Audit,
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub tenant: Tenant,

    pub currency_id: Uuid,
    pub entry_date: DateTime<Utc>,
    pub name: String,
    pub description: String,

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
    pub currency: Option<Currency>,
}

impl Holiday {
    /// Calendar year of the entry date.
    pub fn year(&self) -> i32 {
        self.entry_date.year()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HolidayResponse {
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
    #[ts(as = "String")]
    pub currency_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub currency: Option<CurrencyResponse>,
    pub entry_date: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HolidayRequest {
    #[ts(as = "String")]
    pub entry_date: DateTime<Utc>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[ts(as = "String")]
    pub currency_id: Uuid,
}

/// Number of holidays recorded for one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct HolidayYearAvailable {
    pub year: i32,
    pub count: i64,
}

impl Validate for HolidayRequest {
    fn validate(&self) -> ValidationResult<()> {
        length_between("name", &self.name, 1, 255)?;
        required_id("currency_id", self.currency_id)?;
        Ok(())
    }
}

impl HolidayRequest {
    pub fn into_entity(self, actor: Uuid, tenant: Tenant, now: DateTime<Utc>) -> Holiday {
        Holiday {
            record: Record::new(now),
            audit: Audit::by(actor),
            tenant,
            currency_id: self.currency_id,
            entry_date: self.entry_date,
            name: self.name,
            description: self.description,
            created_by: None,
            updated_by: None,
            organization: None,
            branch: None,
            currency: None,
        }
    }

    pub fn apply_to(self, holiday: &mut Holiday, actor: Uuid, now: DateTime<Utc>) {
        holiday.entry_date = self.entry_date;
        holiday.name = self.name;
        holiday.description = self.description;
        holiday.currency_id = self.currency_id;
        holiday.audit.updated_by_id = Some(actor);
        holiday.record.touch(now);
    }
}

impl Resource for Holiday {
    type Response = HolidayResponse;

    fn to_response(&self) -> HolidayResponse {
        HolidayResponse {
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
            currency_id: self.currency_id,
            currency: Currency::resource(self.currency.as_ref()),
            entry_date: format_timestamp(&self.entry_date),
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

impl EventTopics for Holiday {
    const ENTITY: &'static str = "holiday";

    fn topic_id(&self) -> Uuid {
        self.record.id
    }

    fn topic_scopes(&self) -> Vec<String> {
        self.tenant.topic_scopes()
    }
}

impl Related for Holiday {
    const PRELOADS: &'static [Preload] =
        &[Preload::CreatedBy, Preload::UpdatedBy, Preload::Currency];

    fn relation_id(&self, preload: Preload) -> Option<Uuid> {
        match preload {
            Preload::CreatedBy => self.audit.created_by_id,
            Preload::UpdatedBy => self.audit.updated_by_id,
            Preload::Organization => Some(self.tenant.organization_id),
            Preload::Branch => Some(self.tenant.branch_id),
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
            (Preload::Currency, Relation::Currency(currency)) => self.currency = Some(currency),
            _ => {}
        }
    }
}
