//! Check remittances: checks handed over to a bank, recorded against a
//! teller's transaction batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::record::{format_timestamp, Audit, Record, Tenant};
use super::related::{
    Bank, BankResponse, Branch, BranchResponse, Media, MediaResponse, Organization,
    OrganizationResponse, TransactionBatch, TransactionBatchResponse, User, UserResponse,
};
use super::{Currency, CurrencyResponse, Resource};
use crate::amount::Amount;
use crate::preload::{Preload, Related, Relation};
use crate::topics::EventTopics;
use crate::validation::{max_len, positive_amount, required_id, Validate, ValidationResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CheckRemittance {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub record: Record,
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub audit: Audit,
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub tenant: Tenant,

    pub bank_id: Uuid,
    /// Scan of the check.
    pub media_id: Option<Uuid>,
    pub employee_user_id: Option<Uuid>,
    pub transaction_batch_id: Option<Uuid>,
    pub currency_id: Uuid,
    pub reference_number: String,
    pub account_name: String,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub amount: Amount,
    pub date_entry: DateTime<Utc>,
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
    pub bank: Option<Bank>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub media: Option<Media>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub employee_user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub transaction_batch: Option<TransactionBatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub currency: Option<Currency>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckRemittanceResponse {
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
    pub bank_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub bank: Option<BankResponse>,
    #[ts(as = "Option<String>")]
    pub media_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub media: Option<MediaResponse>,
    #[ts(as = "Option<String>")]
    pub employee_user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub employee_user: Option<UserResponse>,
    #[ts(as = "Option<String>")]
    pub transaction_batch_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub transaction_batch: Option<TransactionBatchResponse>,
    #[ts(as = "String")]
    pub currency_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub currency: Option<CurrencyResponse>,
    pub reference_number: String,
    pub account_name: String,
    #[ts(as = "String")]
    pub amount: Amount,
    pub date_entry: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckRemittanceRequest {
    #[ts(as = "String")]
    pub bank_id: Uuid,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub media_id: Option<Uuid>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub employee_user_id: Option<Uuid>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub transaction_batch_id: Option<Uuid>,
    #[ts(as = "String")]
    pub currency_id: Uuid,
    #[serde(default)]
    pub reference_number: String,
    #[serde(default)]
    pub account_name: String,
    #[ts(as = "String")]
    pub amount: Amount,
    /// Defaults to the time of creation.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub date_entry: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: String,
}

impl Validate for CheckRemittanceRequest {
    fn validate(&self) -> ValidationResult<()> {
        required_id("bank_id", self.bank_id)?;
        required_id("currency_id", self.currency_id)?;
        positive_amount("amount", self.amount)?;
        max_len("reference_number", &self.reference_number, 255)?;
        max_len("account_name", &self.account_name, 255)?;
        Ok(())
    }
}

impl CheckRemittanceRequest {
    pub fn into_entity(self, actor: Uuid, tenant: Tenant, now: DateTime<Utc>) -> CheckRemittance {
        CheckRemittance {
            record: Record::new(now),
            audit: Audit::by(actor),
            tenant,
            bank_id: self.bank_id,
            media_id: self.media_id,
            employee_user_id: self.employee_user_id,
            transaction_batch_id: self.transaction_batch_id,
            currency_id: self.currency_id,
            reference_number: self.reference_number,
            account_name: self.account_name,
            amount: self.amount,
            date_entry: self.date_entry.unwrap_or(now),
            description: self.description,
            created_by: None,
            updated_by: None,
            organization: None,
            branch: None,
            bank: None,
            media: None,
            employee_user: None,
            transaction_batch: None,
            currency: None,
        }
    }

    /// An absent `date_entry` keeps the stored one.
    pub fn apply_to(self, remittance: &mut CheckRemittance, actor: Uuid, now: DateTime<Utc>) {
        remittance.bank_id = self.bank_id;
        remittance.media_id = self.media_id;
        remittance.employee_user_id = self.employee_user_id;
        remittance.transaction_batch_id = self.transaction_batch_id;
        remittance.currency_id = self.currency_id;
        remittance.reference_number = self.reference_number;
        remittance.account_name = self.account_name;
        remittance.amount = self.amount;
        if let Some(date_entry) = self.date_entry {
            remittance.date_entry = date_entry;
        }
        remittance.description = self.description;
        remittance.audit.updated_by_id = Some(actor);
        remittance.record.touch(now);
    }
}

impl Resource for CheckRemittance {
    type Response = CheckRemittanceResponse;

    fn to_response(&self) -> CheckRemittanceResponse {
        CheckRemittanceResponse {
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
            bank_id: self.bank_id,
            bank: Bank::resource(self.bank.as_ref()),
            media_id: self.media_id,
            media: Media::resource(self.media.as_ref()),
            employee_user_id: self.employee_user_id,
            employee_user: User::resource(self.employee_user.as_ref()),
            transaction_batch_id: self.transaction_batch_id,
            transaction_batch: TransactionBatch::resource(self.transaction_batch.as_ref()),
            currency_id: self.currency_id,
            currency: Currency::resource(self.currency.as_ref()),
            reference_number: self.reference_number.clone(),
            account_name: self.account_name.clone(),
            amount: self.amount,
            date_entry: format_timestamp(&self.date_entry),
            description: self.description.clone(),
        }
    }
}

impl EventTopics for CheckRemittance {
    const ENTITY: &'static str = "check_remittance";

    fn topic_id(&self) -> Uuid {
        self.record.id
    }

    fn topic_scopes(&self) -> Vec<String> {
        self.tenant.topic_scopes()
    }
}

impl Related for CheckRemittance {
    const PRELOADS: &'static [Preload] = &[
        Preload::CreatedBy,
        Preload::UpdatedBy,
        Preload::Bank,
        Preload::Media,
        Preload::EmployeeUser,
        Preload::TransactionBatch,
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
            Preload::Bank => Some(self.bank_id),
            Preload::EmployeeUser => self.employee_user_id,
            Preload::TransactionBatch => self.transaction_batch_id,
        }
    }

    fn attach(&mut self, preload: Preload, relation: Relation) {
        match (preload, relation) {
            (Preload::CreatedBy, Relation::User(user)) => self.created_by = Some(user),
            (Preload::UpdatedBy, Relation::User(user)) => self.updated_by = Some(user),
            (Preload::EmployeeUser, Relation::User(user)) => self.employee_user = Some(user),
            (Preload::Organization, Relation::Organization(org)) => self.organization = Some(org),
            (Preload::Branch, Relation::Branch(branch)) => self.branch = Some(branch),
            (Preload::Bank, Relation::Bank(bank)) => self.bank = Some(bank),
            (Preload::Media, Relation::Media(media)) => self.media = Some(media),
            (Preload::TransactionBatch, Relation::TransactionBatch(batch)) => {
                self.transaction_batch = Some(batch)
            }
            (Preload::Currency, Relation::Currency(currency)) => self.currency = Some(currency),
            _ => {}
        }
    }
}
