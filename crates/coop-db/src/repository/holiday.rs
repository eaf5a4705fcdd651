//! # Holiday Repository
//!
//! Per-branch holiday calendars.
//!
//! ```text
//!   current_branch(org, branch)       every live holiday of the branch
//!   for_year(org, branch, 2025)       entry_date in [2025-01-01, 2026-01-01)
//!   years_available(org, branch)      [{year: 2024, count: 18}, {year: 2025, count: 19}]
//! ```
//!
//! `entry_date` is stored as RFC 3339 text, so year bounds compare
//! lexicographically and the year is the first four characters.

use chrono::{DateTime, NaiveDate, Utc};
use coop_core::{Audit, Holiday, HolidayYearAvailable, Record, Resource};
use tracing::debug;
use uuid::Uuid;

use super::{Filter, Repository, Table, Value};
use crate::error::{DbError, DbResult};

impl Table for Holiday {
    const TABLE: &'static str = "holidays";

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
        "currency_id",
        "entry_date",
        "name",
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
            self.currency_id.into(),
            self.entry_date.into(),
            self.name.as_str().into(),
            self.description.as_str().into(),
        ]
    }

    fn payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.to_response())
    }
}

fn year_start(year: i32) -> DbResult<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
        .ok_or_else(|| DbError::PreconditionFailed(format!("year {} is out of range", year)))
}

impl Repository<Holiday> {
    /// Holidays owned by one branch, in insertion order.
    pub async fn current_branch(
        &self,
        organization_id: Uuid,
        branch_id: Uuid,
    ) -> DbResult<Vec<Holiday>> {
        self.find(Filter::new().tenant(organization_id, branch_id))
            .await
    }

    /// Holidays of one branch falling in a calendar year.
    pub async fn for_year(
        &self,
        organization_id: Uuid,
        branch_id: Uuid,
        year: i32,
    ) -> DbResult<Vec<Holiday>> {
        let from = year_start(year)?;
        let until = year_start(year.saturating_add(1))?;

        self.find(
            Filter::new()
                .tenant(organization_id, branch_id)
                .gte("entry_date", from)
                .lt("entry_date", until),
        )
        .await
    }

    /// Years that have at least one holiday, with their counts, oldest first.
    pub async fn years_available(
        &self,
        organization_id: Uuid,
        branch_id: Uuid,
    ) -> DbResult<Vec<HolidayYearAvailable>> {
        let years = sqlx::query_as::<_, HolidayYearAvailable>(
            r#"
            SELECT CAST(substr(entry_date, 1, 4) AS INTEGER) AS year, COUNT(*) AS count
            FROM holidays
            WHERE organization_id = ?1 AND branch_id = ?2 AND deleted_at IS NULL
            GROUP BY year
            ORDER BY year ASC
            "#,
        )
        .bind(organization_id)
        .bind(branch_id)
        .fetch_all(self.pool())
        .await?;

        debug!(years = years.len(), "Loaded holiday years");
        Ok(years)
    }
}
