//! # Collaborator Rows
//!
//! Users, organizations, branches, media, banks and transaction batches are
//! owned elsewhere. This repository resolves them for preloads and lets
//! fixtures and the seed binary insert the minimal rows the back-office
//! tables reference.

use coop_core::{
    Bank, Branch, Currency, Media, Organization, Preload, Relation, TransactionBatch, User,
};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use super::Table;
use crate::error::DbResult;

/// Repository for collaborator rows.
#[derive(Debug, Clone)]
pub struct RelatedRepository {
    pool: SqlitePool,
}

impl RelatedRepository {
    pub fn new(pool: SqlitePool) -> Self {
        RelatedRepository { pool }
    }

    // -------------------------------------------------------------------------
    // Inserts
    // -------------------------------------------------------------------------

    pub async fn create_user(&self, user: &User) -> DbResult<()> {
        sqlx::query("INSERT INTO users (id, user_name, full_name, email) VALUES (?1, ?2, ?3, ?4)")
            .bind(user.id)
            .bind(&user.user_name)
            .bind(&user.full_name)
            .bind(&user.email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn create_organization(&self, organization: &Organization) -> DbResult<()> {
        sqlx::query("INSERT INTO organizations (id, name) VALUES (?1, ?2)")
            .bind(organization.id)
            .bind(&organization.name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn create_branch(&self, branch: &Branch) -> DbResult<()> {
        sqlx::query("INSERT INTO branches (id, organization_id, name) VALUES (?1, ?2, ?3)")
            .bind(branch.id)
            .bind(branch.organization_id)
            .bind(&branch.name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn create_media(&self, media: &Media) -> DbResult<()> {
        sqlx::query("INSERT INTO media (id, file_name, url) VALUES (?1, ?2, ?3)")
            .bind(media.id)
            .bind(&media.file_name)
            .bind(&media.url)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn create_bank(&self, bank: &Bank) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO banks (id, organization_id, branch_id, name) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(bank.id)
        .bind(bank.organization_id)
        .bind(bank.branch_id)
        .bind(&bank.name)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn create_transaction_batch(&self, batch: &TransactionBatch) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO transaction_batches (id, organization_id, branch_id, batch_name, is_closed)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(batch.id)
        .bind(batch.organization_id)
        .bind(batch.branch_id)
        .bind(&batch.batch_name)
        .bind(batch.is_closed)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_user_by_name(&self, user_name: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, user_name, full_name, email FROM users WHERE user_name = ?1",
        )
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    // -------------------------------------------------------------------------
    // Preload resolution
    // -------------------------------------------------------------------------

    /// Loads the row a preload points at. `None` when it no longer exists.
    ///
    /// Soft-deleted currencies still resolve so historical rows keep their
    /// nested currency.
    pub async fn load_with_tx(
        conn: &mut SqliteConnection,
        preload: Preload,
        id: Uuid,
    ) -> DbResult<Option<Relation>> {
        debug!(preload = preload.as_str(), id = %id, "Loading relation");

        let relation = match preload {
            Preload::CreatedBy | Preload::UpdatedBy | Preload::EmployeeUser => {
                sqlx::query_as::<_, User>(
                    "SELECT id, user_name, full_name, email FROM users WHERE id = ?1",
                )
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?
                .map(Relation::User)
            }
            Preload::Organization => {
                sqlx::query_as::<_, Organization>("SELECT id, name FROM organizations WHERE id = ?1")
                    .bind(id)
                    .fetch_optional(&mut *conn)
                    .await?
                    .map(Relation::Organization)
            }
            Preload::Branch => sqlx::query_as::<_, Branch>(
                "SELECT id, organization_id, name FROM branches WHERE id = ?1",
            )
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .map(Relation::Branch),
            Preload::Media => {
                sqlx::query_as::<_, Media>("SELECT id, file_name, url FROM media WHERE id = ?1")
                    .bind(id)
                    .fetch_optional(&mut *conn)
                    .await?
                    .map(Relation::Media)
            }
            Preload::Bank => sqlx::query_as::<_, Bank>(
                "SELECT id, organization_id, branch_id, name FROM banks WHERE id = ?1",
            )
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .map(Relation::Bank),
            Preload::TransactionBatch => sqlx::query_as::<_, TransactionBatch>(
                r#"
                SELECT id, organization_id, branch_id, batch_name, is_closed
                FROM transaction_batches WHERE id = ?1
                "#,
            )
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .map(Relation::TransactionBatch),
            Preload::Currency => {
                let sql = format!(
                    "SELECT {} FROM {} WHERE id = ?1",
                    Currency::COLUMNS.join(", "),
                    Currency::TABLE
                );
                sqlx::query_as::<_, Currency>(&sql)
                    .bind(id)
                    .fetch_optional(&mut *conn)
                    .await?
                    .map(Relation::Currency)
            }
        };

        Ok(relation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures;

    #[tokio::test]
    async fn test_load_user_and_branch() {
        let t = fixtures::tenant().await;
        let mut conn = t.db.pool().acquire().await.unwrap();

        let user = RelatedRepository::load_with_tx(&mut conn, Preload::CreatedBy, t.user_id)
            .await
            .unwrap();
        match user {
            Some(Relation::User(user)) => assert_eq!(user.user_name, "admin-test"),
            other => panic!("expected user, got {:?}", other),
        }

        let branch =
            RelatedRepository::load_with_tx(&mut conn, Preload::Branch, t.tenant.branch_id)
                .await
                .unwrap();
        match branch {
            Some(Relation::Branch(branch)) => {
                assert_eq!(branch.organization_id, t.tenant.organization_id)
            }
            other => panic!("expected branch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_relation_is_none() {
        let t = fixtures::tenant().await;
        let mut conn = t.db.pool().acquire().await.unwrap();

        let missing = RelatedRepository::load_with_tx(&mut conn, Preload::Bank, Uuid::new_v4())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_branch_requires_organization() {
        let db = fixtures::database().await;
        let orphan = Branch {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            name: "Orphan".to_string(),
        };
        let err = db.related().create_branch(&orphan).await.unwrap_err();
        assert!(matches!(
            err.root(),
            crate::error::DbError::ForeignKeyViolation { .. }
        ));
    }
}
