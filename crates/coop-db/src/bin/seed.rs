//! # Reference Data Seeder
//!
//! Provisions a demo organization and branch and fills them with the
//! embedded reference tables.
//!
//! ## Usage
//! ```bash
//! # Seed ./coop_dev.db (or $COOP_DB_PATH)
//! cargo run -p coop-db --bin seed
//!
//! # Another database, organization and branch
//! cargo run -p coop-db --bin seed -- --db ./data/coop.db \
//!     --organization "Bayanihan Cooperative" --branch "Cebu"
//!
//! # Date holidays in a specific year
//! cargo run -p coop-db --bin seed -- --year 2026
//! ```
//!
//! ## What Runs
//! 1. Migrations
//! 2. Currencies, only when the table is empty
//! 3. A new organization and branch (the admin user is reused by name)
//! 4. Bill and coin denominations and holidays for that branch, in one
//!    transaction

use std::path::PathBuf;

use clap::Parser;
use coop_core::{Branch, Organization, User};
use coop_db::pool::DEFAULT_DATABASE_PATH;
use coop_db::repository::Filter;
use coop_db::{Database, DbConfig, SeedSummary};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Seed a coop back-office database with reference data
#[derive(Debug, Parser)]
#[command(name = "seed")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// SQLite database file
    #[arg(short, long, env = "COOP_DB_PATH", default_value = DEFAULT_DATABASE_PATH)]
    db: PathBuf,

    /// Name of the organization to create
    #[arg(long, default_value = "Demo Cooperative")]
    organization: String,

    /// Name of the branch to create
    #[arg(long, default_value = "Main Branch")]
    branch: String,

    /// User recorded as the creator of seeded rows
    #[arg(long, default_value = "admin")]
    user: String,

    /// Year to date holidays in (defaults to the current UTC year)
    #[arg(long)]
    year: Option<i32>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,coop=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing();

    info!(db = %args.db.display(), "Coop reference data seeder");

    let db = Database::new(DbConfig::new(args.db.clone())).await?;
    let related = db.related();
    let seeder = db.seeder()?;

    let user = match related.find_user_by_name(&args.user).await? {
        Some(user) => user,
        None => {
            let user = User {
                id: Uuid::new_v4(),
                user_name: args.user.clone(),
                full_name: "Seed Administrator".to_string(),
                email: String::new(),
            };
            related.create_user(&user).await?;
            user
        }
    };

    let organization = Organization {
        id: Uuid::new_v4(),
        name: args.organization.clone(),
    };
    let branch = Branch {
        id: Uuid::new_v4(),
        organization_id: organization.id,
        name: args.branch.clone(),
    };
    related.create_organization(&organization).await?;
    related.create_branch(&branch).await?;
    info!(
        organization_id = %organization.id,
        branch_id = %branch.id,
        "Provisioned organization and branch"
    );

    let existing = db.currencies().count(Filter::new()).await?;
    if existing == 0 {
        let mut tx = db.begin().await?;
        seeder.seed_currencies(&mut tx).await?;
        tx.commit().await?;
    } else {
        info!(existing, "Currencies already present, skipping");
    }

    let mut tx = db.begin().await?;
    let summary = match args.year {
        Some(year) => SeedSummary {
            bill_and_coins: seeder
                .seed_bill_and_coins(&mut tx, user.id, organization.id, branch.id)
                .await?,
            holidays: seeder
                .seed_holidays_for_year(&mut tx, user.id, organization.id, branch.id, year)
                .await?,
        },
        None => {
            seeder
                .seed_branch(&mut tx, user.id, organization.id, branch.id)
                .await?
        }
    };
    tx.commit().await?;

    let pending_events = db.outbox().count_pending().await?;
    info!(
        bill_and_coins = summary.bill_and_coins,
        holidays = summary.holidays,
        pending_events,
        "Seed complete"
    );

    db.close().await;
    Ok(())
}
