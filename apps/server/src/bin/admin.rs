//! Out-of-band administration: schema migration, user accounts, index
//! reference rows and end-of-day prices.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use stockfolio_core::indices::{
    parse_bhavcopy, Index, IndexRepositoryTrait, PriceRepositoryTrait,
};
use stockfolio_core::users::{NewUser, UserRepositoryTrait};
use stockfolio_server::{auth::hash_password, config::Config, init_tracing};
use stockfolio_storage_sqlite::{
    db::{self, write_actor},
    DbPool, IndexRepository, PriceRepository, UserRepository, WriteHandle,
};

#[derive(Parser)]
#[command(name = "stockfolio-admin", about = "Stockfolio administration commands")]
struct Cli {
    /// SQLite database file. Defaults to SF_DB_PATH.
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations.
    Migrate,
    /// Register a user who can log in.
    AddUser {
        username: String,

        #[arg(long)]
        password: String,
    },
    /// Add or replace an index and the URL of its constituent CSV.
    AddIndex { symbol: String, url: String },
    /// Load closing prices from a bhavcopy CSV.
    ImportBhavcopy {
        file: PathBuf,

        /// Trade date (YYYY-MM-DD) for files without a date column.
        #[arg(long)]
        date: Option<String>,
    },
}

fn open_database(db_path: &str) -> Result<(Arc<DbPool>, WriteHandle)> {
    let db_path = db::init(db_path)?;
    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer(pool.clone());
    Ok((pool, writer))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let db_path = match cli.db {
        Some(path) => path,
        None => Config::from_env()?.db_path,
    };
    let (pool, writer) = open_database(&db_path)?;

    match cli.command {
        Commands::Migrate => {
            tracing::info!("Database at {} is up to date", db_path);
        }
        Commands::AddUser { username, password } => {
            let username = username.trim().to_string();
            if username.is_empty() || password.trim().is_empty() {
                bail!("username and password must not be empty");
            }
            let password_hash = hash_password(&password)?;
            let users = UserRepository::new(pool, writer);
            let user = users
                .create_user(NewUser {
                    username,
                    password_hash,
                })
                .await
                .context("Failed to create user")?;
            tracing::info!("Created user '{}' with id {}", user.username, user.id);
        }
        Commands::AddIndex { symbol, url } => {
            let indices = IndexRepository::new(pool, writer);
            let index = indices
                .upsert_index(Index {
                    symbol: symbol.trim().to_string(),
                    url: url.trim().to_string(),
                })
                .await?;
            tracing::info!("Index {} now reads constituents from {}", index.symbol, index.url);
        }
        Commands::ImportBhavcopy { file, date } => {
            let fallback_date = date
                .map(|raw| {
                    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                        .with_context(|| format!("Invalid --date '{}'", raw))
                })
                .transpose()?;
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Cannot read {}", file.display()))?;
            let prices = parse_bhavcopy(&text, fallback_date)?;
            let prices_repo = PriceRepository::new(pool, writer);
            let stored = prices_repo.upsert_close_prices(prices).await?;
            tracing::info!("Stored {} closing prices from {}", stored, file.display());
        }
    }
    Ok(())
}
