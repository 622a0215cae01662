use std::sync::Arc;

use chrono_tz::Tz;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{config::Config, session::SessionStore};
use stockfolio_core::{
    construction::{PortfolioBuilderClient, PortfolioBuilderTrait},
    indices::{HttpConstituentSource, IndexService, IndexServiceTrait},
    portfolio::{PortfolioService, PortfolioServiceTrait},
    users::UserRepositoryTrait,
};
use stockfolio_storage_sqlite::{
    db::{self, write_actor},
    IndexRepository, PortfolioRepository, PriceRepository, UserRepository,
};

pub struct AppState {
    pub user_repository: Arc<dyn UserRepositoryTrait>,
    pub index_service: Arc<dyn IndexServiceTrait>,
    pub portfolio_service: Arc<dyn PortfolioServiceTrait>,
    pub portfolio_builder: Arc<dyn PortfolioBuilderTrait>,
    pub sessions: SessionStore,
    pub display_tz: Tz,
    pub secure_cookies: bool,
}

/// Installs the global subscriber. `log` records from the library crates are
/// forwarded into it.
pub fn init_tracing() {
    let log_format = std::env::var("SF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer(pool.clone());

    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let index_repository = Arc::new(IndexRepository::new(pool.clone(), writer.clone()));
    let price_repository = Arc::new(PriceRepository::new(pool.clone(), writer.clone()));
    let portfolio_repository = Arc::new(PortfolioRepository::new(pool.clone(), writer));

    let constituent_source = Arc::new(HttpConstituentSource::new(config.csv_fetch_timeout)?);
    let index_service = Arc::new(IndexService::new(
        index_repository,
        price_repository,
        constituent_source,
    ));
    let portfolio_service = Arc::new(PortfolioService::new(portfolio_repository));
    let portfolio_builder = Arc::new(PortfolioBuilderClient::new(
        config.construction_api_url.clone(),
        config.rebalance_api_url.clone(),
        config.collaborator_timeout,
    )?);

    Ok(Arc::new(AppState {
        user_repository,
        index_service,
        portfolio_service,
        portfolio_builder,
        sessions: SessionStore::new(config.session_ttl),
        display_tz: config.display_tz,
        secure_cookies: config.secure_cookies,
    }))
}
