use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info};

use super::performance::PerformanceSummary;
use super::portfolio_model::{
    DashboardSummary, NewHolding, NewPortfolio, PortfolioDetails, PortfolioInfo,
    PortfolioRemoval, PortfolioSummary,
};
use super::portfolio_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
use crate::construction::{CollaboratorError, ConstructedHolding, ConstructedPortfolio};
use crate::errors::{Error, Result};
use crate::sorting::{HoldingSortColumn, PortfolioSortColumn, SortSpec};

pub const PORTFOLIO_NOT_FOUND: &str = "Portfolio not found for this user.";
const PURCHASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Service for owned portfolios and their holdings.
pub struct PortfolioService {
    repository: Arc<dyn PortfolioRepositoryTrait>,
}

impl PortfolioService {
    pub fn new(repository: Arc<dyn PortfolioRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn ensure_valid_id(portfolio_id: i32) -> Result<()> {
        if portfolio_id <= 0 {
            return Err(Error::invalid_input("Invalid portfolio."));
        }
        Ok(())
    }
}

/// Name given to a portfolio saved from the construction page.
pub fn generated_portfolio_name(index_symbol: &str, saved_at: NaiveDateTime) -> String {
    format!("{} - {}", index_symbol, saved_at.format("%Y-%m-%d %H:%M:%S"))
}

pub fn generated_portfolio_description(index_symbol: &str) -> String {
    format!("Auto-generated portfolio for index {}", index_symbol)
}

/// A freshly bought holding: priced at LTP with no P/L yet.
fn opening_holding(row: &ConstructedHolding) -> Result<NewHolding> {
    let date_of_purchase = NaiveDate::parse_from_str(&row.date_of_purchase, PURCHASE_DATE_FORMAT)
        .map_err(|e| {
            CollaboratorError::Malformed(format!(
                "bad DATE_OF_PURCHASE '{}' for {}: {}",
                row.date_of_purchase, row.symbol, e
            ))
        })?;
    Ok(NewHolding {
        symbol: row.symbol.clone(),
        company_name: None,
        date_of_purchase,
        buy_price: row.ltp,
        current_price: row.ltp,
        quantity: row.quantity,
        invested_amount: row.invested_amount,
        current_value: row.invested_amount,
        pl_amount: 0.0,
        pl_percent: 0.0,
    })
}

#[async_trait]
impl PortfolioServiceTrait for PortfolioService {
    fn get_dashboard(&self, user_id: i32) -> Result<DashboardSummary> {
        let totals = self.repository.dashboard_totals(user_id)?;
        debug!(
            "Dashboard for user {}: {} portfolios, invested {}, current {}",
            user_id, totals.portfolio_count, totals.total_invested, totals.total_current
        );
        Ok(DashboardSummary {
            portfolio_count: totals.portfolio_count,
            performance: PerformanceSummary::from_totals(
                totals.total_invested,
                totals.total_current,
            ),
        })
    }

    fn list_portfolios(
        &self,
        user_id: i32,
        sort: SortSpec<PortfolioSortColumn>,
    ) -> Result<Vec<PortfolioSummary>> {
        self.repository.list_for_user(user_id, sort)
    }

    fn get_portfolio_details(
        &self,
        user_id: i32,
        portfolio_id: i32,
        sort: SortSpec<HoldingSortColumn>,
    ) -> Result<PortfolioDetails> {
        Self::ensure_valid_id(portfolio_id)?;
        let portfolio = self
            .repository
            .find_owned(user_id, portfolio_id)?
            .ok_or_else(|| Error::NotFound(PORTFOLIO_NOT_FOUND.to_string()))?;

        let holdings = self.repository.list_holdings(portfolio_id, sort)?;
        let (invested, current) = holdings.iter().fold((0.0, 0.0), |(inv, cur), h| {
            (inv + h.invested_amount, cur + h.current_value)
        });

        Ok(PortfolioDetails {
            portfolio,
            holdings,
            performance: PerformanceSummary::from_totals(invested, current),
        })
    }

    async fn delete_portfolio(&self, user_id: i32, portfolio_id: i32) -> Result<PortfolioRemoval> {
        Self::ensure_valid_id(portfolio_id)?;
        let removal = self
            .repository
            .remove_for_user(user_id, portfolio_id)
            .await?
            .ok_or_else(|| Error::NotFound(PORTFOLIO_NOT_FOUND.to_string()))?;
        info!(
            "User {} removed portfolio {} ({:?})",
            user_id, portfolio_id, removal
        );
        Ok(removal)
    }

    async fn save_constructed(
        &self,
        user_id: i32,
        index_symbol: &str,
        constructed: &ConstructedPortfolio,
        saved_at: NaiveDateTime,
    ) -> Result<PortfolioInfo> {
        if index_symbol.trim().is_empty() {
            return Err(Error::invalid_input("No index specified."));
        }
        let holdings = constructed
            .portfolio
            .iter()
            .map(opening_holding)
            .collect::<Result<Vec<_>>>()?;

        let new_portfolio = NewPortfolio {
            portfolio_name: generated_portfolio_name(index_symbol, saved_at),
            description: Some(generated_portfolio_description(index_symbol)),
            index_symbol: Some(index_symbol.to_string()),
            created_by: user_id,
            total_invested: constructed.total_invested,
            holdings,
        };
        let created = self.repository.create(new_portfolio).await?;
        info!(
            "User {} saved portfolio {} '{}' with {} holdings",
            user_id,
            created.portfolio_id,
            created.portfolio_name,
            constructed.portfolio.len()
        );
        Ok(created)
    }
}
