use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::construction::ConstructedPortfolio;
use crate::errors::Result;
use crate::portfolio::portfolio_model::{
    DashboardSummary, DashboardTotals, Holding, NewPortfolio, PortfolioDetails, PortfolioInfo,
    PortfolioRemoval, PortfolioSummary,
};
use crate::sorting::{HoldingSortColumn, PortfolioSortColumn, SortSpec};

/// Trait for portfolio repository operations
#[async_trait]
pub trait PortfolioRepositoryTrait: Send + Sync {
    fn dashboard_totals(&self, user_id: i32) -> Result<DashboardTotals>;
    fn list_for_user(
        &self,
        user_id: i32,
        sort: SortSpec<PortfolioSortColumn>,
    ) -> Result<Vec<PortfolioSummary>>;
    /// The portfolio only if `user_id` owns it.
    fn find_owned(&self, user_id: i32, portfolio_id: i32) -> Result<Option<PortfolioInfo>>;
    fn list_holdings(
        &self,
        portfolio_id: i32,
        sort: SortSpec<HoldingSortColumn>,
    ) -> Result<Vec<Holding>>;
    async fn create(&self, new_portfolio: NewPortfolio) -> Result<PortfolioInfo>;
    /// Removes the caller's link, and the portfolio once nobody owns it.
    /// `None` when the caller never owned it.
    async fn remove_for_user(
        &self,
        user_id: i32,
        portfolio_id: i32,
    ) -> Result<Option<PortfolioRemoval>>;
}

/// Trait for portfolio service operations
#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    fn get_dashboard(&self, user_id: i32) -> Result<DashboardSummary>;
    fn list_portfolios(
        &self,
        user_id: i32,
        sort: SortSpec<PortfolioSortColumn>,
    ) -> Result<Vec<PortfolioSummary>>;
    fn get_portfolio_details(
        &self,
        user_id: i32,
        portfolio_id: i32,
        sort: SortSpec<HoldingSortColumn>,
    ) -> Result<PortfolioDetails>;
    async fn delete_portfolio(&self, user_id: i32, portfolio_id: i32) -> Result<PortfolioRemoval>;
    /// Persists a constructed portfolio for `user_id`. `saved_at` is wall-clock
    /// time in the display zone and ends up in the portfolio name.
    async fn save_constructed(
        &self,
        user_id: i32,
        index_symbol: &str,
        constructed: &ConstructedPortfolio,
        saved_at: NaiveDateTime,
    ) -> Result<PortfolioInfo>;
}
