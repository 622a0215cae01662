//! Portfolio module - owned portfolios, holdings and P/L figures.

mod performance;
mod portfolio_model;
mod portfolio_service;
mod portfolio_traits;


pub use performance::{pl_percent, PerformanceSummary, ValueTone};
pub use portfolio_model::{
    DashboardSummary, DashboardTotals, Holding, NewHolding, NewPortfolio, PortfolioDetails,
    PortfolioInfo, PortfolioRemoval, PortfolioSummary,
};
pub use portfolio_service::{
    generated_portfolio_description, generated_portfolio_name, PortfolioService,
    PORTFOLIO_NOT_FOUND,
};
pub use portfolio_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
