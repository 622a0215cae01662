//! Portfolio, ownership and holding models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::performance::PerformanceSummary;

/// A portfolio as seen by one of its owners.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioInfo {
    pub portfolio_id: i32,
    pub portfolio_name: String,
    pub description: Option<String>,
    pub index_symbol: Option<String>,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
}

/// One row of the portfolio list, aggregated over its holdings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub portfolio_id: i32,
    pub portfolio_name: String,
    pub description: Option<String>,
    pub total_invested: f64,
    pub total_current: f64,
    pub pl_amount: f64,
    pub pl_percent: f64,
}

/// Raw dashboard aggregates for one user.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTotals {
    pub portfolio_count: i64,
    pub total_invested: f64,
    pub total_current: f64,
}

/// Dashboard figures ready for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub portfolio_count: i64,
    pub performance: PerformanceSummary,
}

/// A stock position inside a portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub holding_id: i32,
    pub portfolio_id: i32,
    pub symbol: String,
    pub company_name: Option<String>,
    pub date_of_purchase: NaiveDate,
    pub buy_price: f64,
    pub current_price: f64,
    pub quantity: i64,
    pub invested_amount: f64,
    pub current_value: f64,
    pub pl_amount: f64,
    pub pl_percent: f64,
}

/// Everything the portfolio detail page shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioDetails {
    pub portfolio: PortfolioInfo,
    pub holdings: Vec<Holding>,
    pub performance: PerformanceSummary,
}

impl PortfolioDetails {
    pub fn holding_count(&self) -> usize {
        self.holdings.len()
    }
}

/// Holding to insert alongside a new portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewHolding {
    pub symbol: String,
    pub company_name: Option<String>,
    pub date_of_purchase: NaiveDate,
    pub buy_price: f64,
    pub current_price: f64,
    pub quantity: i64,
    pub invested_amount: f64,
    pub current_value: f64,
    pub pl_amount: f64,
    pub pl_percent: f64,
}

/// A portfolio, its first owner link and its holdings, written together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolio {
    pub portfolio_name: String,
    pub description: Option<String>,
    pub index_symbol: Option<String>,
    pub created_by: i32,
    pub total_invested: f64,
    pub holdings: Vec<NewHolding>,
}

/// What a delete did to the shared portfolio row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortfolioRemoval {
    /// Only the caller's link was removed; other owners remain.
    Unlinked,
    /// The caller was the last owner; portfolio and holdings are gone.
    Deleted,
}
