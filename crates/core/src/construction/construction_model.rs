//! Request/response shapes exchanged with the portfolio builder services.

use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize};

use crate::sorting::{ConstructedSortColumn, SortSpec};

/// Body sent to the construction service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstructionRequest {
    pub index_symbol: String,
    pub no_of_stocks: i32,
    pub total_capital: f64,
}

impl ConstructionRequest {
    pub fn key(&self) -> ConstructionKey {
        ConstructionKey {
            index_symbol: self.index_symbol.clone(),
            total_capital: self.total_capital,
            no_of_stocks: self.no_of_stocks,
        }
    }
}

/// Identifies a construction result for reuse within a session.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructionKey {
    pub index_symbol: String,
    pub total_capital: f64,
    pub no_of_stocks: i32,
}

/// One stock picked by the construction service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstructedHolding {
    #[serde(rename = "SYMBOL")]
    pub symbol: String,
    #[serde(rename = "LTP")]
    pub ltp: f64,
    #[serde(rename = "QUANTITY", deserialize_with = "whole_number")]
    pub quantity: i64,
    #[serde(rename = "INVESTED_AMOUNT")]
    pub invested_amount: f64,
    #[serde(rename = "ONE_YEAR_RETURN_PCT", default)]
    pub one_year_return_pct: f64,
    #[serde(rename = "DATE_OF_PURCHASE")]
    pub date_of_purchase: String,
}

/// Quantities sometimes arrive as `12.0`.
fn whole_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value.round() as i64)
}

/// Successful construction result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstructedPortfolio {
    pub portfolio: Vec<ConstructedHolding>,
    pub total_invested: f64,
    pub free_cash: f64,
    pub no_of_stocks: i32,
}

impl ConstructedPortfolio {
    /// Reorders holdings in place. Numeric columns compare numerically.
    pub fn sort_by(&mut self, spec: SortSpec<ConstructedSortColumn>) {
        self.portfolio.sort_by(|a, b| {
            let ordering = match spec.column {
                ConstructedSortColumn::Symbol => a.symbol.cmp(&b.symbol),
                ConstructedSortColumn::Ltp => cmp_f64(a.ltp, b.ltp),
                ConstructedSortColumn::Quantity => a.quantity.cmp(&b.quantity),
                ConstructedSortColumn::InvestedAmount => {
                    cmp_f64(a.invested_amount, b.invested_amount)
                }
                ConstructedSortColumn::OneYearReturnPct => {
                    cmp_f64(a.one_year_return_pct, b.one_year_return_pct)
                }
            };
            spec.order.apply(ordering)
        });
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Raw construction service body; `success` gates everything else.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConstructionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub portfolio: Vec<ConstructedHolding>,
    #[serde(default)]
    pub total_invested: f64,
    #[serde(default)]
    pub free_cash: f64,
    pub no_of_stocks: Option<i32>,
    pub detail: Option<String>,
}

/// Body sent to the rebalance service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RebalanceRequest {
    pub portfolio_id: i32,
    pub user_id: i32,
    pub no_of_stocks: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RebalanceResponse {
    #[serde(default)]
    pub success: bool,
    pub detail: Option<String>,
}

/// How a rebalance attempt ended, short of a hard failure.
#[derive(Debug, Clone, PartialEq)]
pub enum RebalanceOutcome {
    /// The service committed new holdings.
    Completed,
    /// A business rule (e.g. minimum interval) refused the rebalance.
    Rejected { status: u16, detail: String },
}
