//! Index reference data and constituent models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A tradeable stock index and where its constituent list is published.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    pub symbol: String,
    pub url: String,
}

/// End-of-day close for one symbol on one trading date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClosePrice {
    pub symbol: String,
    pub trade_date: NaiveDate,
    pub close_price: f64,
}

/// One row of an index constituent CSV.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndexConstituent {
    pub company_name: String,
    pub symbol: String,
}

/// A constituent joined with its latest close, if one is known.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndexStock {
    pub company_name: String,
    pub symbol: String,
    pub close_price: Option<f64>,
}

/// Everything the index browser page shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndexStocks {
    pub index_symbol: String,
    pub stocks: Vec<IndexStock>,
    pub suggested_count: usize,
}

impl IndexStocks {
    pub fn total_count(&self) -> usize {
        self.stocks.len()
    }
}
