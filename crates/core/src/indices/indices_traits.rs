use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::Result;
use crate::indices::indices_model::{ClosePrice, Index, IndexStocks};

/// Trait for index reference data
#[async_trait]
pub trait IndexRepositoryTrait: Send + Sync {
    /// All indices ordered by symbol.
    fn list_indices(&self) -> Result<Vec<Index>>;
    fn get_index(&self, symbol: &str) -> Result<Option<Index>>;
    async fn upsert_index(&self, index: Index) -> Result<Index>;
}

/// Trait for end-of-day price storage
#[async_trait]
pub trait PriceRepositoryTrait: Send + Sync {
    /// Most recent close per symbol. Symbols without any price are absent.
    fn latest_close_prices(&self, symbols: &[String]) -> Result<HashMap<String, f64>>;
    async fn upsert_close_prices(&self, prices: Vec<ClosePrice>) -> Result<usize>;
}

/// Somewhere a constituent CSV can be downloaded from.
#[async_trait]
pub trait ConstituentSourceTrait: Send + Sync {
    async fn fetch_csv(&self, url: &str) -> Result<String>;
}

/// Trait for the index browser
#[async_trait]
pub trait IndexServiceTrait: Send + Sync {
    fn list_indices(&self) -> Result<Vec<Index>>;
    async fn get_index_stocks(&self, symbol: &str) -> Result<IndexStocks>;
}
