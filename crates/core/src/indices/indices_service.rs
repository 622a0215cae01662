use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use super::constituents::{parse_constituents, suggested_stock_count};
use super::indices_errors::IndexError;
use super::indices_model::{Index, IndexStock, IndexStocks};
use super::indices_traits::{
    ConstituentSourceTrait, IndexRepositoryTrait, IndexServiceTrait, PriceRepositoryTrait,
};
use crate::errors::Result;

/// Resolves an index into its constituents priced from the bhavcopy table.
pub struct IndexService {
    index_repository: Arc<dyn IndexRepositoryTrait>,
    price_repository: Arc<dyn PriceRepositoryTrait>,
    source: Arc<dyn ConstituentSourceTrait>,
}

impl IndexService {
    pub fn new(
        index_repository: Arc<dyn IndexRepositoryTrait>,
        price_repository: Arc<dyn PriceRepositoryTrait>,
        source: Arc<dyn ConstituentSourceTrait>,
    ) -> Self {
        Self {
            index_repository,
            price_repository,
            source,
        }
    }
}

#[async_trait]
impl IndexServiceTrait for IndexService {
    fn list_indices(&self) -> Result<Vec<Index>> {
        self.index_repository.list_indices()
    }

    async fn get_index_stocks(&self, symbol: &str) -> Result<IndexStocks> {
        let index = self
            .index_repository
            .get_index(symbol)?
            .ok_or_else(|| IndexError::UnknownIndex(symbol.to_string()))?;

        let csv_text = self.source.fetch_csv(&index.url).await?;
        let constituents = parse_constituents(&csv_text)?;
        if constituents.is_empty() {
            return Err(IndexError::NoConstituents(index.symbol).into());
        }

        let symbols: Vec<String> = constituents.iter().map(|c| c.symbol.clone()).collect();
        let prices = self.price_repository.latest_close_prices(&symbols)?;
        debug!(
            "Index {}: {} constituents, {} with a known close",
            index.symbol,
            constituents.len(),
            prices.len()
        );

        let stocks: Vec<IndexStock> = constituents
            .into_iter()
            .map(|c| IndexStock {
                close_price: prices.get(&c.symbol).copied(),
                company_name: c.company_name,
                symbol: c.symbol,
            })
            .collect();
        let suggested_count = suggested_stock_count(stocks.len());
        info!(
            "Loaded {} stocks for index {} (suggested {})",
            stocks.len(),
            index.symbol,
            suggested_count
        );

        Ok(IndexStocks {
            index_symbol: index.symbol,
            stocks,
            suggested_count,
        })
    }
}
