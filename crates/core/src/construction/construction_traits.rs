use async_trait::async_trait;

use crate::construction::construction_model::{
    ConstructedPortfolio, ConstructionRequest, RebalanceOutcome, RebalanceRequest,
};
use crate::errors::Result;

/// The out-of-process services that pick stocks and rebalance holdings.
#[async_trait]
pub trait PortfolioBuilderTrait: Send + Sync {
    async fn construct(&self, request: &ConstructionRequest) -> Result<ConstructedPortfolio>;
    async fn rebalance(&self, request: &RebalanceRequest) -> Result<RebalanceOutcome>;
}
