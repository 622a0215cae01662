//! Construction module - delegated portfolio construction and rebalancing.

mod builder_client;
mod construction_errors;
mod construction_model;
mod construction_traits;


pub use builder_client::PortfolioBuilderClient;
pub use construction_errors::CollaboratorError;
pub use construction_model::{
    ConstructedHolding, ConstructedPortfolio, ConstructionKey, ConstructionRequest,
    RebalanceOutcome, RebalanceRequest,
};
pub use construction_traits::PortfolioBuilderTrait;
