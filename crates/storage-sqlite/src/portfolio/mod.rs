mod model;
mod repository;

pub use model::{HoldingDB, NewHoldingDB, NewPortfolioDB, NewUserPortfolioDB, PortfolioDB};
pub use repository::PortfolioRepository;
