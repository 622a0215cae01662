mod model;
mod repository;

pub use model::{ClosePriceDB, IndexDB};
pub use repository::{IndexRepository, PriceRepository};
