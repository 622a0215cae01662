//! Indices module - index reference data, constituent lists and close prices.

mod constituent_source;
mod constituents;
mod indices_errors;
mod indices_model;
mod indices_service;
mod indices_traits;

#[cfg(test)]
mod indices_service_tests;

pub use constituent_source::HttpConstituentSource;
pub use constituents::{parse_bhavcopy, parse_constituents, suggested_stock_count};
pub use indices_errors::IndexError;
pub use indices_model::{ClosePrice, Index, IndexConstituent, IndexStock, IndexStocks};
pub use indices_service::IndexService;
pub use indices_traits::{
    ConstituentSourceTrait, IndexRepositoryTrait, IndexServiceTrait, PriceRepositoryTrait,
};
