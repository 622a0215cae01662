//! SQLite storage implementation for Stockfolio.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `stockfolio-core` and contains:
//! - Database connection pooling and management
//! - Embedded Diesel migrations
//! - Repository implementations for users, indices, prices and portfolios
//! - Database-specific model types (with Diesel derives)
//!
//! All writes are funnelled through a single writer actor, so multi-statement
//! operations such as saving or deleting a portfolio run in one transaction.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod indices;
pub mod portfolio;
pub mod users;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use indices::{IndexRepository, PriceRepository};
pub use portfolio::PortfolioRepository;
pub use users::UserRepository;

// Re-export from stockfolio-core for convenience
pub use stockfolio_core::errors::{DatabaseError, Error, Result};
