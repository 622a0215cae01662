//! Stockfolio Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic behind the Stockfolio web app.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod constants;
pub mod construction;
pub mod errors;
pub mod indices;
pub mod portfolio;
pub mod sorting;
pub mod users;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
