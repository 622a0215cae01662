pub mod auth;
pub mod config;
pub mod error;
pub mod main_lib;
pub mod pages;
pub mod session;
pub mod views;

pub use main_lib::{build_state, init_tracing, AppState};
pub use pages::app_router;
