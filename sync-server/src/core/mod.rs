//! Core Module
//!
//! Configuration, application state, errors and the HTTP server.

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use server::Server;
pub use state::AppState;
