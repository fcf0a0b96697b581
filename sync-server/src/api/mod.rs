//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`sync`] - trigger sync runs, read run status and logs
//! - [`config`] - read and update the storefront connection settings
//! - [`invoices`] - push invoice completion back to the storefront

pub mod config;
pub mod health;
pub mod invoices;
pub mod sync;
