//! Storefront Module
//!
//! REST client capability for the storefront platform: fetching orders and
//! pushing status/metadata updates back.

pub mod client;

pub use client::{ClientError, StorefrontApi, StorefrontClientFactory, WooClient, WooClientFactory};
