//! Storefront Sync Server - reconciles storefront orders into the back office
//!
//! # Architecture overview
//!
//! - **Database** (`db`): embedded SurrealDB document store with per-entity
//!   repositories; every correlation key carries a unique index
//! - **Storefront** (`storefront`): REST client for the storefront orders API
//! - **Sync engine** (`sync`): status mapping, entity resolution, order
//!   reconciliation, run coordination, invoice propagation
//! - **Log sink** (`sync_log`): append-only persistent sync log
//! - **HTTP API** (`api`): operations exposed to the scheduler/dashboard layer
//!
//! # Module structure
//!
//! ```text
//! sync-server/src/
//! ├── core/          # Config, state, errors, HTTP server
//! ├── db/            # Database layer and repositories
//! ├── storefront/    # Storefront REST client
//! ├── sync/          # Reconciliation engine
//! ├── sync_log/      # Persistent sync log sink
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Logger setup
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod storefront;
pub mod sync;
pub mod sync_log;
pub mod utils;

// Re-export public types
pub use core::{AppError, AppResult, AppState, Config, Server};
pub use sync::{SyncCoordinator, SyncError};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
