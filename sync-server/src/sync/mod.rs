//! Sync Engine
//!
//! The reconciliation core: status mapping, entity resolution, order
//! reconciliation, run coordination and invoice propagation.

pub mod coordinator;
pub mod error;
pub mod invoice;
pub mod reconciler;
pub mod resolver;
pub mod status;

#[cfg(test)]
mod tests;

pub use coordinator::SyncCoordinator;
pub use error::SyncError;
pub use invoice::{InvoicePropagator, InvoiceSyncStatus, PropagationOutcome};
pub use reconciler::OrderReconciler;
pub use resolver::EntityResolver;
