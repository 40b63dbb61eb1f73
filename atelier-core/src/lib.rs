//! Order tracking core for a custom craft workshop
//!
//! The unit of consistency is the order aggregate: an order header plus
//! its exclusively-owned line items. Everything else is either a
//! reference list (clients, catalog) or a pure transformation over a
//! point-in-time snapshot of the order collection (reconciliation,
//! scheduling, export).
//!
//! Persistence is delegated to the [`store::RecordStore`] collaborator;
//! the core treats any store error as fatal to the current operation
//! and never retries.

pub mod export;
pub mod orders;
pub mod reports;
pub mod repository;
pub mod scheduler;
pub mod store;
pub mod utils;

// Re-exports
pub use export::{ExportOptions, ExportVariant, encode_csv, export_filename};
pub use orders::{OrderDetail, OrderManager, filter_details};
pub use reports::{FinancialSnapshot, SettlementPolicy, reconcile};
pub use scheduler::sort_pending;
pub use store::{BlobStore, MemoryBlobStore, MemoryStore, RecordStore};
