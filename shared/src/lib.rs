//! Shared types for the atelier order tracker
//!
//! Domain models and error types used by the core engine and by any
//! shell (CLI, web) built on top of it.

pub mod error;
pub mod models;

// Re-exports
pub use error::{CoreError, CoreResult};
pub use models::{
    Client, ClientDraft, ClientRef, ItemDraft, Material, MaterialDraft, Order, OrderDraft,
    OrderHeaderPatch, OrderItem, OrderStatus, PaymentMethod, Priority, Product, ProductDraft,
    ProductionFlag,
};
pub use serde::{Deserialize, Serialize};
