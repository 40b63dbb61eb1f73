//! Record store collaborator
//!
//! The core persists through this opaque interface: JSON records in
//! named collections, single-round-trip operations, no transactions.
//! Retry/timeout policy belongs to the implementation; the core treats
//! any error as fatal to the current operation.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod blob;
pub mod memory;

pub use blob::{BlobStore, MemoryBlobStore};
pub use memory::MemoryStore;

/// Collection names understood by the core
pub mod collections {
    pub const CLIENTS: &str = "clients";
    pub const PRODUCTS: &str = "products";
    pub const MATERIALS: &str = "materials";
    pub const ORDERS: &str = "orders";
    pub const ORDER_ITEMS: &str = "order_items";
}

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found: {collection}:{id}")]
    NotFound { collection: String, id: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// List filter — a single top-level field equality check.
/// Ordering is left to the caller, which operates on the returned
/// snapshot anyway.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub eq: Option<(String, Value)>,
}

impl ListQuery {
    /// Match every record in the collection
    pub fn all() -> Self {
        Self::default()
    }

    /// Match records whose `field` equals `value`
    pub fn field_eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            eq: Some((field.into(), value.into())),
        }
    }

    /// Whether `record` satisfies this query
    pub fn matches(&self, record: &Value) -> bool {
        match &self.eq {
            None => true,
            Some((field, expected)) => record.get(field) == Some(expected),
        }
    }
}

/// Opaque record store: JSON records in named collections.
///
/// `insert` assigns the record id and returns the stored record with
/// its `id` field populated. `update` shallow-merges the top-level
/// fields of `patch` into the existing record. Implementations must
/// preserve insertion order within a collection (`list` returns records
/// oldest first).
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>>;

    async fn list(&self, collection: &str, query: ListQuery) -> StoreResult<Vec<Value>>;

    async fn insert(&self, collection: &str, record: Value) -> StoreResult<Value>;

    async fn update(&self, collection: &str, id: &str, patch: Value) -> StoreResult<Value>;

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;
}
