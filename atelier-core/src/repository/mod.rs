//! Repository Module
//!
//! Typed CRUD wrappers over the [`RecordStore`](crate::store::RecordStore)
//! collaborator, one per collection. Repositories do the serde boundary
//! work and their own ordering over the returned snapshot; they never
//! retry a failed store call.

pub mod catalog;
pub mod client;
pub mod order;

pub use catalog::{MaterialRepository, ProductRepository};
pub use client::ClientRepository;
pub use order::OrderRepository;

use crate::store::StoreError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::CoreError;

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => {
                CoreError::not_found(format!("{collection}:{id}"))
            }
            other => CoreError::persistence(other.to_string()),
        }
    }
}

/// Deserialize a stored record into a typed model
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, CoreError> {
    serde_json::from_value(value).map_err(|e| CoreError::persistence(format!("decode: {e}")))
}

/// Serialize a typed model into a store record
pub(crate) fn encode<T: Serialize>(model: &T) -> Result<Value, CoreError> {
    serde_json::to_value(model).map_err(|e| CoreError::persistence(format!("encode: {e}")))
}
