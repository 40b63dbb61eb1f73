//! In-memory record store
//!
//! Backs the test suite and small single-process deployments. Records
//! are kept per collection in insertion order; ids are uuid-v4 strings
//! assigned on insert.

use super::{ListQuery, RecordStore, StoreError, StoreResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_id(record: &Value) -> Option<&str> {
        record.get("id").and_then(Value::as_str)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let collections = self.collections.read();
        let records = match collections.get(collection) {
            Some(r) => r,
            None => return Ok(None),
        };
        Ok(records
            .iter()
            .find(|r| Self::record_id(r) == Some(id))
            .cloned())
    }

    async fn list(&self, collection: &str, query: ListQuery) -> StoreResult<Vec<Value>> {
        let collections = self.collections.read();
        let records = match collections.get(collection) {
            Some(r) => r,
            None => return Ok(Vec::new()),
        };
        Ok(records.iter().filter(|r| query.matches(r)).cloned().collect())
    }

    async fn insert(&self, collection: &str, mut record: Value) -> StoreResult<Value> {
        let obj = record.as_object_mut().ok_or_else(|| {
            StoreError::Serialization("record must be a JSON object".to_string())
        })?;
        obj.insert("id".to_string(), Value::from(Uuid::new_v4().to_string()));

        let mut collections = self.collections.write();
        collections
            .entry(collection.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> StoreResult<Value> {
        let patch_obj = patch.as_object().ok_or_else(|| {
            StoreError::Serialization("patch must be a JSON object".to_string())
        })?;

        let mut collections = self.collections.write();
        let records = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        let record = records
            .iter_mut()
            .find(|r| Self::record_id(r) == Some(id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        let obj = record.as_object_mut().ok_or_else(|| {
            StoreError::Serialization("stored record is not a JSON object".to_string())
        })?;
        for (key, value) in patch_obj {
            // `id` is immutable once assigned
            if key == "id" {
                continue;
            }
            obj.insert(key.clone(), value.clone());
        }
        Ok(record.clone())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let mut collections = self.collections.write();
        let records = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        let before = records.len();
        records.retain(|r| Self::record_id(r) != Some(id));
        if records.len() == before {
            return Err(StoreError::not_found(collection, id));
        }
        Ok(())
    }
}
