//! Blob store collaborator
//!
//! The core only ever stores and displays the URL returned by
//! `upload`; upload mechanics, naming and retention belong to the
//! implementation.

use super::{StoreError, StoreResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` and return a URL for later display
    async fn upload(&self, bytes: Vec<u8>, ext: &str) -> StoreResult<String>;
}

/// In-process blob store used by tests
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve a stored blob by the URL `upload` returned
    pub fn get(&self, url: &str) -> Option<Vec<u8>> {
        self.blobs.read().get(url).cloned()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, bytes: Vec<u8>, ext: &str) -> StoreResult<String> {
        if bytes.is_empty() {
            return Err(StoreError::Backend("empty upload".to_string()));
        }
        let url = format!("mem://{}.{}", Uuid::new_v4(), ext.trim_start_matches('.'));
        self.blobs.write().insert(url.clone(), bytes);
        Ok(url)
    }
}
