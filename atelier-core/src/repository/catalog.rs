//! Catalog Repositories (products, materials)
//!
//! Reference lists only: orders copy product names/prices at order
//! time, so nothing here is joined against the order collection.

use super::{decode, encode};
use crate::orders::money::validate_amount;
use crate::store::{ListQuery, RecordStore, collections};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use shared::{CoreResult, Material, MaterialDraft, Product, ProductDraft};
use std::sync::Arc;

// =============================================================================
// Product Repository
// =============================================================================

#[derive(Clone)]
pub struct ProductRepository {
    store: Arc<dyn RecordStore>,
}

impl ProductRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, draft: ProductDraft) -> CoreResult<Product> {
        validate_required_text(&draft.name, "product name", MAX_NAME_LEN)?;
        validate_amount(draft.base_price, "base_price")?;
        validate_optional_text(&draft.description, "description", MAX_NOTE_LEN)?;
        validate_optional_text(&draft.image_url, "image_url", MAX_URL_LEN)?;

        let record = self
            .store
            .insert(collections::PRODUCTS, encode(&draft)?)
            .await?;
        decode(record)
    }

    pub async fn find_by_id(&self, id: &str) -> CoreResult<Option<Product>> {
        let record = self.store.get(collections::PRODUCTS, id).await?;
        record.map(decode).transpose()
    }

    /// All products, ordered by name
    pub async fn find_all(&self) -> CoreResult<Vec<Product>> {
        let records = self
            .store
            .list(collections::PRODUCTS, ListQuery::all())
            .await?;
        let mut products = records
            .into_iter()
            .map(decode)
            .collect::<CoreResult<Vec<Product>>>()?;
        products.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(products)
    }

    pub async fn delete(&self, id: &str) -> CoreResult<()> {
        self.store.delete(collections::PRODUCTS, id).await?;
        Ok(())
    }
}

// =============================================================================
// Material Repository
// =============================================================================

#[derive(Clone)]
pub struct MaterialRepository {
    store: Arc<dyn RecordStore>,
}

impl MaterialRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, draft: MaterialDraft) -> CoreResult<Material> {
        validate_required_text(&draft.name, "material name", MAX_NAME_LEN)?;
        validate_amount(draft.cost, "cost")?;
        validate_optional_text(&draft.supplier, "supplier", MAX_NAME_LEN)?;
        validate_optional_text(&draft.image_url, "image_url", MAX_URL_LEN)?;

        let record = self
            .store
            .insert(collections::MATERIALS, encode(&draft)?)
            .await?;
        decode(record)
    }

    pub async fn find_by_id(&self, id: &str) -> CoreResult<Option<Material>> {
        let record = self.store.get(collections::MATERIALS, id).await?;
        record.map(decode).transpose()
    }

    /// All materials, ordered by name
    pub async fn find_all(&self) -> CoreResult<Vec<Material>> {
        let records = self
            .store
            .list(collections::MATERIALS, ListQuery::all())
            .await?;
        let mut materials = records
            .into_iter()
            .map(decode)
            .collect::<CoreResult<Vec<Material>>>()?;
        materials.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(materials)
    }

    pub async fn delete(&self, id: &str) -> CoreResult<()> {
        self.store.delete(collections::MATERIALS, id).await?;
        Ok(())
    }
}
