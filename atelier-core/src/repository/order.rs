//! Order Repository
//!
//! Raw persistence for order headers and their line items. Aggregate
//! rules (total recomputation, insert-before-delete replacement,
//! cascades) live in the manager; this layer only does the round trips.

use super::{decode, encode};
use crate::store::{ListQuery, RecordStore, collections};
use serde_json::Value;
use shared::{CoreResult, Order, OrderItem};
use std::sync::Arc;

#[derive(Clone)]
pub struct OrderRepository {
    store: Arc<dyn RecordStore>,
}

impl OrderRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    // ── Headers ─────────────────────────────────────────────────────

    pub async fn insert_header(&self, order: &Order) -> CoreResult<Order> {
        let record = self
            .store
            .insert(collections::ORDERS, encode(order)?)
            .await?;
        decode(record)
    }

    pub async fn get(&self, id: &str) -> CoreResult<Option<Order>> {
        let record = self.store.get(collections::ORDERS, id).await?;
        record.map(decode).transpose()
    }

    /// Shallow header patch; the caller builds the JSON object
    pub async fn update_header(&self, id: &str, patch: Value) -> CoreResult<Order> {
        let record = self.store.update(collections::ORDERS, id, patch).await?;
        decode(record)
    }

    pub async fn delete_header(&self, id: &str) -> CoreResult<()> {
        self.store.delete(collections::ORDERS, id).await?;
        Ok(())
    }

    /// Every order, newest first (history view)
    pub async fn list_all(&self) -> CoreResult<Vec<Order>> {
        let records = self.store.list(collections::ORDERS, ListQuery::all()).await?;
        let mut orders = records
            .into_iter()
            .map(decode)
            .collect::<CoreResult<Vec<Order>>>()?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Orders still awaiting delivery, in store order
    pub async fn list_pending(&self) -> CoreResult<Vec<Order>> {
        let records = self
            .store
            .list(collections::ORDERS, ListQuery::field_eq("status", "PENDING"))
            .await?;
        records.into_iter().map(decode).collect()
    }

    // ── Items ───────────────────────────────────────────────────────

    /// Insert one line item, returning it with its assigned id
    pub async fn insert_item(&self, item: &OrderItem) -> CoreResult<OrderItem> {
        let record = self
            .store
            .insert(collections::ORDER_ITEMS, encode(item)?)
            .await?;
        decode(record)
    }

    /// Items belonging to an order, in insertion order
    pub async fn items_for_order(&self, order_id: &str) -> CoreResult<Vec<OrderItem>> {
        let records = self
            .store
            .list(
                collections::ORDER_ITEMS,
                ListQuery::field_eq("order_id", order_id),
            )
            .await?;
        records.into_iter().map(decode).collect()
    }

    pub async fn delete_item(&self, id: &str) -> CoreResult<()> {
        self.store.delete(collections::ORDER_ITEMS, id).await?;
        Ok(())
    }
}
