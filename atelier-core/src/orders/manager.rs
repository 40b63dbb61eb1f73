//! OrderManager - the order aggregate's single entry point
//!
//! Owns every mutation of an order and its line items:
//!
//! - `create` — two-step dependent write (client first when new, then
//!   header, then items)
//! - `replace_items` — full item-set replacement, insert-before-delete
//!   so the order is never observably itemless, then header total
//!   recomputation
//! - `update_header`, `attach_image` / `detach_image`
//! - `mark_delivered` — one-way transition
//! - `toggle_production_flag` — the two independent readiness booleans
//! - `delete` — cascade over items then header
//!
//! The store offers no transactions, so multi-step failures are
//! surfaced as [`CoreError::Consistency`] naming what was left behind;
//! they are never retried and never silently presented as success.

use super::{OrderDetail, money};
use crate::repository::{ClientRepository, OrderRepository};
use crate::scheduler;
use crate::store::{BlobStore, RecordStore};
use crate::utils::time::{now_millis, today};
use crate::utils::validation::{MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text};
use serde_json::{Map, Value, json};
use shared::{
    Client, ClientRef, CoreError, CoreResult, ItemDraft, Order, OrderDraft, OrderHeaderPatch,
    OrderItem, OrderStatus, ProductionFlag,
};
use std::collections::HashMap;
use std::sync::Arc;

pub struct OrderManager {
    clients: ClientRepository,
    orders: OrderRepository,
    blobs: Arc<dyn BlobStore>,
}

impl OrderManager {
    pub fn new(store: Arc<dyn RecordStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            clients: ClientRepository::new(store.clone()),
            orders: OrderRepository::new(store),
            blobs,
        }
    }

    /// Direct access to the client directory
    pub fn clients(&self) -> &ClientRepository {
        &self.clients
    }

    // ── Validation ──────────────────────────────────────────────────

    fn validate_draft(draft: &OrderDraft) -> CoreResult<()> {
        if draft.items.is_empty() {
            return Err(CoreError::validation(
                "an order must have at least one item",
            ));
        }
        for item in &draft.items {
            money::validate_item_draft(item)?;
        }
        money::validate_amount(draft.down_payment, "down_payment")?;
        validate_optional_text(&draft.observation, "observation", MAX_NOTE_LEN)?;
        Ok(())
    }

    // ── Creation ────────────────────────────────────────────────────

    /// Create an order aggregate.
    ///
    /// When `draft.client` is a new-client payload the client record is
    /// created first and its generated id bound to the order. If the
    /// client write succeeds but a later step fails, the client record
    /// persists orphaned; the returned `Consistency` error names it so
    /// an operator can decide what to do. No automatic retry.
    pub async fn create(&self, draft: OrderDraft) -> CoreResult<OrderDetail> {
        Self::validate_draft(&draft)?;

        let (client, client_was_created) = match &draft.client {
            ClientRef::Existing(id) => {
                let client = self
                    .clients
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| CoreError::not_found(format!("client {id}")))?;
                (client, false)
            }
            ClientRef::New(client_draft) => {
                (self.clients.create(client_draft.clone()).await?, true)
            }
        };

        let items: Vec<OrderItem> = draft
            .items
            .iter()
            .map(|d| OrderItem {
                id: String::new(),
                order_id: String::new(),
                product_name: d.product_name.clone(),
                quantity: d.quantity,
                unit_price: d.unit_price,
            })
            .collect();
        let total = money::to_f64(money::order_total(&items));

        let header = Order {
            id: String::new(),
            client_id: client.id.clone(),
            order_date: draft.order_date.unwrap_or_else(today),
            delivery_date: draft.delivery_date,
            delivery_time: draft.delivery_time,
            total_price: total,
            down_payment: draft.down_payment,
            payment_method: draft.payment_method,
            observation: draft.observation.clone(),
            priority: draft.priority,
            images: Vec::new(),
            status: OrderStatus::Pending,
            material_status: false,
            art_status: false,
            created_at: now_millis(),
        };

        let order = match self.orders.insert_header(&header).await {
            Ok(order) => order,
            Err(e) if client_was_created => {
                tracing::error!(client_id = %client.id, error = %e, "Order insert failed after client creation");
                return Err(CoreError::consistency(
                    "create_order",
                    format!(
                        "order insert failed after client {} was created; \
                         the client record persists orphaned: {e}",
                        client.id
                    ),
                ));
            }
            Err(e) => return Err(e),
        };

        let mut stored_items = Vec::with_capacity(items.len());
        for mut item in items {
            item.order_id = order.id.clone();
            match self.orders.insert_item(&item).await {
                Ok(stored) => stored_items.push(stored),
                Err(e) => {
                    tracing::error!(order_id = %order.id, error = %e, "Item insert failed mid-creation");
                    return Err(CoreError::consistency(
                        "create_order",
                        format!(
                            "order {} was created but only {}/{} items persisted: {e}",
                            order.id,
                            stored_items.len(),
                            draft.items.len()
                        ),
                    ));
                }
            }
        }

        tracing::info!(order_id = %order.id, client_id = %client.id, total, "Order created");
        Ok(OrderDetail {
            order,
            client: Some(client),
            items: stored_items,
        })
    }

    // ── Item-set replacement ────────────────────────────────────────

    /// Replace the entire item set and recompute the header total.
    ///
    /// The new set is inserted before the old one is deleted, so the
    /// order is never observably itemless. Returns the recomputed
    /// total. An empty item set is rejected — it would silently zero
    /// the order's total.
    pub async fn replace_items(&self, order_id: &str, items: Vec<ItemDraft>) -> CoreResult<f64> {
        if items.is_empty() {
            return Err(CoreError::validation(
                "item replacement with an empty set is not allowed",
            ));
        }
        for item in &items {
            money::validate_item_draft(item)?;
        }

        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("order {order_id}")))?;
        let old_items = self.orders.items_for_order(&order.id).await?;

        // Insert first. A failure before anything was persisted is a
        // plain persistence error; after that the aggregate holds a
        // mixed item set and the failure is a consistency error.
        let mut inserted = Vec::with_capacity(items.len());
        for draft in &items {
            let item = OrderItem {
                id: String::new(),
                order_id: order.id.clone(),
                product_name: draft.product_name.clone(),
                quantity: draft.quantity,
                unit_price: draft.unit_price,
            };
            match self.orders.insert_item(&item).await {
                Ok(stored) => inserted.push(stored),
                Err(e) if inserted.is_empty() => return Err(e),
                Err(e) => {
                    return Err(CoreError::consistency(
                        "replace_items",
                        format!(
                            "order {} holds a mixed item set ({} new inserted, old set intact): {e}",
                            order.id,
                            inserted.len()
                        ),
                    ));
                }
            }
        }

        for old in &old_items {
            if let Err(e) = self.orders.delete_item(&old.id).await {
                return Err(CoreError::consistency(
                    "replace_items",
                    format!(
                        "order {} holds duplicated items (new set inserted, old item {} not removed): {e}",
                        order.id, old.id
                    ),
                ));
            }
        }

        // Recompute from the freshly inserted set, never from the drafts.
        let total = money::to_f64(money::order_total(&inserted));
        if let Err(e) = self
            .orders
            .update_header(&order.id, json!({ "total_price": total }))
            .await
        {
            return Err(CoreError::consistency(
                "replace_items",
                format!(
                    "items of order {} were replaced but the header total is stale: {e}",
                    order.id
                ),
            ));
        }

        tracing::info!(order_id = %order.id, total, "Item set replaced");
        Ok(total)
    }

    // ── Header edits ────────────────────────────────────────────────

    /// Apply header field edits. Never touches the item set or the total.
    pub async fn update_header(
        &self,
        order_id: &str,
        patch: OrderHeaderPatch,
    ) -> CoreResult<Order> {
        if let Some(down) = patch.down_payment {
            money::validate_amount(down, "down_payment")?;
        }
        if let Some(Some(obs)) = &patch.observation {
            validate_optional_text(&Some(obs.clone()), "observation", MAX_NOTE_LEN)?;
        }

        let mut fields = Map::new();
        if let Some(v) = patch.order_date {
            fields.insert("order_date".to_string(), encode_field(&v)?);
        }
        if let Some(v) = patch.delivery_date {
            fields.insert("delivery_date".to_string(), encode_field(&v)?);
        }
        if let Some(v) = patch.delivery_time {
            fields.insert("delivery_time".to_string(), encode_field(&v)?);
        }
        if let Some(v) = patch.down_payment {
            fields.insert("down_payment".to_string(), json!(v));
        }
        if let Some(v) = patch.payment_method {
            fields.insert("payment_method".to_string(), encode_field(&v)?);
        }
        if let Some(v) = patch.observation {
            fields.insert("observation".to_string(), encode_field(&v)?);
        }
        if let Some(v) = patch.priority {
            fields.insert("priority".to_string(), encode_field(&v)?);
        }

        if fields.is_empty() {
            return self
                .orders
                .get(order_id)
                .await?
                .ok_or_else(|| CoreError::not_found(format!("order {order_id}")));
        }

        self.orders
            .update_header(order_id, Value::Object(fields))
            .await
    }

    /// Upload an image through the blob store and append its URL
    pub async fn attach_image(
        &self,
        order_id: &str,
        bytes: Vec<u8>,
        ext: &str,
    ) -> CoreResult<String> {
        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("order {order_id}")))?;

        let url = self.blobs.upload(bytes, ext).await?;
        if url.len() > MAX_URL_LEN {
            return Err(CoreError::validation("blob store returned an oversized URL"));
        }

        let mut images = order.images;
        images.push(url.clone());
        self.orders
            .update_header(&order.id, json!({ "images": images }))
            .await?;
        Ok(url)
    }

    /// Remove an attached image by exact URL match. Duplicate URLs are
    /// all removed together — they cannot be individually targeted.
    pub async fn detach_image(&self, order_id: &str, url: &str) -> CoreResult<()> {
        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("order {order_id}")))?;

        let mut images = order.images;
        images.retain(|u| u != url);
        self.orders
            .update_header(&order.id, json!({ "images": images }))
            .await?;
        Ok(())
    }

    // ── Status workflow ─────────────────────────────────────────────

    /// One-way transition to delivered. Re-delivering is rejected.
    pub async fn mark_delivered(&self, order_id: &str) -> CoreResult<Order> {
        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("order {order_id}")))?;
        if order.is_delivered() {
            return Err(CoreError::business_rule(format!(
                "order {order_id} is already delivered"
            )));
        }

        let updated = self
            .orders
            .update_header(&order.id, json!({ "status": "DELIVERED" }))
            .await?;
        tracing::info!(order_id = %order.id, "Order delivered");
        Ok(updated)
    }

    /// Flip one of the two production-readiness flags. Independent of
    /// order status and of the other flag; returns the new value.
    pub async fn toggle_production_flag(
        &self,
        order_id: &str,
        flag: ProductionFlag,
    ) -> CoreResult<bool> {
        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("order {order_id}")))?;

        let (field, new_value) = match flag {
            ProductionFlag::Material => ("material_status", !order.material_status),
            ProductionFlag::Art => ("art_status", !order.art_status),
        };
        self.orders
            .update_header(&order.id, json!({ field: new_value }))
            .await?;
        Ok(new_value)
    }

    // ── Deletion ────────────────────────────────────────────────────

    /// Delete the order and, transitively, its items. Items have no
    /// independent existence, so this is the cascade.
    pub async fn delete(&self, order_id: &str) -> CoreResult<()> {
        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("order {order_id}")))?;
        let items = self.orders.items_for_order(&order.id).await?;

        let total_items = items.len();
        for (idx, item) in items.iter().enumerate() {
            if let Err(e) = self.orders.delete_item(&item.id).await {
                return Err(CoreError::consistency(
                    "delete_order",
                    format!(
                        "order {} still exists with {}/{total_items} items removed: {e}",
                        order.id, idx
                    ),
                ));
            }
        }
        if let Err(e) = self.orders.delete_header(&order.id).await {
            return Err(CoreError::consistency(
                "delete_order",
                format!("items of order {} were removed but the header remains: {e}", order.id),
            ));
        }

        tracing::info!(order_id = %order.id, "Order deleted");
        Ok(())
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// One order with its nested items and client
    pub async fn load(&self, order_id: &str) -> CoreResult<OrderDetail> {
        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("order {order_id}")))?;
        let items = self.orders.items_for_order(&order.id).await?;
        let client = self.clients.find_by_id(&order.client_id).await?;
        Ok(OrderDetail {
            order,
            client,
            items,
        })
    }

    /// Every order, newest first — the history view
    pub async fn list_all(&self) -> CoreResult<Vec<OrderDetail>> {
        let orders = self.orders.list_all().await?;
        self.hydrate(orders).await
    }

    /// Pending orders in active-work sequence (priority, then due date)
    pub async fn pending(&self) -> CoreResult<Vec<OrderDetail>> {
        let orders = self.orders.list_pending().await?;
        let details = self.hydrate(orders).await?;
        Ok(scheduler::sort_pending(details))
    }

    async fn hydrate(&self, orders: Vec<Order>) -> CoreResult<Vec<OrderDetail>> {
        let mut client_cache: HashMap<String, Option<Client>> = HashMap::new();
        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            let client = match client_cache.get(&order.client_id) {
                Some(cached) => cached.clone(),
                None => {
                    let fetched = self.clients.find_by_id(&order.client_id).await?;
                    client_cache.insert(order.client_id.clone(), fetched.clone());
                    fetched
                }
            };
            let items = self.orders.items_for_order(&order.id).await?;
            details.push(OrderDetail {
                order,
                client,
                items,
            });
        }
        Ok(details)
    }
}

fn encode_field<T: serde::Serialize>(value: &T) -> CoreResult<Value> {
    serde_json::to_value(value).map_err(|e| CoreError::persistence(format!("encode: {e}")))
}
