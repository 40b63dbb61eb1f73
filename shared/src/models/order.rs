//! Order aggregate records
//!
//! An order header plus its exclusively-owned line items form one
//! consistency unit. `total_price` is always recomputed from the items
//! by the core; callers never supply it directly.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// Enums
// ============================================================================

/// Scheduling priority
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    #[default]
    Normal,
    /// Sorts strictly before normal in the pending-work view
    High,
}

/// Delivery status — one-way transition, no defined inverse
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Delivered,
}

impl OrderStatus {
    /// Human label, as printed in exports
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pendente",
            OrderStatus::Delivered => "Entregue",
        }
    }
}

/// Payment method (fixed set, mirrors the shop's accepted methods)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Pix,
    Cash,
    Card,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Pix => "Pix",
            PaymentMethod::Cash => "Dinheiro",
            PaymentMethod::Card => "Cartão",
        }
    }
}

/// The two independent production-readiness flags
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductionFlag {
    /// Materials purchased / separated
    Material,
    /// Artwork finished
    Art,
}

// ============================================================================
// Records
// ============================================================================

/// Order line item — owned exclusively by one order, created and
/// destroyed only through the aggregate's item-set replacement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub order_id: String,
    /// Product name copied at order time (snapshot semantics)
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
}

/// Order header — the aggregate root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    #[serde(default)]
    pub id: String,
    /// Weak reference into the client directory
    pub client_id: String,
    /// Day the order was taken
    pub order_date: NaiveDate,
    pub delivery_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<NaiveTime>,
    /// Always Σ quantity × unit_price over the current items
    pub total_price: f64,
    /// Amount already collected ("sinal")
    #[serde(default)]
    pub down_payment: f64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    /// Attached image URLs, insertion order, duplicates permitted
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: OrderStatus,
    /// Materials ready — independent of status and of `art_status`
    #[serde(default)]
    pub material_status: bool,
    /// Artwork ready — independent of status and of `material_status`
    #[serde(default)]
    pub art_status: bool,
    /// Creation timestamp, Unix millis
    #[serde(default)]
    pub created_at: i64,
}

impl Order {
    pub fn is_delivered(&self) -> bool {
        self.status == OrderStatus::Delivered
    }

    /// Remaining balance (total − down payment), deliberately unclamped:
    /// a negative value means overpayment and is surfaced as-is
    pub fn remaining(&self) -> f64 {
        let total = Decimal::from_f64(self.total_price).unwrap_or(Decimal::ZERO);
        let down = Decimal::from_f64(self.down_payment).unwrap_or(Decimal::ZERO);
        (total - down).to_f64().unwrap_or(0.0)
    }

    /// Whether the delivery date has already passed
    pub fn is_late(&self, today: NaiveDate) -> bool {
        self.status == OrderStatus::Pending && self.delivery_date < today
    }
}

// ============================================================================
// Inputs
// ============================================================================

/// Reference to the client an order belongs to: either an existing
/// directory record or a new client created together with the order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientRef {
    Existing(String),
    New(super::ClientDraft),
}

/// Line item input for order creation / item replacement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDraft {
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
}

/// Input for creating an order aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDraft {
    pub client: ClientRef,
    /// Must be non-empty; the total is recomputed from these
    pub items: Vec<ItemDraft>,
    /// Defaults to today when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<NaiveDate>,
    pub delivery_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<NaiveTime>,
    #[serde(default)]
    pub down_payment: f64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
    #[serde(default)]
    pub priority: Priority,
}

/// Header field edits — never touches the item set or the total
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrderHeaderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,
    /// `Some(None)` clears the time slot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<Option<NaiveTime>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    /// `Some(None)` clears the observation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}
