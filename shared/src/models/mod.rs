//! Domain models
//!
//! Plain serde records. All monetary fields are `f64` at rest; every
//! calculation over them goes through `rust_decimal` in the core.

pub mod catalog;
pub mod client;
pub mod order;

pub use catalog::{Material, MaterialDraft, Product, ProductDraft};
pub use client::{Client, ClientDraft};
pub use order::{
    ClientRef, ItemDraft, Order, OrderDraft, OrderHeaderPatch, OrderItem, OrderStatus,
    PaymentMethod, Priority, ProductionFlag,
};
