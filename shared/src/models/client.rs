//! Client directory records
//!
//! Clients are owned independently of orders. Orders reference them by
//! id (weak reference); the directory blocks deletion while orders
//! still point at a client.

use serde::{Deserialize, Serialize};

/// Client identity record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    /// Record id (assigned by the store)
    #[serde(default)]
    pub id: String,
    /// Display name
    pub name: String,
    /// Contact (phone / messenger handle)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    /// Delivery / home address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Input for creating a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}
