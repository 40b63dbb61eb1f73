//! Catalog reference lists (products, materials)
//!
//! Informational only: an order item copies a product name/price at
//! order time, so later catalog edits never retroactively change
//! historical orders (snapshot semantics).

use serde::{Deserialize, Serialize};

/// Catalog product with a base price
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Suggested price when quoting an order
    pub base_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Input for creating a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub base_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Work material with its purchase cost
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Material {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Input for creating a material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialDraft {
    pub name: String,
    pub cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
