//! Order aggregate: manager, money arithmetic, rendering snapshot
//!
//! The aggregate is an order header plus its exclusively-owned line
//! items. All mutations go through [`OrderManager`]; reads hand out
//! [`OrderDetail`] snapshots (header + items + client) ready for
//! rendering.

pub mod manager;
pub mod money;

pub use manager::OrderManager;

use shared::{Client, Order, OrderItem};

/// An order with its nested items and client, as handed to rendering
#[derive(Debug, Clone)]
pub struct OrderDetail {
    pub order: Order,
    /// `None` when the directory record has gone missing (weak reference)
    pub client: Option<Client>,
    pub items: Vec<OrderItem>,
}

impl OrderDetail {
    /// "2x Jogo de Banheiro + 1x Tapete"
    pub fn items_description(&self) -> String {
        money::items_description(&self.items)
    }

    /// Client display name, empty when the reference dangles
    pub fn client_name(&self) -> &str {
        self.client.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }

    pub fn client_contact(&self) -> &str {
        self.client
            .as_ref()
            .and_then(|c| c.contact.as_deref())
            .unwrap_or("")
    }
}

/// Case-insensitive quick-search over client name and item descriptions,
/// the same filter the overview and history screens apply
pub fn filter_details<'a>(details: &'a [OrderDetail], query: &str) -> Vec<&'a OrderDetail> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return details.iter().collect();
    }
    details
        .iter()
        .filter(|d| {
            d.client_name().to_lowercase().contains(&needle)
                || d.items
                    .iter()
                    .any(|i| i.product_name.to_lowercase().contains(&needle))
        })
        .collect()
}
