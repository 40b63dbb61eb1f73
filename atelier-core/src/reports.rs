//! Financial reconciliation
//!
//! Pure aggregation over order headers. All sums run on `Decimal` and
//! are rounded once at the end, so the snapshot identity
//! `gross == received + outstanding` holds to the cent regardless of
//! how the individual headers were rounded.

use crate::orders::money;
use serde::{Deserialize, Serialize};
use shared::Order;

/// How delivered orders count toward open receivables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementPolicy {
    /// Delivery settles the balance: only pending orders owe money.
    #[default]
    DeliveredImpliesSettled,
    /// Unpaid balances keep counting after delivery.
    TrackAfterDelivery,
}

/// Aggregated money position over a set of orders
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    /// Sum of all order totals, delivered or not
    pub gross: f64,
    /// gross − outstanding
    pub received: f64,
    /// Open balances per the settlement policy
    pub outstanding: f64,
    /// Number of orders aggregated
    pub count: usize,
}

/// Reconcile a set of order headers into a single snapshot.
pub fn reconcile(orders: &[Order], policy: SettlementPolicy) -> FinancialSnapshot {
    let mut gross = rust_decimal::Decimal::ZERO;
    let mut outstanding = rust_decimal::Decimal::ZERO;

    for order in orders {
        gross += money::to_decimal(order.total_price);
        let owes = match policy {
            SettlementPolicy::DeliveredImpliesSettled => !order.is_delivered(),
            SettlementPolicy::TrackAfterDelivery => true,
        };
        if owes {
            outstanding +=
                money::to_decimal(order.total_price) - money::to_decimal(order.down_payment);
        }
    }

    let received = gross - outstanding;
    FinancialSnapshot {
        gross: money::to_f64(gross),
        received: money::to_f64(received),
        outstanding: money::to_f64(outstanding),
        count: orders.len(),
    }
}
