//! Priority scheduler for the active-work view
//!
//! Deterministic ordering of pending orders: high priority strictly
//! first, then ascending delivery date. The sort must be stable —
//! repeated renders over unchanged data must not reorder rows that
//! compare equal, so ties keep their input order.

use crate::orders::OrderDetail;
use shared::{Order, Priority};
use std::cmp::Ordering;

fn priority_rank(priority: Priority) -> u8 {
    match priority {
        Priority::High => 0,
        Priority::Normal => 1,
    }
}

/// Urgency comparator: priority first, then due date. Returns `Equal`
/// for full ties so a stable sort preserves input order.
pub fn cmp_urgency(a: &Order, b: &Order) -> Ordering {
    priority_rank(a.priority)
        .cmp(&priority_rank(b.priority))
        .then_with(|| a.delivery_date.cmp(&b.delivery_date))
}

/// Keep only pending orders and sort them by urgency.
///
/// `Vec::sort_by` is stable; do not replace it with `sort_unstable_by`.
pub fn sort_pending(mut details: Vec<OrderDetail>) -> Vec<OrderDetail> {
    details.retain(|d| !d.order.is_delivered());
    details.sort_by(|a, b| cmp_urgency(&a.order, &b.order));
    details
}
