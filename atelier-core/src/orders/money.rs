//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic goes through `Decimal` and is rounded to two
//! places, half away from zero; `f64` is only the at-rest and wire
//! representation. The order total is always recomputed from the line
//! items — a caller-supplied total is never trusted.

use rust_decimal::prelude::*;
use shared::{CoreError, CoreResult, ItemDraft, OrderItem};

use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line item
pub const MAX_QUANTITY: i32 = 9999;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field: &str) -> CoreResult<()> {
    if !value.is_finite() {
        return Err(CoreError::validation(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

/// Validate a monetary amount: finite, non-negative, bounded
pub fn validate_amount(value: f64, field: &str) -> CoreResult<()> {
    require_finite(value, field)?;
    if value < 0.0 {
        return Err(CoreError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    if value > MAX_PRICE {
        return Err(CoreError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_PRICE}), got {value}"
        )));
    }
    Ok(())
}

/// Validate a line item draft before persistence
pub fn validate_item_draft(item: &ItemDraft) -> CoreResult<()> {
    validate_required_text(&item.product_name, "product_name", MAX_NAME_LEN)?;
    validate_amount(item.unit_price, "unit_price")?;

    if item.quantity <= 0 {
        return Err(CoreError::validation(format!(
            "quantity must be positive, got {}",
            item.quantity
        )));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(CoreError::validation(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {}",
            item.quantity
        )));
    }
    Ok(())
}

/// Convert f64 to Decimal for calculation.
///
/// Inputs are validated finite at the boundary; if a non-finite value
/// somehow reaches here it is logged and treated as zero rather than
/// corrupting a financial sum.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Line total: quantity × unit price
pub fn line_total(item: &OrderItem) -> Decimal {
    (to_decimal(item.unit_price) * Decimal::from(item.quantity))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Order total: Σ quantity × unit price over the item set
pub fn order_total(items: &[OrderItem]) -> Decimal {
    items.iter().map(line_total).sum()
}

/// Total piece count over the item set
pub fn total_quantity(items: &[OrderItem]) -> i32 {
    items.iter().map(|i| i.quantity).sum()
}

/// Human description of the item set: "2x Jogo de Banheiro + 1x Tapete"
pub fn items_description(items: &[OrderItem]) -> String {
    items
        .iter()
        .map(|i| format!("{}x {}", i.quantity, i.product_name))
        .collect::<Vec<_>>()
        .join(" + ")
}
