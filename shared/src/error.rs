//! Error taxonomy for the order tracking core
//!
//! Three failure classes matter to callers:
//! - [`CoreError::Validation`] — rejected before any persistence call,
//!   never partially applied.
//! - [`CoreError::Persistence`] — a collaborator (record store, blob
//!   store) failed; the operation aborted and no retry was attempted.
//! - [`CoreError::Consistency`] — a multi-step aggregate write failed
//!   partway. The persisted state may now be inconsistent (orphaned
//!   client, stale header total), so callers must not present the
//!   operation as saved.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application error for the order tracking core
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum CoreError {
    /// A required field is missing or a value is out of domain (400-class)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A business rule rejected the operation (e.g. re-delivering a
    /// delivered order, deleting a client with live orders)
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// A collaborator reported failure; propagated verbatim, no retry
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A multi-step aggregate operation failed partway; persisted state
    /// may be inconsistent and the caller must decide whether to retry
    /// the whole operation or alert an operator
    #[error("Consistency error during {operation}: {detail}")]
    Consistency { operation: String, detail: String },
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::BusinessRule(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    pub fn consistency(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Consistency {
            operation: operation.into(),
            detail: detail.into(),
        }
    }

    /// Whether the persisted state may have been left inconsistent
    pub fn is_consistency(&self) -> bool {
        matches!(self, Self::Consistency { .. })
    }
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consistency_is_distinguishable_from_persistence() {
        let plain = CoreError::persistence("store unreachable");
        let partial = CoreError::consistency("replace_items", "items inserted, header stale");

        assert!(!plain.is_consistency());
        assert!(partial.is_consistency());
        assert!(partial.to_string().contains("replace_items"));
    }
}
