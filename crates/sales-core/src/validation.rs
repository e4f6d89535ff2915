//! # Validation Module
//!
//! Business-rule checks over parsed orders.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Pass                                    │
//! │                                                                         │
//! │  for each order i:                                                     │
//! │  ├── 1. id non-empty             → EmptyId(i)                          │
//! │  ├── 2. timestamp ≥ 10 chars     → BadTimestamp(i)                     │
//! │  ├── 3. items non-empty          → NoItems(i)                          │
//! │  └── 4. for each item j:                                               │
//! │         ├── sku non-empty        → EmptySku(i, j)                      │
//! │         ├── quantity > 0         → NonPositiveQty(i, j)                │
//! │         └── price >= 0           → NegativePrice(i, j)                 │
//! │                                                                         │
//! │  Every check always runs. The report lists ALL violations, in the      │
//! │  order above, so one pass gives the full diagnosis.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Calendar validity of the timestamp is not checked, only its length.
//!
//! ## Usage
//! ```rust
//! use sales_core::{parse, validate};
//!
//! let orders = parse(r#"[{"id":"","ts":"2024-01-01T10:00:00Z","items":[]}]"#).unwrap();
//! let report = validate(&orders);
//! assert!(!report.ok());
//! assert_eq!(report.violations.len(), 2);
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::Violation;
use crate::types::{Item, Order, DATE_PREFIX_LEN};

// =============================================================================
// Validation Report
// =============================================================================

/// Outcome of a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Every violation found, in check order.
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Wraps an already collected violation list.
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        ValidationReport { violations }
    }

    /// True iff no violation was found.
    #[inline]
    pub fn ok(&self) -> bool {
        self.violations.is_empty()
    }

    /// Indices of orders with at least one violation, ascending.
    pub fn invalid_orders(&self) -> BTreeSet<usize> {
        self.violations.iter().map(Violation::order_index).collect()
    }
}

// =============================================================================
// Validators
// =============================================================================

/// Validates every order and collects all violations.
pub fn validate(orders: &[Order]) -> ValidationReport {
    let mut violations = Vec::new();

    for (i, order) in orders.iter().enumerate() {
        validate_order(i, order, &mut violations);
    }

    ValidationReport { violations }
}

/// Checks one order, appending to `out`.
///
/// `index` is the order's position in the validated sequence and is what
/// the emitted violations refer to.
pub fn validate_order(index: usize, order: &Order, out: &mut Vec<Violation>) {
    if order.id.is_empty() {
        out.push(Violation::EmptyId { order: index });
    }

    if order.timestamp.chars().count() < DATE_PREFIX_LEN {
        out.push(Violation::BadTimestamp { order: index });
    }

    if order.items.is_empty() {
        out.push(Violation::NoItems { order: index });
    }

    for (j, item) in order.items.iter().enumerate() {
        validate_item(index, j, item, out);
    }
}

fn validate_item(order: usize, item_index: usize, item: &Item, out: &mut Vec<Violation>) {
    if item.sku.is_empty() {
        out.push(Violation::EmptySku {
            order,
            item: item_index,
        });
    }

    if item.quantity <= 0 {
        out.push(Violation::NonPositiveQty {
            order,
            item: item_index,
        });
    }

    if item.price < 0.0 {
        out.push(Violation::NegativePrice {
            order,
            item: item_index,
        });
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_order(id: &str) -> Order {
        Order::new(id, "2024-01-01T10:00:00Z", vec![Item::new("SKU-100A", 2, 10.0)])
    }

    #[test]
    fn test_valid_orders_pass() {
        let report = validate(&[valid_order("ORD000001"), valid_order("ORD000002")]);
        assert!(report.ok());
        assert!(report.violations.is_empty());
        assert!(report.invalid_orders().is_empty());
    }

    #[test]
    fn test_empty_input_passes() {
        assert!(validate(&[]).ok());
    }

    #[test]
    fn test_three_violations_on_one_order() {
        let order = Order::new("", "2024-", vec![Item::new("SKU-100A", -1, 10.0)]);
        let report = validate(&[order]);

        assert!(!report.ok());
        assert_eq!(
            report.violations,
            vec![
                Violation::EmptyId { order: 0 },
                Violation::BadTimestamp { order: 0 },
                Violation::NonPositiveQty { order: 0, item: 0 },
            ]
        );
    }

    #[test]
    fn test_no_short_circuit_across_orders() {
        let orders = vec![
            valid_order("ORD000001"),
            Order::new("ORD000002", "2024-01-01T10:00:00Z", vec![]),
            Order::new(
                "ORD000003",
                "2024-01-02T10:00:00Z",
                vec![
                    Item::new("", 1, 1.0),
                    Item::new("SKU-200B", 0, -100.0),
                ],
            ),
        ];
        let report = validate(&orders);

        assert_eq!(
            report.violations,
            vec![
                Violation::NoItems { order: 1 },
                Violation::EmptySku { order: 2, item: 0 },
                Violation::NonPositiveQty { order: 2, item: 1 },
                Violation::NegativePrice { order: 2, item: 1 },
            ]
        );
        assert_eq!(report.invalid_orders().into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_zero_price_is_allowed() {
        let order = Order::new("ORD000001", "2024-01-01T10:00:00Z", vec![Item::new("FREE", 1, 0.0)]);
        assert!(validate(&[order]).ok());
    }

    #[test]
    fn test_timestamp_length_only() {
        // Calendar nonsense passes: only the length is checked
        let order = Order::new("ORD000001", "9999-99-99", vec![Item::new("A", 1, 1.0)]);
        assert!(validate(&[order]).ok());

        let order = Order::new("ORD000001", "2024-01-0", vec![Item::new("A", 1, 1.0)]);
        assert_eq!(
            validate(&[order]).violations,
            vec![Violation::BadTimestamp { order: 0 }]
        );
    }
}
