//! # Domain Types
//!
//! Value records produced by the parser and consumed by the validator and
//! the aggregator.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐          ┌─────────────────────┐              │
//! │  │       Order         │  owns    │        Item         │              │
//! │  │  ─────────────────  │ ───────► │  ─────────────────  │              │
//! │  │  id        ("id")   │  1..N    │  sku      ("sku")   │              │
//! │  │  timestamp ("ts")   │          │  quantity ("qty")   │              │
//! │  │  items   ("items")  │          │  price    ("price") │              │
//! │  └─────────────────────┘          └─────────────────────┘              │
//! │                                                                         │
//! │  Wire names in parentheses. Items keep document order.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//! Records are built once by [`crate::parser::parse`], never mutated
//! afterwards, and read by [`crate::validation`] and [`crate::aggregate`].
//! Nothing is persisted between runs.

use serde::{Deserialize, Serialize};

/// Number of leading timestamp characters that form the `YYYY-MM-DD` date.
pub const DATE_PREFIX_LEN: usize = 10;

// =============================================================================
// Item
// =============================================================================

/// One line of an order: a SKU, a quantity and a unit price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stock keeping unit.
    pub sku: String,

    /// Units sold. Truncated from the wire number.
    pub quantity: i64,

    /// Unit price in the currency's major unit.
    pub price: f64,
}

impl Item {
    /// Creates an item.
    pub fn new(sku: impl Into<String>, quantity: i64, price: f64) -> Self {
        Item {
            sku: sku.into(),
            quantity,
            price,
        }
    }

    /// Line revenue: `quantity * price`.
    #[inline]
    pub fn revenue(&self) -> f64 {
        self.quantity as f64 * self.price
    }
}

// =============================================================================
// Order
// =============================================================================

/// One customer transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order number.
    pub id: String,

    /// ISO-8601-like `YYYY-MM-DDThh:mm:ssZ`. Only its length is validated.
    pub timestamp: String,

    /// Line items in document order.
    pub items: Vec<Item>,
}

impl Order {
    /// Creates an order.
    pub fn new(id: impl Into<String>, timestamp: impl Into<String>, items: Vec<Item>) -> Self {
        Order {
            id: id.into(),
            timestamp: timestamp.into(),
            items,
        }
    }

    /// Order total: the sum of line revenues in item order.
    pub fn total(&self) -> f64 {
        self.items.iter().fold(0.0, |total, item| total + item.revenue())
    }

    /// The `YYYY-MM-DD` prefix of the timestamp.
    ///
    /// Returns the whole timestamp when it is shorter than ten characters.
    /// Such orders are rejected by validation, so the value is only
    /// meaningful for validated input.
    pub fn date(&self) -> &str {
        match self.timestamp.char_indices().nth(DATE_PREFIX_LEN) {
            Some((end, _)) => &self.timestamp[..end],
            None => &self.timestamp,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
