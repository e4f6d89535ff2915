//! # Aggregate Module
//!
//! Reduces a validated order sequence into sales statistics.
//!
//! ## Reductions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Aggregation                                     │
//! │                                                                         │
//! │  orders ──┬──► order_total = Σ qty × price ──┬──► total_revenue         │
//! │           │                                  ├──► average_check         │
//! │           │                                  └──► daily_revenue[date]   │
//! │           │                                                             │
//! │           └──► per item: qty × price ─────────► product_revenue[sku]    │
//! │                                                        │                │
//! │                                                        ▼                │
//! │                                 sort (revenue desc, sku asc), take N    │
//! │                                                        │                │
//! │                                                        ▼                │
//! │                                                  top_products           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sums are plain `f64` additions in sequence order, with no rounding
//! between steps. `total_revenue` is exactly the running sum of
//! [`Order::total`] over the orders.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::types::Order;

// =============================================================================
// Summary
// =============================================================================

/// Revenue attributed to one SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRevenue {
    pub sku: String,
    pub revenue: f64,
}

impl ProductRevenue {
    pub fn new(sku: impl Into<String>, revenue: f64) -> Self {
        ProductRevenue {
            sku: sku.into(),
            revenue,
        }
    }
}

/// Summary statistics consumed by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of orders aggregated.
    pub order_count: usize,

    /// Sum of order totals.
    pub total_revenue: f64,

    /// `total_revenue / order_count`, or `0` without orders.
    pub average_check: f64,

    /// Number of line items across all orders.
    pub total_items: usize,

    /// Sum of item quantities across all orders.
    pub total_units: i64,

    /// Revenue per `YYYY-MM-DD`, ascending by date.
    pub daily_revenue: BTreeMap<String, f64>,

    /// Highest-revenue SKUs, best first.
    pub top_products: Vec<ProductRevenue>,
}

// =============================================================================
// Aggregation
// =============================================================================

/// Computes every summary statistic in one pass over `orders`.
///
/// ## Example
/// ```rust
/// use sales_core::{aggregate, Item, Order};
///
/// let orders = vec![
///     Order::new("A", "2024-01-01T10:00:00Z", vec![Item::new("X", 2, 10.0)]),
///     Order::new("B", "2024-01-01T11:00:00Z", vec![Item::new("Y", 1, 5.0)]),
/// ];
/// let summary = aggregate(&orders, 2);
/// assert_eq!(summary.total_revenue, 25.0);
/// assert_eq!(summary.average_check, 12.5);
/// assert_eq!(summary.daily_revenue["2024-01-01"], 25.0);
/// ```
pub fn aggregate(orders: &[Order], top_n: usize) -> Summary {
    aggregate_orders(orders, top_n)
}

/// Same as [`aggregate`] over any sequence of borrowed orders.
///
/// Lets callers aggregate a filtered view without copying orders.
pub fn aggregate_orders<'a, I>(orders: I, top_n: usize) -> Summary
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut totals = Totals::default();
    for order in orders {
        totals.add(order);
    }
    totals.finish(top_n)
}

/// Average check: revenue per order, defined as `0` for no orders.
#[inline]
pub fn average(total_revenue: f64, order_count: usize) -> f64 {
    if order_count == 0 {
        0.0
    } else {
        total_revenue / order_count as f64
    }
}

/// Running sums behind a [`Summary`].
#[derive(Default)]
struct Totals {
    order_count: usize,
    total_revenue: f64,
    total_items: usize,
    total_units: i64,
    daily_revenue: BTreeMap<String, f64>,
    product_revenue: HashMap<String, f64>,
}

impl Totals {
    fn add(&mut self, order: &Order) {
        let order_total = order.total();
        self.order_count += 1;
        self.total_revenue += order_total;
        self.total_items += order.items.len();
        *self
            .daily_revenue
            .entry(order.date().to_string())
            .or_insert(0.0) += order_total;

        for item in &order.items {
            self.total_units = self.total_units.saturating_add(item.quantity);
            *self.product_revenue.entry(item.sku.clone()).or_insert(0.0) += item.revenue();
        }
    }

    fn finish(self, top_n: usize) -> Summary {
        Summary {
            order_count: self.order_count,
            total_revenue: self.total_revenue,
            average_check: average(self.total_revenue, self.order_count),
            total_items: self.total_items,
            total_units: self.total_units,
            top_products: top_products(&self.product_revenue, top_n),
            daily_revenue: self.daily_revenue,
        }
    }
}

/// Ranks SKUs by revenue and keeps the first `n`.
///
/// Ordering is revenue descending, then SKU ascending, so equal revenues
/// always come out in the same order regardless of map iteration order.
pub fn top_products(revenue: &HashMap<String, f64>, n: usize) -> Vec<ProductRevenue> {
    let mut ranked: Vec<ProductRevenue> = revenue
        .iter()
        .map(|(sku, revenue)| ProductRevenue::new(sku.clone(), *revenue))
        .collect();

    ranked.sort_by(rank_order);
    ranked.truncate(n);
    ranked
}

fn rank_order(a: &ProductRevenue, b: &ProductRevenue) -> Ordering {
    b.revenue
        .total_cmp(&a.revenue)
        .then_with(|| a.sku.cmp(&b.sku))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Item;

    fn order(id: &str, ts: &str, items: Vec<Item>) -> Order {
        Order::new(id, ts, items)
    }

    #[test]
    fn test_empty_input() {
        let summary = aggregate(&[], 5);
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.order_count, 0);
        assert_eq!(summary.total_revenue, 0.0);
        assert_eq!(summary.average_check, 0.0);
        assert!(summary.daily_revenue.is_empty());
        assert!(summary.top_products.is_empty());
    }

    #[test]
    fn test_daily_grouping_scenario() {
        let orders = vec![
            order("ORD1", "2024-01-01T10:00:00Z", vec![Item::new("SKU-A", 2, 10.0)]),
            order("ORD2", "2024-01-01T11:00:00Z", vec![Item::new("SKU-B", 1, 5.0)]),
        ];
        let summary = aggregate(&orders, 2);

        assert_eq!(summary.order_count, 2);
        assert_eq!(summary.total_revenue, 25.0);
        assert_eq!(summary.average_check, 12.5);
        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.total_units, 3);
        assert_eq!(
            summary.daily_revenue,
            BTreeMap::from([("2024-01-01".to_string(), 25.0)])
        );
        assert_eq!(
            summary.top_products,
            vec![
                ProductRevenue::new("SKU-A", 20.0),
                ProductRevenue::new("SKU-B", 5.0),
            ]
        );
    }

    #[test]
    fn test_daily_revenue_ascending() {
        let orders = vec![
            order("3", "2024-02-01T00:00:00Z", vec![Item::new("A", 1, 3.0)]),
            order("1", "2023-12-31T23:59:59Z", vec![Item::new("A", 1, 1.0)]),
            order("2", "2024-01-15T12:00:00Z", vec![Item::new("A", 1, 2.0)]),
            order("4", "2024-01-15T13:00:00Z", vec![Item::new("A", 1, 4.0)]),
        ];
        let daily = aggregate(&orders, 1).daily_revenue;
        let dates: Vec<&str> = daily.keys().map(String::as_str).collect();
        assert_eq!(dates, vec!["2023-12-31", "2024-01-15", "2024-02-01"]);
        assert_eq!(daily["2024-01-15"], 6.0);
    }

    #[test]
    fn test_top_n_ranking() {
        let orders = vec![order(
            "1",
            "2024-01-01T00:00:00Z",
            vec![
                Item::new("A", 3, 100.0),
                Item::new("B", 5, 100.0),
                Item::new("C", 1, 100.0),
            ],
        )];
        assert_eq!(
            aggregate(&orders, 2).top_products,
            vec![ProductRevenue::new("B", 500.0), ProductRevenue::new("A", 300.0)]
        );
    }

    #[test]
    fn test_top_n_tie_break_by_sku() {
        let orders = vec![order(
            "1",
            "2024-01-01T00:00:00Z",
            vec![Item::new("B", 1, 100.0), Item::new("A", 1, 100.0)],
        )];
        assert_eq!(
            aggregate(&orders, 2).top_products,
            vec![ProductRevenue::new("A", 100.0), ProductRevenue::new("B", 100.0)]
        );
    }

    #[test]
    fn test_top_n_larger_than_sku_count() {
        let orders = vec![order(
            "1",
            "2024-01-01T00:00:00Z",
            vec![Item::new("A", 1, 1.0), Item::new("A", 2, 1.0)],
        )];
        let top = aggregate(&orders, 10).top_products;
        assert_eq!(top, vec![ProductRevenue::new("A", 3.0)]);
        assert!(aggregate(&orders, 0).top_products.is_empty());
    }

    #[test]
    fn test_product_revenue_spans_orders() {
        let orders = vec![
            order("1", "2024-01-01T00:00:00Z", vec![Item::new("A", 2, 1.5)]),
            order("2", "2024-01-02T00:00:00Z", vec![Item::new("A", 1, 1.0), Item::new("B", 4, 0.5)]),
        ];
        assert_eq!(
            aggregate(&orders, 10).top_products,
            vec![ProductRevenue::new("A", 4.0), ProductRevenue::new("B", 2.0)]
        );
    }

    #[test]
    fn test_filtered_view_matches_copied_subset() {
        let orders = vec![
            order("1", "2024-01-01T00:00:00Z", vec![Item::new("A", 2, 1.5)]),
            order("2", "2024-01-02T00:00:00Z", vec![Item::new("B", 1, 9.0)]),
            order("3", "2024-01-02T00:00:00Z", vec![Item::new("A", 4, 0.5)]),
        ];
        let kept: Vec<Order> = vec![orders[0].clone(), orders[2].clone()];

        let view = aggregate_orders(orders.iter().filter(|o| o.id != "2"), 5);
        assert_eq!(view, aggregate(&kept, 5));
        assert_eq!(view.order_count, 2);
        assert_eq!(view.total_revenue, 5.0);
    }

    #[test]
    fn test_additivity_is_exact() {
        let orders: Vec<Order> = (0..50)
            .map(|i| {
                order(
                    &format!("ORD{i:06}"),
                    "2024-01-01T00:00:00Z",
                    vec![
                        Item::new("A", i + 1, 0.1 * i as f64),
                        Item::new("B", 3, 19.99),
                    ],
                )
            })
            .collect();

        let mut expected = 0.0;
        for o in &orders {
            let mut order_sum = 0.0;
            for item in &o.items {
                order_sum += item.quantity as f64 * item.price;
            }
            expected += order_sum;
        }

        let summary = aggregate(&orders, 5);
        assert_eq!(summary.total_revenue, expected);

        let recomposed = summary.average_check * summary.order_count as f64;
        assert!((recomposed - summary.total_revenue).abs() <= 1e-9 * summary.total_revenue.abs());
    }

    #[test]
    fn test_average_zero_orders() {
        assert_eq!(average(0.0, 0), 0.0);
        assert_eq!(average(10.0, 4), 2.5);
    }
}
