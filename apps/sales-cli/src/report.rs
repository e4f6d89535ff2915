//! Console and JSON rendering of an analysis.
//!
//! Renderers build a `String` so they can be tested without capturing
//! stdout.

use std::fmt::Write;
use std::time::Duration;

use sales_core::{Analysis, Order, Summary, Violation};
use serde::Serialize;

const RULE_WIDTH: usize = 70;

/// Wall-clock time of each stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timings {
    pub load: Duration,
    pub check: Duration,
    pub calculate: Duration,
}

impl Timings {
    pub fn total(&self) -> Duration {
        self.load + self.check + self.calculate
    }
}

#[derive(Serialize)]
struct TimingsMs {
    load: u128,
    check: u128,
    calculate: u128,
    total: u128,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    documents: usize,
    #[serde(flatten)]
    analysis: &'a Analysis,
    timings_ms: TimingsMs,
}

/// Two decimals, the way amounts are shown everywhere in the report.
pub fn format_money(amount: f64) -> String {
    format!("{amount:.2}")
}

fn rule(out: &mut String) {
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
}

fn header(out: &mut String, title: &str) {
    out.push('\n');
    rule(out);
    let _ = writeln!(out, "  {title}");
    rule(out);
    out.push('\n');
}

/// Full text report.
pub fn render_text(analysis: &Analysis, timings: &Timings) -> String {
    let mut out = String::new();
    let summary = &analysis.summary;

    if analysis.skipped_orders > 0 {
        let _ = writeln!(
            out,
            "Skipped {} invalid order(s) ({} violation(s)); statistics cover valid orders only.",
            analysis.skipped_orders,
            analysis.report.violations.len()
        );
    }

    render_general(&mut out, summary);
    render_daily(&mut out, summary);
    render_top(&mut out, summary);
    render_timings(&mut out, timings);
    out
}

fn render_general(out: &mut String, summary: &Summary) {
    header(out, "GENERAL STATISTICS");
    let _ = writeln!(out, "Orders:            {}", summary.order_count);
    let _ = writeln!(out, "Total revenue:     {}", format_money(summary.total_revenue));
    let _ = writeln!(out, "Average check:     {}", format_money(summary.average_check));
    let _ = writeln!(out, "Line items:        {}", summary.total_items);
    let _ = writeln!(out, "Units sold:        {}", summary.total_units);
}

fn render_daily(out: &mut String, summary: &Summary) {
    header(out, "REVENUE BY DAY");
    let _ = writeln!(out, "{:<16}{:>16}", "Date", "Revenue");
    let _ = writeln!(out, "{}", "-".repeat(32));
    for (date, revenue) in &summary.daily_revenue {
        let _ = writeln!(out, "{:<16}{:>16}", date, format_money(*revenue));
    }
}

fn render_top(out: &mut String, summary: &Summary) {
    header(out, "TOP PRODUCTS BY REVENUE");
    let _ = writeln!(out, "{:<4}{:<20}{:>16}", "#", "SKU", "Revenue");
    let _ = writeln!(out, "{}", "-".repeat(40));
    for (rank, product) in summary.top_products.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<4}{:<20}{:>16}",
            format!("{}.", rank + 1),
            product.sku,
            format_money(product.revenue)
        );
    }
}

fn render_timings(out: &mut String, timings: &Timings) {
    header(out, "TIMINGS");
    let _ = writeln!(out, "Load:       {} ms", timings.load.as_millis());
    let _ = writeln!(out, "Check:      {} ms", timings.check.as_millis());
    let _ = writeln!(out, "Calculate:  {} ms", timings.calculate.as_millis());
    let _ = writeln!(out, "{}", "-".repeat(32));
    let _ = writeln!(out, "Total:      {} ms", timings.total().as_millis());
}

/// Machine-readable report.
pub fn render_json(
    analysis: &Analysis,
    documents: usize,
    timings: &Timings,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        documents,
        analysis,
        timings_ms: TimingsMs {
            load: timings.load.as_millis(),
            check: timings.check.as_millis(),
            calculate: timings.calculate.as_millis(),
            total: timings.total().as_millis(),
        },
    })
}

/// One diagnostic line, with the order id and sku when they exist.
pub fn describe_violation(violation: &Violation, orders: &[Order]) -> String {
    let order = orders.get(violation.order_index());
    let id = order.map(|o| o.id.as_str()).filter(|id| !id.is_empty());
    let sku = violation
        .item_index()
        .and_then(|j| order.and_then(|o| o.items.get(j)))
        .map(|item| item.sku.as_str())
        .filter(|sku| !sku.is_empty());

    let mut line = violation.to_string();
    match (id, sku) {
        (Some(id), Some(sku)) => {
            let _ = write!(line, " (id {id}, sku {sku})");
        }
        (Some(id), None) => {
            let _ = write!(line, " (id {id})");
        }
        (None, Some(sku)) => {
            let _ = write!(line, " (sku {sku})");
        }
        (None, None) => {}
    }
    line
}

/// All violations, one per line, followed by a count.
pub fn render_violations(violations: &[Violation], orders: &[Order]) -> String {
    let mut out = String::new();
    for violation in violations {
        let _ = writeln!(out, "  {}", describe_violation(violation, orders));
    }
    let _ = writeln!(out, "\nViolations found: {}", violations.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_core::{aggregate, Item, ValidationReport};

    fn analysis() -> Analysis {
        let orders = vec![
            Order::new("ORD1", "2024-01-01T10:00:00Z", vec![Item::new("SKU-A", 2, 10.0)]),
            Order::new("ORD2", "2024-01-02T11:00:00Z", vec![Item::new("SKU-B", 1, 5.0)]),
        ];
        Analysis {
            report: ValidationReport::default(),
            skipped_orders: 0,
            summary: aggregate(&orders, 5),
        }
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(12.5), "12.50");
        assert_eq!(format_money(0.0), "0.00");
        assert_eq!(format_money(1234.567), "1234.57");
    }

    #[test]
    fn test_text_report_sections() {
        let text = render_text(&analysis(), &Timings::default());
        assert!(text.contains("GENERAL STATISTICS"));
        assert!(text.contains("Total revenue:     25.00"));
        assert!(text.contains("Average check:     12.50"));
        assert!(text.contains("2024-01-01"));
        assert!(text.contains("1.  SKU-A"));
        assert!(text.contains("2.  SKU-B"));
        assert!(!text.contains("Skipped"));

        // Dates print in ascending order
        let first = text.find("2024-01-01").unwrap();
        let second = text.find("2024-01-02").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_json_report() {
        let json = render_json(&analysis(), 2, &Timings::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["documents"], 2);
        assert_eq!(value["summary"]["order_count"], 2);
        assert_eq!(value["summary"]["total_revenue"], 25.0);
        assert_eq!(value["summary"]["top_products"][0]["sku"], "SKU-A");
        assert_eq!(value["summary"]["daily_revenue"]["2024-01-02"], 5.0);
        assert_eq!(value["timings_ms"]["total"], 0);
    }

    #[test]
    fn test_describe_violation_context() {
        let orders = vec![
            Order::new("ORD1", "2024-01-01T10:00:00Z", vec![Item::new("SKU-A", -1, 1.0)]),
            Order::new("", "2024", vec![]),
        ];
        assert_eq!(
            describe_violation(&Violation::NonPositiveQty { order: 0, item: 0 }, &orders),
            "order #0, item #0: quantity must be > 0 (id ORD1, sku SKU-A)"
        );
        assert_eq!(
            describe_violation(&Violation::EmptyId { order: 1 }, &orders),
            "order #1: empty id"
        );

        let listing = render_violations(
            &[Violation::EmptyId { order: 1 }, Violation::NoItems { order: 1 }],
            &orders,
        );
        assert!(listing.ends_with("Violations found: 2\n"));
    }
}
