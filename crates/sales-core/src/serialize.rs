//! # Serialize Module
//!
//! Writes orders back out in the document dialect read by
//! [`crate::parser::parse`].
//!
//! Prices use Rust's shortest round-trip `f64` formatting, which never
//! switches to exponent notation, so any finite price survives
//! `parse(to_document(..))` unchanged. Non-finite prices have no
//! representation in the dialect.

use std::fmt::Write;

use crate::types::{Item, Order};

/// Renders a whole document: `[order,order,...]`.
pub fn to_document(orders: &[Order]) -> String {
    let mut out = String::with_capacity(orders.len() * 128);
    out.push('[');
    for (i, order) in orders.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_order(&mut out, order);
    }
    out.push(']');
    out
}

/// Appends one order object.
pub fn write_order(out: &mut String, order: &Order) {
    out.push_str("{\"id\":");
    write_string(out, &order.id);
    out.push_str(",\"ts\":");
    write_string(out, &order.timestamp);
    out.push_str(",\"items\":[");
    for (i, item) in order.items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_item(out, item);
    }
    out.push_str("]}");
}

fn write_item(out: &mut String, item: &Item) {
    out.push_str("{\"sku\":");
    write_string(out, &item.sku);
    // Writing to a String cannot fail
    let _ = write!(out, ",\"qty\":{},\"price\":{}}}", item.quantity, item.price);
}

/// Appends a quoted string, escaping `"`, `\`, newline and tab.
pub fn write_string(out: &mut String, value: &str) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
}

// =============================================================================
// Unit Tests
// =============================================================================
