//! # sales-core: Pure Order Pipeline
//!
//! Parses order documents, validates them against business rules and
//! reduces them into sales statistics. Every function here is pure: text
//! comes in already loaded, results go out as values.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sales Analytics                                  │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    sales CLI (apps/sales-cli)                   │   │
//! │  │        analyze ──► report (text / json)     generate           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          sales-ingest: files, directories, config, generator    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ &str                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ sales-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐   ┌────────────┐   ┌───────────┐  ┌──────────┐  │   │
//! │  │   │  parser  │──►│ validation │──►│ aggregate │  │serialize │  │   │
//! │  │   │  Cursor  │   │  Violation │   │  Summary  │  │ document │  │   │
//! │  │   └──────────┘   └────────────┘   └───────────┘  └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOGGING • NO RANDOMNESS • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `Order` and `Item` value records
//! - [`parser`] - bounded scanner for the JSON-subset document dialect
//! - [`validation`] - exhaustive business-rule checks
//! - [`aggregate`] - revenue totals, daily revenue, top-N products
//! - [`serialize`] - writes orders back as a document
//! - [`pipeline`] - parse → validate → aggregate under a validation policy
//! - [`error`] - `ParseError`, `Violation`, `CoreError`
//!
//! ## Example Usage
//!
//! ```rust
//! use sales_core::{aggregate, parse, validate};
//!
//! let text = r#"[
//!   {"id":"ORD1","ts":"2024-01-01T10:00:00Z","items":[{"sku":"A","qty":2,"price":10}]},
//!   {"id":"ORD2","ts":"2024-01-01T11:00:00Z","items":[{"sku":"B","qty":1,"price":5}]}
//! ]"#;
//!
//! let orders = parse(text).unwrap();
//! assert!(validate(&orders).ok());
//!
//! let summary = aggregate(&orders, 5);
//! assert_eq!(summary.total_revenue, 25.0);
//! assert_eq!(summary.top_products[0].sku, "A");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod serialize;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregate::{aggregate, aggregate_orders, ProductRevenue, Summary};
pub use error::{CoreError, CoreResult, Expected, ParseError, Violation};
pub use parser::parse;
pub use pipeline::{analyze, apply_policy, run, Analysis, AnalysisOptions, ValidationPolicy};
pub use serialize::to_document;
pub use types::*;
pub use validation::{validate, ValidationReport};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of products ranked when the caller does not say otherwise.
pub const DEFAULT_TOP_N: usize = 5;
