//! # Pipeline Module
//!
//! Chains parse → validate → aggregate under a validation policy.
//!
//! ## Policies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Policy                                  │
//! │                                                                         │
//! │  STRICT (Default)                                                      │
//! │  ────────────────                                                      │
//! │  • Any violation → CoreError::ValidationFailed(report)                 │
//! │  • Never aggregates over known-bad data                                │
//! │                                                                         │
//! │  VALID_ONLY                                                            │
//! │  ──────────                                                            │
//! │  • Orders with a violation are left out                                │
//! │  • Summary covers the remaining orders                                 │
//! │  • Report and skipped count are returned with the summary              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `ParseError` always stops the run before validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, aggregate_orders, Summary};
use crate::error::{CoreError, CoreResult};
use crate::parser::parse;
use crate::types::Order;
use crate::validation::{validate, ValidationReport};
use crate::DEFAULT_TOP_N;

// =============================================================================
// Validation Policy
// =============================================================================

/// What to do with orders that fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Refuse to aggregate if any violation exists.
    #[default]
    Strict,

    /// Aggregate over the orders without violations.
    ValidOnly,
}

impl fmt::Display for ValidationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationPolicy::Strict => write!(f, "strict"),
            ValidationPolicy::ValidOnly => write!(f, "valid_only"),
        }
    }
}

impl FromStr for ValidationPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(ValidationPolicy::Strict),
            "valid_only" | "valid-only" | "partial" => Ok(ValidationPolicy::ValidOnly),
            other => Err(CoreError::UnknownPolicy(other.to_string())),
        }
    }
}

// =============================================================================
// Options & Outcome
// =============================================================================

/// Knobs for [`analyze`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// How many products to rank.
    pub top_n: usize,

    /// Handling of invalid orders.
    pub policy: ValidationPolicy,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            top_n: DEFAULT_TOP_N,
            policy: ValidationPolicy::Strict,
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Full validation report. Empty under the strict policy.
    pub report: ValidationReport,

    /// Orders left out of the summary.
    pub skipped_orders: usize,

    pub summary: Summary,
}

// =============================================================================
// Entry Points
// =============================================================================

/// Validates `orders` and aggregates them according to `options.policy`.
pub fn analyze(orders: &[Order], options: &AnalysisOptions) -> CoreResult<Analysis> {
    apply_policy(orders, validate(orders), options)
}

/// Aggregates `orders` given their already computed validation `report`.
///
/// Lets callers time validation and aggregation separately. `report` must
/// come from `validate(orders)`.
pub fn apply_policy(
    orders: &[Order],
    report: ValidationReport,
    options: &AnalysisOptions,
) -> CoreResult<Analysis> {
    if report.ok() {
        return Ok(Analysis {
            report,
            skipped_orders: 0,
            summary: aggregate(orders, options.top_n),
        });
    }

    match options.policy {
        ValidationPolicy::Strict => Err(CoreError::ValidationFailed(report)),
        ValidationPolicy::ValidOnly => {
            let invalid = report.invalid_orders();
            let valid = orders
                .iter()
                .enumerate()
                .filter(|(i, _)| !invalid.contains(i))
                .map(|(_, order)| order);

            Ok(Analysis {
                skipped_orders: invalid.len(),
                summary: aggregate_orders(valid, options.top_n),
                report,
            })
        }
    }
}

/// Parses one document and analyzes it.
pub fn run(text: &str, options: &AnalysisOptions) -> CoreResult<Analysis> {
    let orders = parse(text)?;
    analyze(&orders, options)
}

// =============================================================================
// Unit Tests
// =============================================================================
