//! # Error Types
//!
//! Domain-specific error types for sales-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sales-core errors (this file)                                         │
//! │  ├── ParseError   - Structural failure in the input text (fatal)       │
//! │  ├── Violation    - Business-rule failure on one order (collected)     │
//! │  └── CoreError    - Pipeline outcome: parse failed / data rejected     │
//! │                                                                         │
//! │  sales-ingest errors (separate crate)                                  │
//! │  └── IngestError  - File system, config, per-document parse failures   │
//! │                                                                         │
//! │  Flow: ParseError ─┐                                                   │
//! │        Violation ──┴─► CoreError ─► IngestError / anyhow (CLI)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Carry positions and indices, never pre-formatted strings
//! 3. A `ParseError` aborts the document; a `Violation` never aborts collection

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::ValidationReport;

// =============================================================================
// Expected Token
// =============================================================================

/// What the scanner was looking for when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// `[`
    OpenBracket,
    /// `]` or `,` inside an array.
    CloseBracketOrComma,
    /// `{`
    OpenBrace,
    /// `}` or `,` inside an object.
    CloseBraceOrComma,
    /// `:` after a key.
    Colon,
    /// `"` opening a string or key.
    Quote,
    /// Closing `"` of a string, or the character after `\`.
    StringContent,
    /// Start of a number.
    Number,
    /// Start of any value (skipped fields).
    Value,
    /// Nothing but whitespace after the top-level array.
    EndOfInput,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::OpenBracket => write!(f, "'['"),
            Expected::CloseBracketOrComma => write!(f, "']' or ','"),
            Expected::OpenBrace => write!(f, "'{{'"),
            Expected::CloseBraceOrComma => write!(f, "'}}' or ','"),
            Expected::Colon => write!(f, "':'"),
            Expected::Quote => write!(f, "'\"'"),
            Expected::StringContent => write!(f, "closing '\"'"),
            Expected::Number => write!(f, "a number"),
            Expected::Value => write!(f, "a value"),
            Expected::EndOfInput => write!(f, "end of input"),
        }
    }
}

// =============================================================================
// Parse Error
// =============================================================================

/// Structural failures in the input text.
///
/// Fatal for the document: the parser returns no orders at all.
/// Positions are byte offsets into the input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The input ended while a token was still expected.
    ///
    /// ## When This Occurs
    /// - Truncated files (`[{"id":"A"`)
    /// - An unterminated string or a trailing `\`
    #[error("unexpected end of input at byte {position}, expected {expected}")]
    UnexpectedEnd { position: usize, expected: Expected },

    /// A character other than the expected structural token.
    #[error("unexpected {found:?} at byte {position}, expected {expected}")]
    UnexpectedToken {
        position: usize,
        expected: Expected,
        found: char,
    },

    /// A run of `-`, digits and `.` that does not form a number.
    #[error("invalid number {literal:?} at byte {position}")]
    InvalidNumber { position: usize, literal: String },

    /// Skipped values nested beyond the scanner's depth limit.
    #[error("values nested deeper than {limit} levels at byte {position}")]
    NestingTooDeep { position: usize, limit: usize },
}

impl ParseError {
    /// Byte offset at which scanning stopped.
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnexpectedEnd { position, .. }
            | ParseError::UnexpectedToken { position, .. }
            | ParseError::InvalidNumber { position, .. }
            | ParseError::NestingTooDeep { position, .. } => *position,
        }
    }
}

// =============================================================================
// Violation
// =============================================================================

/// Business-rule failures found by [`crate::validation::validate`].
///
/// `order` is the index in the validated sequence, `item` the index inside
/// that order's items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    #[error("order #{order}: empty id")]
    EmptyId { order: usize },

    #[error("order #{order}: timestamp shorter than 10 characters")]
    BadTimestamp { order: usize },

    #[error("order #{order}: no items")]
    NoItems { order: usize },

    #[error("order #{order}, item #{item}: empty sku")]
    EmptySku { order: usize, item: usize },

    #[error("order #{order}, item #{item}: quantity must be > 0")]
    NonPositiveQty { order: usize, item: usize },

    #[error("order #{order}, item #{item}: price must not be negative")]
    NegativePrice { order: usize, item: usize },
}

impl Violation {
    /// Index of the offending order.
    pub fn order_index(&self) -> usize {
        match self {
            Violation::EmptyId { order }
            | Violation::BadTimestamp { order }
            | Violation::NoItems { order }
            | Violation::EmptySku { order, .. }
            | Violation::NonPositiveQty { order, .. }
            | Violation::NegativePrice { order, .. } => *order,
        }
    }

    /// Index of the offending item, for item-level violations.
    pub fn item_index(&self) -> Option<usize> {
        match self {
            Violation::EmptySku { item, .. }
            | Violation::NonPositiveQty { item, .. }
            | Violation::NegativePrice { item, .. } => Some(*item),
            _ => None,
        }
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Pipeline errors returned by [`crate::pipeline`].
#[derive(Debug, Error)]
pub enum CoreError {
    /// The document could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Validation found violations and the strict policy forbids aggregating.
    #[error("validation found {} violation(s), aggregation skipped", .0.violations.len())]
    ValidationFailed(ValidationReport),

    /// Unrecognized validation policy name.
    #[error("unknown validation policy '{0}', valid options: strict, valid_only")]
    UnknownPolicy(String),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
