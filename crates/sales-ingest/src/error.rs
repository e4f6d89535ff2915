//! # Ingest Error Types
//!
//! Error types for loading, configuration and generation.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Ingest Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   File System   │  │     Documents           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Io             │  │  Parse { path, .. }     │ │
//! │  │  ConfigParse    │  │  NotFound       │  │  NoDocuments { dir }    │ │
//! │  │                 │  │  Read { path }  │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use sales_core::ParseError;
use thiserror::Error;

/// Result type alias for ingest operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// A subdirectory and the number of documents it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdirectoryHint {
    pub name: String,
    pub documents: usize,
}

/// Ingest error type covering all possible loader/config failures.
#[derive(Debug, Error)]
pub enum IngestError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration values out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Config file is not valid TOML for `SalesConfig`.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    // =========================================================================
    // File System Errors
    // =========================================================================
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input path does not exist.
    #[error("Input path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A file or directory under the input path could not be read.
    ///
    /// ## When This Occurs
    /// - A document is not valid UTF-8
    /// - Permission denied on a document or directory
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Document Errors
    // =========================================================================
    /// One document failed to parse. The whole load is aborted.
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// Directory has no documents with the configured extension.
    #[error("No .{extension} files in {}", .dir.display())]
    NoDocuments {
        dir: PathBuf,
        extension: String,
        subdirectories: Vec<SubdirectoryHint>,
    },
}
