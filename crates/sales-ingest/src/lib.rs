//! # sales-ingest: Filesystem Layer
//!
//! Gets order documents on and off the disk for the pure `sales-core`
//! pipeline.
//!
//! ## Modules
//! - [`config`] - `SalesConfig`: defaults → TOML file → environment
//! - [`loader`] - one file or a sorted directory of documents
//! - [`generator`] - seeded synthetic order documents
//! - [`error`] - `IngestError`
//!
//! ## Usage
//! ```rust,no_run
//! use std::path::Path;
//! use sales_ingest::{load_path, SalesConfig};
//!
//! let config = SalesConfig::load(None)?;
//! let loaded = load_path(Path::new("data/separate_100"), &config.ingest)?;
//! let analysis = sales_core::analyze(&loaded.orders, &config.analysis_options());
//! # Ok::<(), sales_ingest::IngestError>(())
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod loader;

pub use config::{IngestSettings, SalesConfig};
pub use error::{IngestError, IngestResult, SubdirectoryHint};
pub use generator::{write_separate_files, OrderGenerator, Preset};
pub use loader::{load_path, LoadedOrders, SourceKind};
