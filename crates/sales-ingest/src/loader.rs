//! # Loader Module
//!
//! Reads order documents from a single file or a whole directory.
//!
//! ## Directory Mode
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Directory Load                                      │
//! │                                                                         │
//! │  read_dir(dir)                                                         │
//! │       │  keep regular files with the configured extension              │
//! │       ▼                                                                 │
//! │  sort by file name   ◄── fixes order sequence → reproducible           │
//! │       │                  daily iteration and top-N tie-breaks          │
//! │       ▼                                                                 │
//! │  for each file: read → sales_core::parse → append orders               │
//! │       │                                                                 │
//! │       ├── ParseError  → IngestError::Parse { path } (abort load)       │
//! │       └── every 10% of ≥100 files → info! progress                     │
//! │                                                                         │
//! │  no matching files → IngestError::NoDocuments { subdirectories }       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use sales_core::{parse, Order};
use tracing::{debug, info};

use crate::config::IngestSettings;
use crate::error::{IngestError, IngestResult, SubdirectoryHint};

/// Directories with at least this many documents report progress.
pub const PROGRESS_THRESHOLD: usize = 100;

/// Where the orders came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    File,
    Directory,
}

/// Orders read from disk, in load order.
#[derive(Debug, Clone)]
pub struct LoadedOrders {
    pub orders: Vec<Order>,
    pub source: SourceKind,
    pub documents: usize,
    pub elapsed: Duration,
}

/// Loads `path`, which may be a single document or a directory of them.
pub fn load_path(path: &Path, settings: &IngestSettings) -> IngestResult<LoadedOrders> {
    if !path.exists() {
        return Err(IngestError::NotFound(path.to_path_buf()));
    }

    let started = Instant::now();
    let (orders, source, documents) = if path.is_dir() {
        info!(dir = %path.display(), "Reading directory");
        let files = document_files(path, &settings.extension)?;
        if files.is_empty() {
            return Err(IngestError::NoDocuments {
                dir: path.to_path_buf(),
                extension: settings.extension.clone(),
                subdirectories: list_subdirectories(path, &settings.extension)?,
            });
        }
        let count = files.len();
        let orders = load_files(&files, settings.show_progress)?;
        (orders, SourceKind::Directory, count)
    } else {
        info!(file = %path.display(), "Reading file");
        (load_file(path)?, SourceKind::File, 1)
    };

    let elapsed = started.elapsed();
    info!(
        orders = orders.len(),
        documents,
        elapsed_ms = elapsed.as_millis() as u64,
        "Orders loaded"
    );

    Ok(LoadedOrders {
        orders,
        source,
        documents,
        elapsed,
    })
}

/// Reads and parses one document.
pub fn load_file(path: &Path) -> IngestResult<Vec<Order>> {
    let text = fs::read_to_string(path).map_err(|source| read_error(path, source))?;
    parse(&text).map_err(|source| IngestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// True when `processed` of `total` lands on a 10% step.
///
/// Runs below [`PROGRESS_THRESHOLD`] never report.
pub fn is_progress_checkpoint(processed: usize, total: usize) -> bool {
    total >= PROGRESS_THRESHOLD && processed > 0 && processed % (total / 10) == 0
}

/// Parses `files` in the given order and concatenates their orders.
pub fn load_files(files: &[PathBuf], show_progress: bool) -> IngestResult<Vec<Order>> {
    let total = files.len();

    if show_progress {
        info!(total, "Found documents");
    }

    let mut orders = Vec::new();
    for (i, file) in files.iter().enumerate() {
        let parsed = load_file(file)?;
        debug!(file = %file.display(), orders = parsed.len(), "Parsed document");
        orders.extend(parsed);

        let processed = i + 1;
        if show_progress && is_progress_checkpoint(processed, total) {
            info!(
                processed,
                total,
                percent = processed * 100 / total,
                "Reading documents"
            );
        }
    }

    Ok(orders)
}

/// Regular files in `dir` with the given extension, sorted by file name.
pub fn document_files(dir: &Path, extension: &str) -> IngestResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|source| read_error(dir, source))? {
        let entry = entry.map_err(|source| read_error(dir, source))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|source| read_error(&path, source))?;
        if file_type.is_file() && has_extension(&path, extension) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Subdirectories of `dir` with their document counts, sorted by name.
pub fn list_subdirectories(dir: &Path, extension: &str) -> IngestResult<Vec<SubdirectoryHint>> {
    let mut hints = Vec::new();
    for entry in fs::read_dir(dir).map_err(|source| read_error(dir, source))? {
        let entry = entry.map_err(|source| read_error(dir, source))?;
        let file_type = entry
            .file_type()
            .map_err(|source| read_error(&entry.path(), source))?;
        if !file_type.is_dir() {
            continue;
        }
        let documents = document_files(&entry.path(), extension)
            .map(|files| files.len())
            .unwrap_or(0);
        hints.push(SubdirectoryHint {
            name: entry.file_name().to_string_lossy().into_owned(),
            documents,
        });
    }
    hints.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(hints)
}

fn read_error(path: &Path, source: std::io::Error) -> IngestError {
    IngestError::Read {
        path: path.to_path_buf(),
        source,
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

// =============================================================================
// Unit Tests
// =============================================================================
