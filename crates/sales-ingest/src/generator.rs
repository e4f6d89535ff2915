//! # Synthetic Data Generator
//!
//! Produces realistic order documents for demos and load tests.
//!
//! ## Usage
//! ```bash
//! # 100 valid orders into data/separate_100
//! sales generate --preset small
//!
//! # Custom amount, with injected errors, reproducible
//! sales generate --output data/bad --count 100 --errors --seed 42
//! ```
//!
//! ## Generated Orders
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  id         ORD000001, ORD000002, ...                                  │
//! │  ts         base + [-30, 0] days + [0, 23] hours, YYYY-MM-DDThh:mm:ssZ │
//! │  items      1 - 10                                                     │
//! │  sku        {PROD|SKU|ITEM|ART|BOLT}-{100..999}{A..Z}                   │
//! │  qty        1 - 50                                                     │
//! │  price      10.00 - 5000.00 (rounded to cents)                         │
//! │                                                                         │
//! │  with errors:                                                          │
//! │  • order: one in three gets no items                                   │
//! │  • item:  empty sku │ qty 0 │ qty -5 │ price -100                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The RNG is always passed in. Seed it (`StdRng::seed_from_u64`) for
//! reproducible output.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sales_core::serialize::write_order;
use sales_core::{Item, Order};
use tracing::info;

use crate::error::{IngestError, IngestResult};
use crate::loader::is_progress_checkpoint;

const SKU_PREFIXES: [&str; 5] = ["PROD", "SKU", "ITEM", "ART", "BOLT"];

// =============================================================================
// Order Generator
// =============================================================================

/// Builds random orders from a caller-supplied RNG.
pub struct OrderGenerator<R: Rng> {
    rng: R,
    base: DateTime<Utc>,
    with_errors: bool,
}

impl<R: Rng> OrderGenerator<R> {
    /// Creates a generator whose timestamps fall in the 30 days before `base`.
    pub fn new(rng: R, base: DateTime<Utc>, with_errors: bool) -> Self {
        OrderGenerator {
            rng,
            base,
            with_errors,
        }
    }

    /// Order with the 1-based sequence number `index`.
    pub fn order(&mut self, index: usize) -> Order {
        let mut item_count = self.rng.gen_range(1..=10);
        let days = self.rng.gen_range(-30..=0);
        let hours = self.rng.gen_range(0..=23);

        if self.with_errors && self.rng.gen_range(0..3) == 0 {
            item_count = 0;
        }

        let items = (0..item_count).map(|_| self.item()).collect();
        Order::new(order_id(index), self.timestamp(days, hours), items)
    }

    fn item(&mut self) -> Item {
        let mut item = Item::new(
            self.sku(),
            self.rng.gen_range(1..=50),
            round_cents(self.rng.gen_range(10.0..5000.0)),
        );

        if self.with_errors {
            match self.rng.gen_range(0..4) {
                0 => item.sku.clear(),
                1 => item.quantity = 0,
                2 => item.quantity = -5,
                _ => item.price = -100.0,
            }
        }

        item
    }

    fn sku(&mut self) -> String {
        let prefix = SKU_PREFIXES[self.rng.gen_range(0..SKU_PREFIXES.len())];
        let number: u32 = self.rng.gen_range(100..=999);
        let letter = char::from(b'A' + self.rng.gen_range(0..26u8));
        format!("{prefix}-{number}{letter}")
    }

    fn timestamp(&self, days: i64, hours: i64) -> String {
        let at = self.base + Duration::days(days) + Duration::hours(hours);
        at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

/// `ORD` followed by a six-digit, zero-padded index.
pub fn order_id(index: usize) -> String {
    format!("ORD{index:06}")
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// File Output
// =============================================================================

/// Writes `count` one-order documents named `order_000001.json`, ... into `dir`.
///
/// Returns the paths written, in order.
pub fn write_separate_files<R: Rng>(
    dir: &Path,
    count: usize,
    generator: &mut OrderGenerator<R>,
) -> IngestResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    info!(
        dir = %dir.display(),
        count,
        with_errors = generator.with_errors,
        "Generating documents"
    );

    let started = Instant::now();
    let mut written = Vec::with_capacity(count);
    let mut text = String::new();

    for index in 1..=count {
        let order = generator.order(index);

        text.clear();
        text.push_str("[\n");
        write_order(&mut text, &order);
        text.push_str("\n]");

        let path = dir.join(format!("order_{index:06}.json"));
        fs::write(&path, &text)?;
        written.push(path);

        if is_progress_checkpoint(index, count) {
            info!(
                written = index,
                count,
                percent = index * 100 / count,
                "Generating documents"
            );
        }
    }

    let elapsed = started.elapsed();
    let per_sec = if elapsed.as_secs_f64() > 0.0 {
        count as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };
    info!(
        count,
        elapsed_ms = elapsed.as_millis() as u64,
        files_per_sec = per_sec as u64,
        "Generation complete"
    );

    Ok(written)
}

// =============================================================================
// Presets
// =============================================================================

/// Canned generation sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Small,
    Medium,
    Large,
    Huge,
    Errors,
}

impl Preset {
    /// Number of documents to write.
    pub fn count(&self) -> usize {
        match self {
            Preset::Small => 100,
            Preset::Medium => 1_000,
            Preset::Large => 10_000,
            Preset::Huge => 250_000,
            Preset::Errors => 1_000,
        }
    }

    /// Output directory, relative to the working directory.
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(match self {
            Preset::Small => "data/separate_100",
            Preset::Medium => "data/separate_1k",
            Preset::Large => "data/separate_10k",
            Preset::Huge => "data/separate_250k",
            Preset::Errors => "data/separate_errors",
        })
    }

    pub fn with_errors(&self) -> bool {
        matches!(self, Preset::Errors)
    }

    /// Presets large enough to need explicit confirmation.
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, Preset::Huge)
    }
}

impl FromStr for Preset {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(Preset::Small),
            "medium" => Ok(Preset::Medium),
            "large" => Ok(Preset::Large),
            "huge" => Ok(Preset::Huge),
            "errors" => Ok(Preset::Errors),
            other => Err(IngestError::InvalidConfig(format!(
                "Unknown preset: '{}'. Valid options: small, medium, large, huge, errors",
                other
            ))),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
