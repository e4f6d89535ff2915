//! # Sales Configuration
//!
//! Configuration management for the analysis run.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority, applied by sales-cli)        │
//! │     --top 10 --policy valid-only                                       │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     SALES_TOP_N=10                                                     │
//! │     SALES_VALIDATION_POLICY=valid_only                                 │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <file>, or                                                │
//! │     ~/.config/sales-analytics/sales.toml (Linux)                       │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     top_n = 5, policy = strict, extension = json                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # sales.toml
//! [report]
//! top_n = 5
//!
//! [validation]
//! policy = "strict"  # strict | valid_only
//!
//! [ingest]
//! extension = "json"
//! show_progress = true
//! ```

use std::path::{Path, PathBuf};

use sales_core::{AnalysisOptions, ValidationPolicy, DEFAULT_TOP_N};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{IngestError, IngestResult};

// =============================================================================
// Report Settings
// =============================================================================

/// What the summary contains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Number of products in the top-N ranking.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            top_n: default_top_n(),
        }
    }
}

// =============================================================================
// Validation Settings
// =============================================================================

/// Whether invalid data blocks aggregation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationSettings {
    #[serde(default)]
    pub policy: ValidationPolicy,
}

// =============================================================================
// Ingest Settings
// =============================================================================

/// How input directories are read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSettings {
    /// File extension (without the dot) of documents inside a directory.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Log progress while reading large directories.
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

fn default_extension() -> String {
    "json".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for IngestSettings {
    fn default() -> Self {
        IngestSettings {
            extension: default_extension(),
            show_progress: true,
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete analysis configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesConfig {
    #[serde(default)]
    pub report: ReportSettings,

    #[serde(default)]
    pub validation: ValidationSettings,

    #[serde(default)]
    pub ingest: IngestSettings,
}

impl SalesConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (explicit path, else `sales.toml` in the user config dir)
    /// 3. Environment variables
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file is not.
    pub fn load(config_path: Option<&Path>) -> IngestResult<Self> {
        let mut config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(IngestError::NotFound(path.to_path_buf()));
                }
                Self::from_file(path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> IngestResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> IngestResult<()> {
        if self.report.top_n == 0 {
            return Err(IngestError::InvalidConfig(
                "top_n must be greater than 0".into(),
            ));
        }

        if self.ingest.extension.trim().is_empty() {
            return Err(IngestError::InvalidConfig(
                "extension must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup. Split out so tests do not
    /// have to mutate the process environment.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(top_n) = lookup("SALES_TOP_N") {
            match top_n.parse::<usize>() {
                Ok(n) => {
                    debug!(top_n = n, "Overriding top_n from environment");
                    self.report.top_n = n;
                }
                Err(_) => warn!(value = %top_n, "Ignoring non-numeric SALES_TOP_N"),
            }
        }

        if let Some(policy) = lookup("SALES_VALIDATION_POLICY") {
            match policy.parse() {
                Ok(parsed) => {
                    debug!(policy = %policy, "Overriding validation policy from environment");
                    self.validation.policy = parsed;
                }
                Err(e) => warn!(error = %e, "Ignoring SALES_VALIDATION_POLICY"),
            }
        }

        if let Some(extension) = lookup("SALES_FILE_EXTENSION") {
            self.ingest.extension = extension.trim_start_matches('.').to_string();
        }

        if let Some(progress) = lookup("SALES_SHOW_PROGRESS") {
            match progress.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.ingest.show_progress = true,
                "0" | "false" | "no" => self.ingest.show_progress = false,
                _ => warn!(value = %progress, "Ignoring SALES_SHOW_PROGRESS"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "sales", "sales-analytics")
            .map(|dirs| dirs.config_dir().join("sales.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Options for [`sales_core::analyze`].
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            top_n: self.report.top_n,
            policy: self.validation.policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = SalesConfig::default();
        assert_eq!(config.report.top_n, 5);
        assert_eq!(config.validation.policy, ValidationPolicy::Strict);
        assert_eq!(config.ingest.extension, "json");
        assert!(config.ingest.show_progress);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_parsing() {
        let config: SalesConfig = toml::from_str(
            r#"
            [report]
            top_n = 20

            [validation]
            policy = "valid_only"
            "#,
        )
        .unwrap();
        assert_eq!(config.report.top_n, 20);
        assert_eq!(config.validation.policy, ValidationPolicy::ValidOnly);
        // Missing section falls back to defaults
        assert_eq!(config.ingest.extension, "json");
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: SalesConfig = toml::from_str("").unwrap();
        assert_eq!(config.report.top_n, 5);
    }

    #[test]
    fn test_config_validation() {
        let mut config = SalesConfig::default();
        config.report.top_n = 0;
        assert!(config.validate().is_err());

        config.report.top_n = 3;
        config.ingest.extension = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = SalesConfig::default();
        config.apply_overrides(lookup(&[
            ("SALES_TOP_N", "12"),
            ("SALES_VALIDATION_POLICY", "valid-only"),
            ("SALES_FILE_EXTENSION", ".txt"),
            ("SALES_SHOW_PROGRESS", "no"),
        ]));
        assert_eq!(config.report.top_n, 12);
        assert_eq!(config.validation.policy, ValidationPolicy::ValidOnly);
        assert_eq!(config.ingest.extension, "txt");
        assert!(!config.ingest.show_progress);
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let mut config = SalesConfig::default();
        config.apply_overrides(lookup(&[
            ("SALES_TOP_N", "many"),
            ("SALES_VALIDATION_POLICY", "lenient"),
        ]));
        assert_eq!(config.report.top_n, 5);
        assert_eq!(config.validation.policy, ValidationPolicy::Strict);
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.toml");
        std::fs::write(&path, "[report]\ntop_n = 7\n").unwrap();

        let config = SalesConfig::from_file(&path).unwrap();
        assert_eq!(config.report.top_n, 7);

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            SalesConfig::load(Some(&missing)),
            Err(IngestError::NotFound(_))
        ));
    }

    #[test]
    fn test_analysis_options() {
        let mut config = SalesConfig::default();
        config.report.top_n = 9;
        let options = config.analysis_options();
        assert_eq!(options.top_n, 9);
        assert_eq!(options.policy, ValidationPolicy::Strict);
    }
}
