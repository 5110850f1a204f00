//! Configuration for loading and searching workbooks

use crate::unify::HeaderRules;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main search configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default)]
    pub sheets: HashMap<String, SheetConfig>,
}

impl SearchConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: SearchConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Check if a sheet should be left out of the unified table
    pub fn is_sheet_skipped(&self, sheet_name: &str) -> bool {
        self.sheets
            .get(sheet_name)
            .is_some_and(|sheet_config| sheet_config.skip)
    }

    /// Validate labels and placeholder patterns
    pub fn validate(&self) -> Result<()> {
        if self.global.origin_label.trim().is_empty() {
            anyhow::bail!("Configuration error: 'origin_label' must not be empty");
        }
        if self.global.key_label.trim().is_empty() {
            anyhow::bail!("Configuration error: 'key_label' must not be empty");
        }
        if self.global.synthetic_prefix.trim().is_empty() {
            anyhow::bail!("Configuration error: 'synthetic_prefix' must not be empty");
        }
        if self.global.origin_label == self.global.key_label {
            anyhow::bail!(
                "Configuration error: 'origin_label' and 'key_label' must differ (both '{}')",
                self.global.origin_label
            );
        }

        HeaderRules::new(&self.global)?;

        Ok(())
    }
}

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Display label of the provenance column
    #[serde(default = "default_origin_label")]
    pub origin_label: String,
    /// Display label of the canonical key column in diagnostics
    #[serde(default = "default_key_label")]
    pub key_label: String,
    /// Prefix of repaired header names ("Column 3")
    #[serde(default = "default_synthetic_prefix")]
    pub synthetic_prefix: String,
    /// Case-insensitive patterns marking auto-generated header labels
    #[serde(default = "default_placeholder_patterns")]
    pub placeholder_patterns: Vec<String>,
    /// Column searched when none is given explicitly
    #[serde(default)]
    pub key_column: Option<String>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            origin_label: default_origin_label(),
            key_label: default_key_label(),
            synthetic_prefix: default_synthetic_prefix(),
            placeholder_patterns: default_placeholder_patterns(),
            key_column: None,
        }
    }
}

/// Sheet-specific configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Leave this sheet out of the unified table
    #[serde(default)]
    pub skip: bool,
}

fn default_origin_label() -> String {
    "Origin".to_string()
}

fn default_key_label() -> String {
    "Key".to_string()
}

fn default_synthetic_prefix() -> String {
    "Column".to_string()
}

fn default_placeholder_patterns() -> Vec<String> {
    vec!["^unnamed".to_string()]
}
