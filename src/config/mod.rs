// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for gickup-rs.
//!
//! Two documents are involved. The *registry* (repositories and index
//! sources, JSON) lives in [`crate::registry`]. This module covers the
//! application *options* (TOML), which never change at runtime.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. gickup.toml ($XDG_CONFIG_HOME/gickup or ~/.gickup)
//! 3. --ini files (in order)
//! 4. GICKUP_* env vars
//! 5. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GICKUP_GLOBAL__LOG_LEVEL=4            → global.log_level = 4
//! GICKUP_BACKUP__CONCURRENCY=8          → backup.concurrency = 8
//! GICKUP_DISCOVERY__GITHUB_API_URL=...  → discovery.github_api_url = "..."
//! ```

pub mod loader;
pub mod paths;
pub mod types;


use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{BackupConfig, DiscoveryConfig, GlobalConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Backup run options.
    pub backup: BackupConfig,
    /// Discovery options.
    pub discovery: DiscoveryConfig,
}

impl Config {
    /// Options from one TOML document on top of the defaults.
    ///
    /// ```
    /// use gickup::config::Config;
    ///
    /// let config = Config::parse("[backup]\nconcurrency = 4\n")?;
    /// assert_eq!(config.backup.concurrency, 4);
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML, has unknown keys,
    /// or holds out-of-range values.
    pub fn parse(content: &str) -> Result<Self> {
        ConfigLoader::new().toml_str(content).build()
    }

    /// Rejects values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` naming the offending key.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        types::validate_concurrency("backup.concurrency", self.backup.concurrency)?;
        types::validate_concurrency("discovery.concurrency", self.discovery.concurrency)?;
        types::validate_per_page(self.discovery.github_per_page)?;
        if self.discovery.ssh_program.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "discovery.ssh_program".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Format configuration options for display, sorted by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_backup_options(&mut options);
        self.format_discovery_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.log_level".into(),
            self.global.log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
    }

    fn format_backup_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "backup.concurrency".into(),
            self.backup.concurrency.to_string(),
        );
        options.insert(
            "backup.fetch_timeout_secs".into(),
            self.backup.fetch_timeout_secs.to_string(),
        );
    }

    fn format_discovery_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "discovery.github_api_url".into(),
            self.discovery.github_api_url.clone(),
        );
        options.insert(
            "discovery.github_per_page".into(),
            self.discovery.github_per_page.to_string(),
        );
        options.insert(
            "discovery.ssh_program".into(),
            self.discovery.ssh_program.clone(),
        );
        options.insert(
            "discovery.timeout_secs".into(),
            self.discovery.timeout_secs.to_string(),
        );
        options.insert(
            "discovery.concurrency".into(),
            self.discovery.concurrency.to_string(),
        );
    }
}
