// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for gickup-rs.
//!
//! ```text
//! Config: GlobalConfig, BackupConfig, DiscoveryConfig
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::logging::LogLevel;

/// Converts a seconds value into a timeout, `0` meaning "no timeout".
const fn seconds(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-5).
    pub log_level: LogLevel,
    /// Log level for file output (0-5).
    pub file_log_level: LogLevel,
    /// Path to log file. No file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::INFO,
            file_log_level: LogLevel::DEBUG,
            log_file: None,
        }
    }
}

/// Backup run options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackupConfig {
    /// Number of repositories fetched at the same time.
    pub concurrency: usize,
    /// Per-repository fetch timeout in seconds (0 disables it).
    pub fetch_timeout_secs: u64,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            fetch_timeout_secs: 3600,
        }
    }
}

impl BackupConfig {
    #[must_use]
    pub const fn fetch_timeout(&self) -> Option<Duration> {
        seconds(self.fetch_timeout_secs)
    }
}

/// Repository discovery options shared by all index backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Base URL of the GitHub REST API.
    pub github_api_url: String,
    /// Page size requested from the GitHub API.
    pub github_per_page: u32,
    /// Program used for SSH index listings.
    pub ssh_program: String,
    /// Timeout for one listing (ssh command or HTTP request) in seconds.
    pub timeout_secs: u64,
    /// Number of index sources queried at the same time.
    pub concurrency: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            github_api_url: "https://api.github.com".to_string(),
            github_per_page: 100,
            ssh_program: "ssh".to_string(),
            timeout_secs: 120,
            concurrency: 4,
        }
    }
}

impl DiscoveryConfig {
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        seconds(self.timeout_secs)
    }
}

/// Checks that a concurrency setting is usable.
pub(super) fn validate_concurrency(key: &str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// Checks the GitHub page size against the API limits.
pub(super) fn validate_per_page(value: u32) -> Result<(), ConfigError> {
    if !(1..=100).contains(&value) {
        return Err(ConfigError::InvalidValue {
            key: "discovery.github_per_page".to_string(),
            message: format!("must be between 1 and 100, got {value}"),
        });
    }
    Ok(())
}
