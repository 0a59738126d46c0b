// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Well-known file locations.
//!
//! ```text
//! registry file     $XDG_CONFIG_HOME/gickup.conf
//!                   ~/.gickup/settings
//!
//! backup root       $XDG_DATA_HOME/gickup
//!                   $XDG_CONFIG_HOME/gickup
//!                   ~/.gickup/backup
//!
//! options file      $XDG_CONFIG_HOME/gickup/gickup.toml
//!                   ~/.gickup/gickup.toml
//! ```
//!
//! For each list the first existing candidate wins, otherwise the first
//! candidate is used (and created on demand by whoever writes to it).

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, GickupResult};

/// Environment snapshot used to resolve default locations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathEnv {
    pub home: Option<PathBuf>,
    pub xdg_config_home: Option<PathBuf>,
    pub xdg_data_home: Option<PathBuf>,
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

impl PathEnv {
    /// Reads `HOME` (or `USERPROFILE`), `XDG_CONFIG_HOME` and `XDG_DATA_HOME`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            home: env_path("HOME").or_else(|| env_path("USERPROFILE")),
            xdg_config_home: env_path("XDG_CONFIG_HOME"),
            xdg_data_home: env_path("XDG_DATA_HOME"),
        }
    }

    fn dot_gickup(&self) -> Option<PathBuf> {
        self.home.as_ref().map(|home| home.join(".gickup"))
    }

    #[must_use]
    pub fn settings_file_candidates(&self) -> Vec<PathBuf> {
        [
            self.xdg_config_home.as_ref().map(|d| d.join("gickup.conf")),
            self.dot_gickup().map(|d| d.join("settings")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    #[must_use]
    pub fn backup_root_candidates(&self) -> Vec<PathBuf> {
        [
            self.xdg_data_home.as_ref().map(|d| d.join("gickup")),
            self.xdg_config_home.as_ref().map(|d| d.join("gickup")),
            self.dot_gickup().map(|d| d.join("backup")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    #[must_use]
    pub fn options_file_candidates(&self) -> Vec<PathBuf> {
        [
            self.xdg_config_home
                .as_ref()
                .map(|d| d.join("gickup").join("gickup.toml")),
            self.dot_gickup().map(|d| d.join("gickup.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Location of the registry file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if neither `HOME` nor `XDG_CONFIG_HOME` is set.
    pub fn settings_file(&self) -> GickupResult<PathBuf> {
        first_existing_or_first(self.settings_file_candidates())
            .ok_or_else(|| no_home("registry file").into())
    }

    /// Default backup root when the registry does not set one.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if no candidate directory can be derived.
    pub fn backup_root(&self) -> GickupResult<PathBuf> {
        first_existing_or_first(self.backup_root_candidates())
            .ok_or_else(|| no_home("backup root").into())
    }

    /// Existing options file, if any.
    #[must_use]
    pub fn options_file(&self) -> Option<PathBuf> {
        self.options_file_candidates()
            .into_iter()
            .find(|p| p.is_file())
    }

    /// Expands a leading `~` to the home directory.
    #[must_use]
    pub fn expand_tilde(&self, path: &str) -> PathBuf {
        match (path.strip_prefix('~'), &self.home) {
            (Some(""), Some(home)) => home.clone(),
            (Some(rest), Some(home)) if rest.starts_with(['/', '\\']) => {
                home.join(rest.trim_start_matches(['/', '\\']))
            }
            _ => PathBuf::from(path),
        }
    }
}

fn no_home(what: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: "HOME".to_string(),
        message: format!("cannot locate the {what}: neither HOME nor XDG_CONFIG_HOME is set"),
    }
}

/// Returns the first existing path, or the first candidate if none exists.
#[must_use]
pub fn first_existing_or_first(candidates: Vec<PathBuf>) -> Option<PathBuf> {
    candidates
        .iter()
        .find(|p| p.exists())
        .or_else(|| candidates.first())
        .cloned()
}

/// Makes `path` absolute against the current directory, without touching the
/// filesystem.
///
/// # Errors
///
/// Returns an I/O error if the current directory cannot be read.
pub fn absolute(path: &Path) -> GickupResult<PathBuf> {
    Ok(std::path::absolute(path)?)
}
